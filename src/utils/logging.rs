// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/logging.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file configures log4rs as the backend of the log facade, located in the
// utils subdirectory. Output goes to stdout with the level chosen on the
// command line.
//
// Tree Location:
// - src/utils/logging.rs (logger initialisation)
// - Depends on: log, log4rs

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const STDOUT_APPENDER: &str = "stdout";
const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {h({l:<5})} [{t}] {m}{n}";

/// Build the console logging configuration
pub fn logging_config(level: LevelFilter) -> crate::Result<Config> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build(STDOUT_APPENDER, Box::new(stdout)))
        .build(Root::builder().appender(STDOUT_APPENDER).build(level))?;
    Ok(config)
}

/// Install the global logger. Call once, before anything logs.
pub fn init_logging(level: LevelFilter) -> crate::Result<()> {
    log4rs::init_config(logging_config(level)?)?;
    Ok(())
}


// Changelog:
// - v1.0.0 (2025-07-02): Console logging through log4rs.
