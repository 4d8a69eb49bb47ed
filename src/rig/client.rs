// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/rig/client.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the TCP client that samples one rig, located in the rig
// subdirectory. Each call opens its own connection, performs a single
// request/response exchange under a deadline, and drops the connection on
// every exit path.
//
// Tree Location:
// - src/rig/client.rs (per-rig TCP sampling)
// - Depends on: tokio, thiserror, crate::rig::protocol

use crate::core::snapshot::{RigSnapshot, Target};
use crate::rig::protocol::{DecodeError, EthminerProtocol};
use log::trace;
use std::io;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::{self, Instant};

const LOG_TARGET: &str = "ethminer::exporter::rig::client";

/// Largest response accepted from a rig. Enough for dozens of devices.
pub const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// Why reading the response failed after the connection was established
#[derive(Error, Debug)]
pub enum ReadFailure {
    #[error("timed out waiting for response")]
    TimedOut,

    #[error("connection closed before a response was received")]
    Closed,

    #[error("response exceeds {limit} bytes")]
    Overflow { limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum SampleError {
    /// Nothing listening, host down, DNS failure or connect timeout.
    /// Routine in this domain; callers treat it as a skip.
    #[error("unreachable: {source}")]
    Unreachable {
        #[source]
        source: io::Error,
    },

    #[error("read failed: {0}")]
    ReadFailed(#[source] ReadFailure),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
}

impl SampleError {
    /// Expected failures that should not be logged as operational errors
    pub fn is_routine(&self) -> bool {
        matches!(self, SampleError::Unreachable { .. })
    }
}

impl From<ReadFailure> for SampleError {
    fn from(failure: ReadFailure) -> Self {
        SampleError::ReadFailed(failure)
    }
}

/// Rig client for one-shot statistics exchanges
#[derive(Debug, Clone)]
pub struct RigClient {
    timeout: Duration,
}

impl RigClient {
    /// Create a client whose connect and exchange are each bounded by `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Sample a rig once: connect, send the request, read one response, decode
    pub async fn sample(&self, target: &Target) -> Result<RigSnapshot, SampleError> {
        let mut stream = self.connect(target).await?;

        // Deadline runs from the moment the connection is established
        let deadline = Instant::now() + self.timeout;
        let payload = time::timeout_at(deadline, Self::exchange(&mut stream))
            .await
            .map_err(|_| ReadFailure::TimedOut)??;

        trace!(target: LOG_TARGET, "Read {} bytes from {}", payload.len(), target);
        Ok(EthminerProtocol::decode_response(&payload)?)
    }

    async fn connect(&self, target: &Target) -> Result<TcpStream, SampleError> {
        match time::timeout(self.timeout, TcpStream::connect(target.as_str())).await {
            Ok(Ok(stream)) => {
                stream
                    .set_nodelay(true)
                    .map_err(|e| SampleError::ReadFailed(ReadFailure::Io(e)))?;
                Ok(stream)
            }
            Ok(Err(source)) => Err(SampleError::Unreachable { source }),
            Err(_) => Err(SampleError::Unreachable {
                source: io::Error::new(io::ErrorKind::TimedOut, "connect timed out"),
            }),
        }
    }

    /// Write the request and read until newline, EOF, or the size cap
    async fn exchange(stream: &mut TcpStream) -> Result<Vec<u8>, ReadFailure> {
        stream.write_all(EthminerProtocol::encode_request()).await?;
        stream.flush().await?;

        let limit = (MAX_RESPONSE_BYTES + 1) as u64;
        let mut reader = BufReader::new(stream.take(limit));
        let mut payload = Vec::with_capacity(4096);
        let read = reader.read_until(b'\n', &mut payload).await?;

        if read == 0 {
            return Err(ReadFailure::Closed);
        }
        if payload.len() > MAX_RESPONSE_BYTES {
            return Err(ReadFailure::Overflow {
                limit: MAX_RESPONSE_BYTES,
            });
        }
        Ok(payload)
    }
}


// Changelog:
// - v1.1.0 (2025-07-09): Bounded reads.
//   - Replaced the single fixed-buffer read with a newline-delimited read
//     capped at MAX_RESPONSE_BYTES; larger responses fail instead of being
//     silently truncated.
//   - Split connect failures (Unreachable) from post-connect failures.
// - v1.0.0 (2025-07-02): Initial rig client.
//   - Connect with timeout, write the statistics request, read and decode.
