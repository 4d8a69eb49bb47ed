// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/metrics/exposition.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file renders one scrape's samples in the text exposition format,
// located in the metrics subdirectory. A fresh registry is built per scrape,
// so nothing outlives the request.
//
// Tree Location:
// - src/metrics/exposition.rs (samples to text exposition)
// - Depends on: prometheus, thiserror, crate::metrics::mapper

use crate::metrics::mapper::{MetricKind, MetricSample};
use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use thiserror::Error;

/// Content type of the rendered body
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

#[derive(Error, Debug)]
pub enum ExpositionError {
    #[error("metric registry rejected {name}: {source}")]
    Registry {
        name: &'static str,
        #[source]
        source: prometheus::Error,
    },

    #[error("failed to encode metrics: {0}")]
    Encode(#[from] prometheus::Error),

    #[error("encoded metrics are not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

enum Family {
    Gauge(GaugeVec),
    Counter(CounterVec),
}

/// Render samples as text. No samples renders an empty body.
///
/// Samples sharing a metric name and label values overwrite each other,
/// the last one wins. That happens when discovery returns a host twice.
pub fn render(samples: &[MetricSample]) -> Result<String, ExpositionError> {
    let registry = Registry::new();
    let mut families: HashMap<&'static str, Family> = HashMap::new();

    for sample in samples {
        let name = sample.name();
        if !families.contains_key(name) {
            let family = new_family(sample)?;
            let registered = match &family {
                Family::Gauge(vec) => registry.register(Box::new(vec.clone())),
                Family::Counter(vec) => registry.register(Box::new(vec.clone())),
            };
            registered.map_err(|source| ExpositionError::Registry { name, source })?;
            families.insert(name, family);
        }

        let values: Vec<&str> = sample.labels.iter().map(|(_, v)| v.as_str()).collect();
        let registry_error = |source| ExpositionError::Registry { name, source };
        match &families[name] {
            Family::Gauge(vec) => vec
                .get_metric_with_label_values(&values)
                .map_err(registry_error)?
                .set(sample.value),
            Family::Counter(vec) => {
                let counter = vec
                    .get_metric_with_label_values(&values)
                    .map_err(registry_error)?;
                counter.reset();
                counter.inc_by(sample.value.max(0.0));
            }
        }
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn new_family(sample: &MetricSample) -> Result<Family, ExpositionError> {
    let name = sample.name();
    let opts = Opts::new(name, sample.metric.help);
    let label_names = sample.label_names();
    let registry_error = |source| ExpositionError::Registry { name, source };
    Ok(match sample.kind() {
        MetricKind::Gauge => Family::Gauge(GaugeVec::new(opts, &label_names).map_err(registry_error)?),
        MetricKind::Counter => Family::Counter(CounterVec::new(opts, &label_names).map_err(registry_error)?),
    })
}


// Changelog:
// - v1.0.1 (2025-07-09): Duplicate label sets.
//   - Counters are reset before being set so duplicate targets cannot double
//     a share count.
// - v1.0.0 (2025-07-02): Initial text exposition through a per-scrape registry.
