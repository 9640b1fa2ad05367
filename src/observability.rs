//! Observability module for logging setup, spans and metrics recording.
//!
//! This module provides:
//! - Structured logging with configurable levels (pretty or JSON)
//! - Tracing span creation utilities
//! - Metrics recording through the `metrics` facade
//!
//! No metrics exporter is installed here; the recording functions are no-ops
//! until the host process installs a recorder.

use anyhow::Result;
use tracing_subscriber::prelude::*;

use crate::observability_config::ObservabilityConfig;

/// Initialize structured logging with tracing and configuration
pub fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("just_nutrition={}", config.log_level).parse()?);

    if config.use_pretty_logs() {
        // Pretty formatting for development, written to stderr so stdout stays JSON
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Create a span for a normalization operation
pub fn normalization_span(operation: &str, line_count: usize) -> tracing::Span {
    tracing::info_span!("normalization", operation = %operation, line_count = line_count)
}

/// Record normalization batch metrics
pub fn record_normalization_metrics(
    operation: &str,
    duration: std::time::Duration,
    line_count: usize,
    records_produced: usize,
    diagnostics_emitted: usize,
) {
    let operation = operation.to_string();
    metrics::counter!("normalization_operations_total", "operation" => operation.clone())
        .increment(1);
    metrics::counter!("normalization_lines_total", "operation" => operation.clone())
        .increment(line_count as u64);
    metrics::histogram!("normalization_duration_seconds", "operation" => operation.clone())
        .record(duration.as_secs_f64());
    metrics::histogram!("normalization_records_produced", "operation" => operation.clone())
        .record(records_produced as f64);
    metrics::histogram!("normalization_diagnostics_emitted", "operation" => operation)
        .record(diagnostics_emitted as f64);
}

/// Record one diagnostic by reason code
pub fn record_diagnostic(reason: &'static str) {
    metrics::counter!("normalization_diagnostics_total", "reason" => reason).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_without_recorder_are_noops() {
        record_normalization_metrics("test", std::time::Duration::from_millis(1), 3, 2, 1);
        record_diagnostic("unparsed");
    }

    #[test]
    fn test_span_creation() {
        let span = normalization_span("normalize_ingredients", 2);
        let _guard = span.enter();
    }
}
