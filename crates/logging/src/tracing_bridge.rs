//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and a [`Logger`].
//!
//! [`LoggerLayer`] is a tracing-subscriber layer that renders tracing events
//! as ordinary records, so library code that reports through `tracing`
//! (such as the level listeners) shares the logger's threshold, format and
//! output stream.
//!
//! | tracing level | severity |
//! |---------------|----------|
//! | `ERROR`       | ERROR    |
//! | `WARN`        | WARN     |
//! | `INFO`        | INFO     |
//! | `DEBUG`       | TRACE    |
//! | `TRACE`       | TRACE    |
//!
//! Events carry no enclosing-function name, so records use the last segment
//! of the event's module path in that position.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;

use super::call_site::{CallSite, UNKNOWN_FUNCTION};
use super::logger::Logger;
use super::severity::Severity;

/// A tracing layer that forwards events to a shared [`Logger`].
#[derive(Clone, Debug)]
pub struct LoggerLayer {
    logger: Arc<Logger>,
}

impl LoggerLayer {
    /// Creates a layer writing through `logger`.
    #[must_use]
    pub const fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Maps a tracing level to the severity it is recorded at.
    #[must_use]
    pub const fn severity_for(level: &Level) -> Severity {
        match *level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warn,
            Level::INFO => Severity::Info,
            Level::DEBUG | Level::TRACE => Severity::Trace,
        }
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let severity = Self::severity_for(metadata.level());
        if !self.logger.enabled(severity) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let function = metadata
            .module_path()
            .and_then(|path| path.rsplit("::").next())
            .unwrap_or(UNKNOWN_FUNCTION);
        let call_site = CallSite::new(
            metadata.file().unwrap_or(metadata.target()),
            metadata.line().unwrap_or(0),
            function,
        );
        self.logger
            .emit(severity, call_site, format_args!("{}", visitor.rendered));
    }
}

/// Collects the `message` field followed by any other fields as `name=value`.
#[derive(Default)]
struct MessageVisitor {
    rendered: String,
    fields: String,
}

impl MessageVisitor {
    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if field.name() == "message" {
            let _ = self.rendered.write_fmt(value);
            if !self.fields.is_empty() {
                self.rendered.push_str(&self.fields);
                self.fields.clear();
            }
        } else if self.rendered.is_empty() {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        } else {
            let _ = write!(self.rendered, " {}={}", field.name(), value);
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push_field(field, format_args!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push_field(field, format_args!("{value}"));
    }
}

/// Installs a global subscriber that renders every tracing event through
/// `logger`.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed.
pub fn init_tracing(logger: Arc<Logger>) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(LoggerLayer::new(logger))
        .try_init()
}

/// Like [`init_tracing`], with an extra filter layer (typically an
/// `EnvFilter`) applied before events reach the logger.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed.
pub fn init_tracing_with_filter<F>(logger: Arc<Logger>, filter: F) -> Result<(), TryInitError>
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(LoggerLayer::new(logger))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging_sink::CaptureBuffer;
    use tracing_subscriber::layer::SubscriberExt;

    fn capture(threshold: Severity) -> (Arc<Logger>, CaptureBuffer) {
        let output = CaptureBuffer::new();
        let logger = Logger::builder()
            .threshold(threshold)
            .output(output.clone())
            .build();
        (Arc::new(logger), output)
    }

    #[test]
    fn level_mapping() {
        assert_eq!(LoggerLayer::severity_for(&Level::ERROR), Severity::Error);
        assert_eq!(LoggerLayer::severity_for(&Level::WARN), Severity::Warn);
        assert_eq!(LoggerLayer::severity_for(&Level::INFO), Severity::Info);
        assert_eq!(LoggerLayer::severity_for(&Level::DEBUG), Severity::Trace);
        assert_eq!(LoggerLayer::severity_for(&Level::TRACE), Severity::Trace);
    }

    #[test]
    fn events_are_rendered_with_fields() {
        let (logger, output) = capture(Severity::Info);
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(logger));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(port = 43555, "listener restarted");
        });

        let lines = output.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" WRN "));
        assert!(lines[0].contains("tracing_bridge.rs ["));
        assert!(lines[0].ends_with("tests(): listener restarted port=43555"));
    }

    #[test]
    fn events_below_threshold_are_dropped() {
        let (logger, output) = capture(Severity::Warn);
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(logger));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("not shown");
            tracing::debug!("not shown either");
        });
        assert!(output.is_empty());
    }
}
