//! crates/logging/src/macros.rs
//! Severity macros that capture the call site and defer formatting.
//!
//! Every macro takes the logger first. It may be a `Logger`, a `&Logger` or an
//! `Arc<Logger>`. Arguments are only formatted once the record has passed the
//! threshold.

/// Captures the current file, line and enclosing function as a
/// [`CallSite`](crate::CallSite).
///
/// # Example
/// ```
/// fn connect() -> logging::CallSite {
///     logging::call_site!()
/// }
///
/// assert_eq!(connect().function(), "connect");
/// ```
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(::std::file!(), ::std::line!(), {
            fn __probe() {}
            $crate::enclosing_function(::std::any::type_name_of_val(&__probe))
        })
    };
}

/// Emits a record at an explicit [`Severity`](crate::Severity).
///
/// Evaluates to `true` when the record passed the threshold.
///
/// # Example
/// ```
/// use logging::{log_at, Logger, Severity};
/// use logging_sink::CaptureBuffer;
///
/// let logger = Logger::builder().output(CaptureBuffer::new()).build();
/// let level = Severity::Warn;
/// assert!(log_at!(logger, level, "queue depth {}", 17));
/// ```
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $crate::Logger::emit(
            &$logger,
            $severity,
            $crate::call_site!(),
            ::std::format_args!($($arg)+),
        )
    };
}

/// Emits a FATAL record.
#[macro_export]
macro_rules! fatal_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Fatal, $($arg)+)
    };
}

/// Emits an ERROR record.
#[macro_export]
macro_rules! error_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Emits a WARN record.
#[macro_export]
macro_rules! warn_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Warn, $($arg)+)
    };
}

/// Emits an INFO record.
#[macro_export]
macro_rules! info_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Emits a TRACE record tagged with the calling thread's identifier.
#[macro_export]
macro_rules! trace_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Trace, $($arg)+)
    };
}

/// Writes an ERROR record to the logger's diagnostics stream, ignoring the
/// threshold.
///
/// # Example
/// ```
/// use logging::{diagnostic, Logger};
/// use logging_sink::CaptureBuffer;
///
/// let diagnostics = CaptureBuffer::new();
/// let logger = Logger::builder()
///     .output(CaptureBuffer::new())
///     .diagnostics(diagnostics.clone())
///     .build();
/// logger.set_threshold(logging::Severity::Fatal);
///
/// diagnostic!(logger, "unable to bind port {}", 43555);
/// assert!(diagnostics.to_string_lossy().contains(" ERR "));
/// ```
#[macro_export]
macro_rules! diagnostic {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::diagnostic(
            &$logger,
            $crate::Severity::Error,
            $crate::call_site!(),
            ::std::format_args!($($arg)+),
        )
    };
}
