#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging/src/lib.rs
//!
//! # Overview
//!
//! `logging` provides leveled, timestamped console records whose threshold can
//! be changed while the process runs. Five severities are supported, FATAL
//! through TRACE, and each record names the file, line and function it was
//! emitted from.
//!
//! # Design
//!
//! All state lives in an explicit [`Logger`] rather than in globals. The
//! logger owns a [`LevelStore`] (the threshold, guarded by a mutex), a
//! [`Clock`] whose UTC offset is resolved once, and the record and diagnostic
//! sinks from `logging-sink`. Applications share one logger through an
//! [`Arc`](std::sync::Arc) and hand the same handle to a level listener,
//! which replaces the threshold when a control message arrives.
//!
//! The severity macros ([`fatal_log!`], [`error_log!`], [`warn_log!`],
//! [`info_log!`], [`trace_log!`]) capture the call site at compile time and
//! pass their arguments as [`std::fmt::Arguments`], so nothing is formatted
//! for records below the threshold.
//!
//! # Invariants
//!
//! - A record at severity `s` is emitted exactly when `s.rank()` is less than
//!   or equal to the threshold's rank at the time of the call.
//! - Every record is a single line written through one `write_all` call while
//!   the output lock is held; concurrent records never interleave.
//! - Message bodies are capped at [`MAX_MESSAGE_LEN`] bytes.
//! - Only TRACE records carry a `{thread_id:N}` tag.
//!
//! # Features
//!
//! - `verbose`: new loggers start at TRACE instead of INFO.
//! - `serde`: `Serialize`/`Deserialize` for [`Severity`].
//! - `tracing`: `LoggerLayer`, a tracing-subscriber layer rendering tracing
//!   events through a logger.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use logging::{error_log, info_log, Logger, Severity};
//! use logging_sink::CaptureBuffer;
//!
//! let output = CaptureBuffer::new();
//! let logger = Arc::new(Logger::builder().output(output.clone()).build());
//!
//! info_log!(logger, "starting");
//! logger.set_threshold(Severity::Error);
//! info_log!(logger, "suppressed");
//! error_log!(logger, "disk full");
//!
//! let lines = output.lines();
//! assert_eq!(lines.len(), 2);
//! assert!(lines[1].contains(" ERR "));
//! ```

mod call_site;
mod level_store;
mod logger;
mod macros;
mod record;
mod severity;
mod timestamp;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use call_site::{CallSite, UNKNOWN_FUNCTION, enclosing_function};
pub use level_store::LevelStore;
pub use logger::{Logger, LoggerBuilder};
pub use logging_sink::{CaptureBuffer, Destination};
pub use record::{MAX_MESSAGE_LEN, Record};
pub use severity::{Severity, SeverityParseError};
pub use timestamp::{Clock, write_timestamp};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{LoggerLayer, init_tracing, init_tracing_with_filter};
