#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides the write half of the lvlog pipeline: a
//! [`LogSink`] that renders one record at a time into a reusable scratch
//! buffer and hands the finished line to an [`std::io::Write`] target in a
//! single call, plus the [`Destination`] selector that decides whether records
//! land on standard output or standard error.
//!
//! # Design
//!
//! The sink owns its writer together with a scratch [`String`] that is
//! cleared, not reallocated, before every record. Callers render into the
//! scratch through a closure so the formatting code never sees the writer and
//! the writer never sees a partial line. Wrapping the sink in a mutex (as
//! `logging::Logger` does) therefore guarantees that two records never
//! interleave their bytes.
//!
//! # Invariants
//!
//! - Every record written through [`LogSink::write_line`] ends with exactly one
//!   newline.
//! - A record reaches the writer through one `write_all` call followed by a
//!   flush.
//! - The default [`Destination`] is fixed at compile time by the `stderr`
//!   cargo feature.
//!
//! # Examples
//!
//! ```
//! use std::fmt::Write as _;
//! use logging_sink::LogSink;
//!
//! let mut sink = LogSink::new(Vec::new());
//! sink.write_line(|line| write!(line, "INF ready")).unwrap();
//! sink.write_line(|line| {
//!     line.push_str("WRN partial\n");
//!     Ok(())
//! })
//! .unwrap();
//!
//! let output = String::from_utf8(sink.into_inner()).unwrap();
//! assert_eq!(output, "INF ready\nWRN partial\n");
//! ```

mod capture;
mod destination;
mod sink;

pub use capture::CaptureBuffer;
pub use destination::{Destination, ParseDestinationError};
pub use sink::{DEFAULT_SCRATCH_CAPACITY, LogSink};
