#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/listener/src/lib.rs
//!
//! # Overview
//!
//! `listener` runs a background thread that changes a [`logging::Logger`]'s
//! threshold when a control message arrives, so an operator can raise or
//! lower the verbosity of a running process without restarting it.
//!
//! Two transports are provided:
//!
//! - **Multicast**: a UDP socket joined to a group (`226.1.1.1` by default)
//!   receives ASCII control words such as `0x0014`. The low three bits carry
//!   the severity rank and the upper thirteen bits address applications, so
//!   one datagram can retarget several processes sharing the port.
//! - **TCP**: each accepted connection delivers a single ASCII digit `1`-`5`.
//!
//! # Design
//!
//! Both transports implement [`LevelSource`], which waits at most one poll
//! interval for a message and classifies it as a [`Step`]. A single
//! [`serve`] loop applies steps to the logger's level store, reports
//! malformed messages on the diagnostics stream and checks a stop flag
//! between polls. [`spawn`] binds the socket on the caller's thread and
//! moves the source into a thread named `lvlog-listener-<variant>`.
//!
//! Operational events (start, received messages, ignored requests, stop) are
//! emitted as `tracing` events with the target [`TRACING_TARGET`].
//!
//! # Errors
//!
//! Setup failures never abort the process. [`spawn`] reports them as a
//! diagnostic and returns an inert [`ListenerHandle`]; [`try_spawn`] returns
//! them as [`ListenerError`] values instead.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use listener::{SourceConfig, TcpConfig, spawn};
//! use logging::{Logger, info_log};
//!
//! let logger = Arc::new(Logger::new());
//! let handle = spawn(SourceConfig::Tcp(TcpConfig::on_port(43556)), Arc::clone(&logger));
//!
//! info_log!(logger, "serving");
//! handle.shutdown().unwrap();
//! ```

mod app_index;
mod config;
mod control_word;
mod error;
mod handle;
mod multicast;
mod source;
mod tcp;

pub use app_index::{AppIndex, AppIndexError};
pub use config::{
    DEFAULT_GROUP, DEFAULT_POLL_INTERVAL, DEFAULT_READ_TIMEOUT, MIN_TIMEOUT, MulticastConfig,
    SourceConfig, TcpConfig,
};
pub use control_word::{ControlWord, ControlWordError};
pub use error::ListenerError;
pub use handle::{ListenerHandle, spawn, spawn_multicast, try_spawn};
pub use multicast::MulticastSource;
pub use source::{IgnoreReason, LevelSource, Step, serve, step_for_rank};
pub use tcp::TcpSource;

/// `tracing` target of the listener's operational events.
pub const TRACING_TARGET: &str = "lvlog::listener";
