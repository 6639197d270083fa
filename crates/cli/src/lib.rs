#![deny(unsafe_code)]
#![deny(missing_docs)]

//! crates/cli/src/lib.rs
//!
//! Front ends for the two command-line tools shipped with lvlog.
//!
//! - [`demo`] backs `lvlog-demo`, which starts a level listener and logs a
//!   record at every severity on a fixed interval so threshold changes are
//!   visible as they happen.
//! - [`control`] backs `lvlctl`, which sends threshold requests to running
//!   processes over UDP multicast or TCP.
//!
//! Both expose `run_with(args, stdout, stderr) -> ExitCode` so the binaries
//! stay thin and tests can drive the tools in-process. Usage errors exit with
//! [`USAGE_EXIT_CODE`] and socket failures with [`SOCKET_IO_EXIT_CODE`].

pub mod control;
pub mod demo;
mod error;

pub use error::{CliError, SOCKET_IO_EXIT_CODE, USAGE_EXIT_CODE};
