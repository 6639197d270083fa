//! crates/cli/src/error.rs
//! Exit codes and error reporting shared by both tools.

use std::fmt;
use std::io::{self, Write};
use std::process::ExitCode;

use thiserror::Error;

/// Exit code for invalid command lines.
pub const USAGE_EXIT_CODE: u8 = 1;

/// Exit code for socket failures.
pub const SOCKET_IO_EXIT_CODE: u8 = 10;

/// Failure of a command-line tool after its arguments were accepted.
#[derive(Debug, Error)]
pub enum CliError {
    /// A socket operation failed.
    #[error("failed to {action} {target}: {source}")]
    Socket {
        /// What the tool was doing.
        action: &'static str,
        /// Address the operation targeted.
        target: String,
        /// Underlying error.
        source: io::Error,
    },
    /// The level listener stopped with an error.
    #[error(transparent)]
    Listener(#[from] listener::ListenerError),
}

impl CliError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Socket { .. } | Self::Listener(_) => SOCKET_IO_EXIT_CODE,
        }
    }
}

pub(crate) fn socket_error<T: fmt::Display>(
    action: &'static str,
    target: T,
    error: io::Error,
) -> CliError {
    CliError::Socket {
        action,
        target: target.to_string(),
        source: error,
    }
}

/// Writes `error` to `stderr` prefixed with the program name and returns the
/// matching exit code.
pub(crate) fn report<Err: Write>(program: &str, error: &CliError, stderr: &mut Err) -> ExitCode {
    let _ = writeln!(stderr, "{program}: {error}");
    ExitCode::from(error.exit_code())
}

/// Renders a clap error: help and version output go to `stdout` and succeed,
/// everything else goes to `stderr` with [`USAGE_EXIT_CODE`].
pub(crate) fn report_clap<Out: Write, Err: Write>(
    error: &clap::Error,
    stdout: &mut Out,
    stderr: &mut Err,
) -> ExitCode {
    use clap::error::ErrorKind;

    let rendered = error.render().to_string();
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = stdout.write_all(rendered.as_bytes());
            ExitCode::SUCCESS
        }
        _ => {
            let _ = stderr.write_all(rendered.as_bytes());
            ExitCode::from(USAGE_EXIT_CODE)
        }
    }
}
