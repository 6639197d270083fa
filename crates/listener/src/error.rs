//! crates/listener/src/error.rs
//! Errors raised while setting up or running a level listener.

use std::fmt;
use std::io;
use std::net::SocketAddr;

use thiserror::Error;

use super::app_index::AppIndexError;

/// Failure of a level listener.
///
/// Every variant is terminal for the listener that produced it. Malformed
/// control messages are not errors at this level; they are reported as
/// diagnostics and the listener keeps running.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The application index does not address any bit of the control word.
    #[error("invalid application index: {0}")]
    AppIndex(#[from] AppIndexError),
    /// A socket operation failed.
    #[error("failed to {action} {target}: {source}")]
    Socket {
        /// What the listener was doing, e.g. `bind listener`.
        action: &'static str,
        /// Address or group the operation targeted.
        target: String,
        /// Underlying error.
        source: io::Error,
    },
    /// The listener thread could not be started.
    #[error("failed to spawn level listener thread: {0}")]
    Spawn(#[source] io::Error),
    /// The listener thread panicked.
    #[error("level listener thread panicked")]
    Panicked,
}

impl ListenerError {
    /// Underlying I/O error, if any.
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Socket { source, .. } | Self::Spawn(source) => Some(source),
            Self::AppIndex(_) | Self::Panicked => None,
        }
    }
}

pub(crate) fn socket_error<T: fmt::Display>(
    action: &'static str,
    target: T,
    error: io::Error,
) -> ListenerError {
    ListenerError::Socket {
        action,
        target: target.to_string(),
        source: error,
    }
}

pub(crate) fn bind_error(address: SocketAddr, error: io::Error) -> ListenerError {
    socket_error("bind listener", address, error)
}

pub(crate) fn accept_error(address: SocketAddr, error: io::Error) -> ListenerError {
    socket_error("accept connection on", address, error)
}

pub(crate) fn receive_error(address: SocketAddr, error: io::Error) -> ListenerError {
    socket_error("receive control datagram on", address, error)
}
