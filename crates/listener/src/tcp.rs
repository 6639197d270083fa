//! crates/listener/src/tcp.rs
//! Single-digit threshold requests accepted over TCP.

use std::io::{self, Read};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};

use super::TRACING_TARGET;
use super::config::TcpConfig;
use super::error::{ListenerError, accept_error, bind_error, socket_error};
use super::source::{IgnoreReason, LevelSource, Step, step_for_rank};

/// Level source accepting one connection at a time and reading one byte
/// from each.
#[derive(Debug)]
pub struct TcpSource {
    listener: TcpListener,
    address: SocketAddr,
    poll_interval: Duration,
    read_timeout: Duration,
}

impl TcpSource {
    /// Binds the listening socket with a backlog of one.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Socket`] naming the step that failed.
    pub fn bind(config: &TcpConfig) -> Result<Self, ListenerError> {
        let requested = config.address();
        let socket = Socket::new(Domain::for_address(requested), Type::STREAM, Some(Protocol::TCP))
            .map_err(|error| socket_error("create listener socket for", requested, error))?;
        socket
            .set_reuse_address(true)
            .map_err(|error| socket_error("set SO_REUSEADDR on", requested, error))?;
        socket
            .bind(&requested.into())
            .map_err(|error| bind_error(requested, error))?;
        socket
            .listen(1)
            .map_err(|error| socket_error("listen on", requested, error))?;
        socket
            .set_nonblocking(true)
            .map_err(|error| socket_error("set non-blocking mode on", requested, error))?;

        let listener = TcpListener::from(socket);
        let address = listener.local_addr().unwrap_or(requested);
        Ok(Self {
            listener,
            address,
            poll_interval: config.poll_interval(),
            read_timeout: config.read_timeout(),
        })
    }

    /// Classifies the byte read from a connection; `None` means the peer
    /// closed without sending anything.
    #[must_use]
    pub fn classify(byte: Option<u8>) -> Step {
        match byte {
            None => Step::Ignored(IgnoreReason::NoData),
            Some(digit @ b'0'..=b'9') => step_for_rank(digit - b'0'),
            Some(other) => Step::Ignored(IgnoreReason::NotADigit(other)),
        }
    }

    fn read_level(&self, mut stream: TcpStream, peer: SocketAddr) -> Step {
        let prepared = stream
            .set_nonblocking(false)
            .and_then(|()| stream.set_read_timeout(Some(self.read_timeout)));
        if let Err(error) = prepared {
            tracing::debug!(target: TRACING_TARGET, %peer, %error, "failed to configure connection");
            return Step::Ignored(IgnoreReason::ReadFailed);
        }

        let mut byte = [0u8; 1];
        loop {
            match stream.read(&mut byte) {
                Ok(0) => return Self::classify(None),
                Ok(_) => return Self::classify(Some(byte[0])),
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => {
                    tracing::debug!(target: TRACING_TARGET, %peer, %error, "failed to read level byte");
                    return Step::Ignored(IgnoreReason::ReadFailed);
                }
            }
        }
    }
}

impl LevelSource for TcpSource {
    fn name(&self) -> &'static str {
        "tcp"
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        Some(self.address)
    }

    fn poll(&mut self) -> Result<Step, ListenerError> {
        match self.listener.accept() {
            Ok((stream, peer)) => {
                tracing::debug!(target: TRACING_TARGET, %peer, "control connection accepted");
                Ok(self.read_level(stream, peer))
            }
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(self.poll_interval);
                Ok(Step::Idle)
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => Ok(Step::Idle),
            Err(error) => Err(accept_error(self.address, error)),
        }
    }
}
