//! crates/listener/src/multicast.rs
//! Control words received on a UDP multicast group.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};

use super::TRACING_TARGET;
use super::app_index::AppIndex;
use super::config::MulticastConfig;
use super::control_word::ControlWord;
use super::error::{ListenerError, bind_error, receive_error, socket_error};
use super::source::{IgnoreReason, LevelSource, Step, step_for_rank};

/// Datagrams larger than this are truncated by the kernel; only the first
/// [`ControlWord::WIRE_LEN`] bytes are inspected anyway.
const RECEIVE_BUFFER_LEN: usize = 64;

/// Level source reading control words from a multicast group.
///
/// Several processes on one host can listen on the same port because the
/// socket sets `SO_REUSEADDR` (and `SO_REUSEPORT` where available); each
/// reacts only to words whose mask includes its [`AppIndex`].
#[derive(Debug)]
pub struct MulticastSource {
    socket: UdpSocket,
    app: AppIndex,
    local_addr: Option<SocketAddr>,
}

impl MulticastSource {
    /// Creates the socket, binds `0.0.0.0:<port>` and joins the group.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Socket`] naming the step that failed.
    pub fn bind(config: &MulticastConfig) -> Result<Self, ListenerError> {
        let address = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, config.port()));
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(|error| socket_error("create multicast socket for", address, error))?;

        socket
            .set_reuse_address(true)
            .map_err(|error| socket_error("set SO_REUSEADDR on", address, error))?;
        #[cfg(all(
            unix,
            not(any(target_os = "solaris", target_os = "illumos", target_os = "cygwin"))
        ))]
        socket
            .set_reuse_port(true)
            .map_err(|error| socket_error("set SO_REUSEPORT on", address, error))?;

        socket
            .bind(&address.into())
            .map_err(|error| bind_error(address, error))?;
        socket
            .join_multicast_v4(&config.group(), &config.interface())
            .map_err(|error| socket_error("join multicast group", config.group(), error))?;
        socket
            .set_read_timeout(Some(config.poll_interval()))
            .map_err(|error| socket_error("set read timeout on", address, error))?;

        let socket = UdpSocket::from(socket);
        let local_addr = socket.local_addr().ok();
        Ok(Self {
            socket,
            app: config.app(),
            local_addr,
        })
    }

    /// Application this source reacts to.
    #[must_use]
    pub const fn app(&self) -> AppIndex {
        self.app
    }

    /// Classifies one datagram for application `app`.
    #[must_use]
    pub fn classify(datagram: &[u8], app: AppIndex) -> Step {
        match ControlWord::parse(datagram) {
            Err(error) => Step::Rejected(error),
            Ok(word) if !word.addresses(app) => Step::Ignored(IgnoreReason::NotAddressed),
            Ok(word) => step_for_rank(word.requested_rank()),
        }
    }
}

impl LevelSource for MulticastSource {
    fn name(&self) -> &'static str {
        "multicast"
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    fn poll(&mut self) -> Result<Step, ListenerError> {
        let mut buffer = [0u8; RECEIVE_BUFFER_LEN];
        match self.socket.recv_from(&mut buffer) {
            Ok((len, peer)) => {
                let datagram = &buffer[..len];
                tracing::debug!(
                    target: TRACING_TARGET,
                    %peer,
                    bytes = len,
                    payload = %String::from_utf8_lossy(&datagram[..len.min(ControlWord::WIRE_LEN)]),
                    "control datagram received"
                );
                Ok(Self::classify(datagram, self.app))
            }
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(Step::Idle)
            }
            Err(error) => {
                let address = self
                    .local_addr
                    .unwrap_or(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)));
                Err(receive_error(address, error))
            }
        }
    }
}
