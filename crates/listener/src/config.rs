//! crates/listener/src/config.rs
//! Settings for the two listener variants.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use super::app_index::AppIndex;

/// Multicast group control datagrams are sent to unless configured otherwise.
pub const DEFAULT_GROUP: Ipv4Addr = Ipv4Addr::new(226, 1, 1, 1);

/// Longest a listener blocks in one syscall before checking for shutdown.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Time an accepted TCP client has to send its level byte.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Shortest poll interval or read timeout a listener accepts. Shorter
/// durations, zero included, are raised to this value: sockets treat a zero
/// timeout as "block forever" or reject it outright.
pub const MIN_TIMEOUT: Duration = Duration::from_millis(1);

const fn at_least_min(duration: Duration) -> Duration {
    if duration.as_nanos() < MIN_TIMEOUT.as_nanos() {
        MIN_TIMEOUT
    } else {
        duration
    }
}

/// Which listener to run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SourceConfig {
    /// Control words received on a UDP multicast group.
    Multicast(MulticastConfig),
    /// Single digits received over TCP connections.
    Tcp(TcpConfig),
}

impl SourceConfig {
    /// Short name of the variant, used in thread names.
    #[must_use]
    pub const fn variant(&self) -> &'static str {
        match self {
            Self::Multicast(_) => "multicast",
            Self::Tcp(_) => "tcp",
        }
    }
}

impl From<MulticastConfig> for SourceConfig {
    fn from(config: MulticastConfig) -> Self {
        Self::Multicast(config)
    }
}

impl From<TcpConfig> for SourceConfig {
    fn from(config: TcpConfig) -> Self {
        Self::Tcp(config)
    }
}

/// Settings for the multicast listener.
///
/// The socket is always bound to `0.0.0.0:<port>`; `interface` only selects
/// the interface used to join the group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MulticastConfig {
    app: AppIndex,
    port: u16,
    group: Ipv4Addr,
    interface: Ipv4Addr,
    poll_interval: Duration,
}

impl MulticastConfig {
    /// Listener for application `app` on `port`, joining [`DEFAULT_GROUP`].
    #[must_use]
    pub const fn new(app: AppIndex, port: u16) -> Self {
        Self {
            app,
            port,
            group: DEFAULT_GROUP,
            interface: Ipv4Addr::UNSPECIFIED,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Joins `group` instead of the default.
    #[must_use]
    pub const fn with_group(mut self, group: Ipv4Addr) -> Self {
        self.group = group;
        self
    }

    /// Joins the group on `interface`.
    #[must_use]
    pub const fn with_interface(mut self, interface: Ipv4Addr) -> Self {
        self.interface = interface;
        self
    }

    /// Overrides [`DEFAULT_POLL_INTERVAL`], raised to at least
    /// [`MIN_TIMEOUT`].
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = at_least_min(interval);
        self
    }

    /// Application addressed by this listener.
    #[must_use]
    pub const fn app(&self) -> AppIndex {
        self.app
    }

    /// UDP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Multicast group.
    #[must_use]
    pub const fn group(&self) -> Ipv4Addr {
        self.group
    }

    /// Interface used for the group membership.
    #[must_use]
    pub const fn interface(&self) -> Ipv4Addr {
        self.interface
    }

    /// Receive timeout between shutdown checks.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// Settings for the TCP listener.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TcpConfig {
    address: SocketAddr,
    poll_interval: Duration,
    read_timeout: Duration,
}

impl TcpConfig {
    /// Listener bound to `address`.
    #[must_use]
    pub const fn new(address: SocketAddr) -> Self {
        Self {
            address,
            poll_interval: DEFAULT_POLL_INTERVAL,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Listener bound to `0.0.0.0:<port>`.
    #[must_use]
    pub const fn on_port(port: u16) -> Self {
        Self::new(SocketAddr::new(
            std::net::IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port,
        ))
    }

    /// Overrides [`DEFAULT_POLL_INTERVAL`], raised to at least
    /// [`MIN_TIMEOUT`].
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = at_least_min(interval);
        self
    }

    /// Overrides [`DEFAULT_READ_TIMEOUT`], raised to at least [`MIN_TIMEOUT`].
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = at_least_min(timeout);
        self
    }

    /// Address the listening socket is bound to.
    #[must_use]
    pub const fn address(&self) -> SocketAddr {
        self.address
    }

    /// Sleep between accept attempts when no client is waiting.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Read timeout applied to accepted connections.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multicast_defaults() {
        let app = AppIndex::new(3).expect("index");
        let config = MulticastConfig::new(app, 43555);
        assert_eq!(config.group(), Ipv4Addr::new(226, 1, 1, 1));
        assert_eq!(config.interface(), Ipv4Addr::UNSPECIFIED);
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(SourceConfig::from(config).variant(), "multicast");
    }

    #[test]
    fn tcp_on_port_binds_all_interfaces() {
        let config = TcpConfig::on_port(43556).with_read_timeout(Duration::from_secs(1));
        assert_eq!(config.address().to_string(), "0.0.0.0:43556");
        assert_eq!(config.read_timeout(), Duration::from_secs(1));
        assert_eq!(SourceConfig::from(config).variant(), "tcp");
    }

    #[test]
    fn zero_durations_are_raised_to_minimum() {
        let app = AppIndex::new(1).expect("index");
        let multicast = MulticastConfig::new(app, 0).with_poll_interval(Duration::ZERO);
        assert_eq!(multicast.poll_interval(), MIN_TIMEOUT);

        let tcp = TcpConfig::on_port(0)
            .with_poll_interval(Duration::ZERO)
            .with_read_timeout(Duration::from_nanos(10));
        assert_eq!(tcp.poll_interval(), MIN_TIMEOUT);
        assert_eq!(tcp.read_timeout(), MIN_TIMEOUT);

        let tcp = TcpConfig::on_port(0).with_read_timeout(Duration::from_millis(250));
        assert_eq!(tcp.read_timeout(), Duration::from_millis(250));
    }
}
