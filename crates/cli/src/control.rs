//! crates/cli/src/control.rs
//! `lvlctl`: sends threshold requests to running processes.
//!
//! ```text
//! lvlctl multicast --port 43555 --apps 1,2 --level info [--group 226.1.1.1]
//! lvlctl tcp --addr 127.0.0.1:43556 --level warn
//! ```

use std::ffi::OsString;
use std::io::Write;
use std::net::{Ipv4Addr, SocketAddrV4, TcpStream, UdpSocket};
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use listener::{AppIndex, ControlWord, DEFAULT_GROUP};
use logging::Severity;

use super::error::{CliError, report, report_clap, socket_error};

/// Program name used in messages.
pub const PROGRAM_NAME: &str = "lvlctl";

/// A parsed `lvlctl` invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Request {
    /// Send a control word to a multicast group.
    Multicast {
        /// Group to send to.
        group: Ipv4Addr,
        /// Destination port.
        port: u16,
        /// Addressed applications.
        apps: Vec<AppIndex>,
        /// Requested threshold.
        level: Severity,
    },
    /// Send one digit to a TCP listener.
    Tcp {
        /// `HOST:PORT` of the listener.
        address: String,
        /// Requested threshold.
        level: Severity,
    },
}

fn level_arg() -> Arg {
    Arg::new("level")
        .long("level")
        .short('l')
        .value_name("LEVEL")
        .help("Threshold to request: 1-5 or fatal, error, warn, info, trace.")
        .required(true)
        .value_parser(|text: &str| text.parse::<Severity>())
}

fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .about("Change the log threshold of running lvlog processes.")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("multicast")
                .about("Send a control word to a multicast group.")
                .arg(
                    Arg::new("port")
                        .long("port")
                        .short('p')
                        .value_name("PORT")
                        .help("UDP port the listeners are bound to.")
                        .required(true)
                        .value_parser(clap::value_parser!(u16)),
                )
                .arg(
                    Arg::new("apps")
                        .long("apps")
                        .short('a')
                        .value_name("N[,N...]")
                        .help("Application indices (1-13) to address.")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_delimiter(',')
                        .value_parser(|text: &str| text.parse::<AppIndex>()),
                )
                .arg(
                    Arg::new("group")
                        .long("group")
                        .short('g')
                        .value_name("ADDR")
                        .help("Multicast group (default 226.1.1.1).")
                        .value_parser(clap::value_parser!(Ipv4Addr)),
                )
                .arg(level_arg()),
        )
        .subcommand(
            Command::new("tcp")
                .about("Send a single level digit to a TCP listener.")
                .arg(
                    Arg::new("addr")
                        .long("addr")
                        .value_name("HOST:PORT")
                        .help("Address of the TCP listener.")
                        .required(true),
                )
                .arg(level_arg()),
        )
}

fn level_from(matches: &ArgMatches) -> Severity {
    matches
        .get_one::<Severity>("level")
        .copied()
        .unwrap_or_default()
}

/// Parses an `lvlctl` command line, program name included.
pub fn parse_args<I, S>(arguments: I) -> Result<Request, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let matches = clap_command().try_get_matches_from(arguments)?;
    match matches.subcommand() {
        Some(("multicast", sub)) => Ok(Request::Multicast {
            group: sub
                .get_one::<Ipv4Addr>("group")
                .copied()
                .unwrap_or(DEFAULT_GROUP),
            port: sub.get_one::<u16>("port").copied().unwrap_or_default(),
            apps: sub
                .get_many::<AppIndex>("apps")
                .map(|apps| apps.copied().collect())
                .unwrap_or_default(),
            level: level_from(sub),
        }),
        Some(("tcp", sub)) => Ok(Request::Tcp {
            address: sub.get_one::<String>("addr").cloned().unwrap_or_default(),
            level: level_from(sub),
        }),
        _ => Err(clap_command().error(
            clap::error::ErrorKind::MissingSubcommand,
            "a subcommand is required",
        )),
    }
}

/// Sends `request`, returning a one-line description of what was sent.
pub fn send(request: &Request) -> Result<String, CliError> {
    match request {
        Request::Multicast {
            group,
            port,
            apps,
            level,
        } => {
            let word = ControlWord::new(*level, apps.iter().copied());
            let destination = SocketAddrV4::new(*group, *port);
            let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
                .map_err(|error| socket_error("bind sender socket for", destination, error))?;
            if group.is_multicast() {
                socket
                    .set_multicast_loop_v4(true)
                    .map_err(|error| socket_error("enable multicast loopback for", destination, error))?;
            }
            socket
                .send_to(word.to_wire().as_bytes(), destination)
                .map_err(|error| socket_error("send control word to", destination, error))?;
            Ok(format!("sent {word} to {destination}"))
        }
        Request::Tcp { address, level } => {
            let mut stream = TcpStream::connect(address.as_str())
                .map_err(|error| socket_error("connect to", address, error))?;
            let digit = b'0' + level.rank();
            stream
                .write_all(&[digit])
                .map_err(|error| socket_error("send level to", address, error))?;
            Ok(format!("sent {} to {address}", char::from(digit)))
        }
    }
}

/// Runs `lvlctl` with explicit output streams.
#[must_use]
pub fn run_with<I, S, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let request = match parse_args(args) {
        Ok(request) => request,
        Err(error) => return report_clap(&error, stdout, stderr),
    };

    match send(&request) {
        Ok(summary) => {
            let _ = writeln!(stdout, "{summary}");
            ExitCode::SUCCESS
        }
        Err(error) => report(PROGRAM_NAME, &error, stderr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SOCKET_IO_EXIT_CODE, USAGE_EXIT_CODE};
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    fn app(index: u8) -> AppIndex {
        AppIndex::new(index).expect("valid index")
    }

    #[test]
    fn parses_multicast_request_with_default_group() {
        let request = parse_args(["lvlctl", "multicast", "--port", "43555", "--apps", "1,2", "--level", "info"])
            .expect("parse");
        assert_eq!(
            request,
            Request::Multicast {
                group: DEFAULT_GROUP,
                port: 43555,
                apps: vec![app(1), app(2)],
                level: Severity::Info,
            }
        );
    }

    #[test]
    fn parses_tcp_request_with_numeric_level() {
        let request =
            parse_args(["lvlctl", "tcp", "--addr", "localhost:43556", "--level", "3"]).expect("parse");
        assert_eq!(
            request,
            Request::Tcp {
                address: "localhost:43556".to_owned(),
                level: Severity::Warn,
            }
        );
    }

    #[test]
    fn rejects_out_of_range_app_and_level() {
        assert!(parse_args(["lvlctl", "multicast", "--port", "1", "--apps", "14", "--level", "1"]).is_err());
        assert!(parse_args(["lvlctl", "tcp", "--addr", "h:1", "--level", "6"]).is_err());
    }

    #[test]
    fn usage_errors_exit_with_usage_code() {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run_with(["lvlctl", "tcp", "--level", "3"], &mut stdout, &mut stderr);
        assert_eq!(code, ExitCode::from(USAGE_EXIT_CODE));
        assert!(stdout.is_empty());
        assert!(!stderr.is_empty());
    }

    #[test]
    fn help_goes_to_stdout() {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run_with(["lvlctl", "--help"], &mut stdout, &mut stderr);
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(String::from_utf8_lossy(&stdout).contains("multicast"));
        assert!(stderr.is_empty());
    }

    #[test]
    fn tcp_request_sends_one_digit() {
        let server = TcpListener::bind("127.0.0.1:0").expect("bind");
        let address = server.local_addr().expect("address");
        let reader = thread::spawn(move || {
            let (mut stream, _) = server.accept().expect("accept");
            let mut received = Vec::new();
            stream.read_to_end(&mut received).expect("read");
            received
        });

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let addr = address.to_string();
        let code = run_with(
            ["lvlctl", "tcp", "--addr", addr.as_str(), "--level", "warn"],
            &mut stdout,
            &mut stderr,
        );

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(reader.join().expect("reader"), b"3");
        assert_eq!(String::from_utf8_lossy(&stdout), format!("sent 3 to {address}\n"));
    }

    #[test]
    fn multicast_request_sends_control_word() {
        let receiver = UdpSocket::bind("127.0.0.1:0").expect("bind");
        let port = receiver.local_addr().expect("address").port();
        let request = Request::Multicast {
            group: Ipv4Addr::LOCALHOST,
            port,
            apps: vec![app(2)],
            level: Severity::Info,
        };

        let summary = send(&request).expect("send");
        let mut buffer = [0u8; 16];
        let (len, _) = receiver.recv_from(&mut buffer).expect("receive");
        assert_eq!(&buffer[..len], b"0x0014");
        assert_eq!(summary, format!("sent 0x0014 to 127.0.0.1:{port}"));
    }

    #[test]
    fn refused_connection_exits_with_socket_code() {
        let address = TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .expect("address");
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let addr = address.to_string();
        let code = run_with(
            ["lvlctl", "tcp", "--addr", addr.as_str(), "--level", "1"],
            &mut stdout,
            &mut stderr,
        );
        assert_eq!(code, ExitCode::from(SOCKET_IO_EXIT_CODE));
        assert!(String::from_utf8_lossy(&stderr).starts_with("lvlctl: failed to connect to"));
    }
}
