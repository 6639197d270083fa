//! crates/cli/src/demo.rs
//! `lvlog-demo`: starts a level listener and logs at every severity.

use std::ffi::OsString;
use std::io::Write;
use std::net::{Ipv4Addr, SocketAddr};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Arg, ArgMatches, Command};
use listener::{AppIndex, MulticastConfig, SourceConfig, TcpConfig};
use logging::{
    Destination, Logger, Severity, error_log, fatal_log, info_log, init_tracing_with_filter, trace_log,
    warn_log,
};
use tracing_subscriber::EnvFilter;

use super::error::{CliError, report, report_clap};

/// Program name used in messages.
pub const PROGRAM_NAME: &str = "lvlog-demo";

/// Port the multicast listener binds when none is given.
pub const DEFAULT_PORT: u16 = 43555;

/// Filter applied to tracing events when `RUST_LOG` is unset.
pub const DEFAULT_TRACING_FILTER: &str = "lvlog=debug";

const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Parsed `lvlog-demo` options.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DemoOptions {
    /// Listener to start.
    pub source: SourceConfig,
    /// Initial threshold; the compile-time default when `None`.
    pub level: Option<Severity>,
    /// Stream for records; the compile-time default when `None`.
    pub destination: Option<Destination>,
    /// Pause between rounds of records.
    pub interval: Duration,
    /// Number of rounds; unbounded when `None`.
    pub iterations: Option<u64>,
}

fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .about("Log one record per severity in a loop while a level listener runs.")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("app-index")
                .long("app-index")
                .short('a')
                .value_name("N")
                .help("Application index (1-13) for the multicast listener.")
                .conflicts_with("tcp")
                .value_parser(|text: &str| text.parse::<AppIndex>()),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .value_name("PORT")
                .help("UDP port for the multicast listener (default 43555).")
                .conflicts_with("tcp")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("interface")
                .long("interface")
                .value_name("ADDR")
                .help("Local IPv4 address of the interface that joins the multicast group.")
                .conflicts_with("tcp")
                .value_parser(clap::value_parser!(Ipv4Addr)),
        )
        .arg(
            Arg::new("tcp")
                .long("tcp")
                .value_name("ADDR")
                .help("Run the TCP listener on ADDR instead of the multicast listener.")
                .value_parser(clap::value_parser!(SocketAddr)),
        )
        .arg(
            Arg::new("level")
                .long("level")
                .short('l')
                .value_name("LEVEL")
                .help("Initial threshold: 1-5 or fatal, error, warn, info, trace.")
                .value_parser(|text: &str| text.parse::<Severity>()),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("STREAM")
                .help("Stream that receives records: stdout or stderr.")
                .value_parser(|text: &str| text.parse::<Destination>()),
        )
        .arg(
            Arg::new("interval-ms")
                .long("interval-ms")
                .value_name("MS")
                .help("Milliseconds between rounds (default 1000).")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("iterations")
                .long("iterations")
                .short('n')
                .value_name("N")
                .help("Stop after N rounds instead of running forever.")
                .value_parser(clap::value_parser!(u64)),
        )
}

fn source_from(matches: &ArgMatches) -> SourceConfig {
    if let Some(address) = matches.get_one::<SocketAddr>("tcp") {
        return TcpConfig::new(*address).into();
    }

    let app = matches
        .get_one::<AppIndex>("app-index")
        .copied()
        .unwrap_or(AppIndex::FIRST);
    let port = matches.get_one::<u16>("port").copied().unwrap_or(DEFAULT_PORT);
    let mut config = MulticastConfig::new(app, port);
    if let Some(interface) = matches.get_one::<Ipv4Addr>("interface") {
        config = config.with_interface(*interface);
    }
    config.into()
}

/// Parses an `lvlog-demo` command line, program name included.
pub fn parse_args<I, S>(arguments: I) -> Result<DemoOptions, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let matches = clap_command().try_get_matches_from(arguments)?;
    Ok(DemoOptions {
        source: source_from(&matches),
        level: matches.get_one::<Severity>("level").copied(),
        destination: matches.get_one::<Destination>("output").copied(),
        interval: Duration::from_millis(
            matches
                .get_one::<u64>("interval-ms")
                .copied()
                .unwrap_or(DEFAULT_INTERVAL_MS),
        ),
        iterations: matches.get_one::<u64>("iterations").copied(),
    })
}

/// Emits one record at every severity, most verbose first.
pub fn emit_round(logger: &Logger, round: u64) {
    trace_log!(logger, "round {round}");
    info_log!(logger, "round {round}");
    warn_log!(logger, "round {round}");
    error_log!(logger, "round {round}");
    fatal_log!(logger, "round {round}");
}

/// Runs the demo until the requested number of rounds has been logged.
pub fn run(options: &DemoOptions) -> Result<(), CliError> {
    let mut builder = Logger::builder();
    if let Some(level) = options.level {
        builder = builder.threshold(level);
    }
    if let Some(destination) = options.destination {
        builder = builder.destination(destination);
    }
    let logger = Arc::new(builder.build());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACING_FILTER));
    if init_tracing_with_filter(Arc::clone(&logger), filter).is_err() {
        logging::diagnostic!(logger, "a tracing subscriber is already installed");
    }

    let handle = listener::spawn(options.source.clone(), Arc::clone(&logger));

    let mut round = 0;
    while options.iterations.is_none_or(|limit| round < limit) {
        emit_round(&logger, round);
        round += 1;
        if options.iterations.is_none_or(|limit| round < limit) {
            thread::sleep(options.interval);
        }
    }

    handle.shutdown()?;
    Ok(())
}

/// Runs `lvlog-demo` with explicit streams for usage output and errors.
///
/// Records themselves go to the logger's destination, not to `stdout`.
#[must_use]
pub fn run_with<I, S, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let options = match parse_args(args) {
        Ok(options) => options,
        Err(error) => return report_clap(&error, stdout, stderr),
    };

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report(PROGRAM_NAME, &error, stderr),
    }
}
