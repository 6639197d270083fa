//! crates/listener/src/handle.rs
//! Starting listener threads and stopping them again.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use logging::{Logger, diagnostic};

use super::app_index::AppIndex;
use super::config::{MulticastConfig, SourceConfig};
use super::error::ListenerError;
use super::multicast::MulticastSource;
use super::source::{LevelSource, serve};
use super::tcp::TcpSource;

/// Handle to a running (or inert) level listener.
///
/// Dropping the handle detaches the listener thread, which then keeps
/// serving until the process exits. Call [`shutdown`](Self::shutdown) to
/// stop it.
#[derive(Debug)]
pub struct ListenerHandle {
    local_addr: Option<SocketAddr>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<(), ListenerError>>>,
}

impl ListenerHandle {
    fn inert() -> Self {
        Self {
            local_addr: None,
            stop: Arc::new(AtomicBool::new(true)),
            thread: None,
        }
    }

    /// Reports whether the listener thread is still serving.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    /// Address the listener is bound to; `None` for an inert listener.
    #[must_use]
    pub const fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Stops the listener and waits for its thread.
    ///
    /// The thread notices the request within one poll interval.
    ///
    /// # Errors
    ///
    /// Returns the error that had already ended the listener, or
    /// [`ListenerError::Panicked`] if its thread panicked. Inert listeners
    /// return `Ok(())`.
    pub fn shutdown(mut self) -> Result<(), ListenerError> {
        self.stop.store(true, Ordering::Release);
        match self.thread.take() {
            Some(thread) => thread.join().unwrap_or(Err(ListenerError::Panicked)),
            None => Ok(()),
        }
    }
}

/// Starts the listener described by `config`.
///
/// Setup happens on the calling thread. If it fails the error is written to
/// the logger's diagnostics stream and an inert handle is returned; the
/// process keeps logging at its current threshold.
pub fn spawn(config: SourceConfig, logger: Arc<Logger>) -> ListenerHandle {
    let variant = config.variant();
    match try_spawn(config, Arc::clone(&logger)) {
        Ok(handle) => handle,
        Err(error) => {
            diagnostic!(logger, "unable to start {variant} level listener: {error}");
            ListenerHandle::inert()
        }
    }
}

/// Starts a multicast listener for a raw application index.
///
/// Indices outside `1..=13` are reported as a diagnostic and yield an inert
/// handle without any socket being opened.
pub fn spawn_multicast(app_index: u8, port: u16, logger: Arc<Logger>) -> ListenerHandle {
    match AppIndex::new(app_index) {
        Ok(app) => spawn(MulticastConfig::new(app, port).into(), logger),
        Err(error) => {
            diagnostic!(logger, "unable to start multicast level listener: {error}");
            ListenerHandle::inert()
        }
    }
}

/// Like [`spawn`], returning setup errors instead of reporting them.
///
/// # Errors
///
/// Returns the [`ListenerError`] raised while binding the socket or starting
/// the thread.
pub fn try_spawn(config: SourceConfig, logger: Arc<Logger>) -> Result<ListenerHandle, ListenerError> {
    match config {
        SourceConfig::Multicast(config) => start(MulticastSource::bind(&config)?, logger),
        SourceConfig::Tcp(config) => start(TcpSource::bind(&config)?, logger),
    }
}

fn start<S>(mut source: S, logger: Arc<Logger>) -> Result<ListenerHandle, ListenerError>
where
    S: LevelSource + Send + 'static,
{
    let local_addr = source.local_addr();
    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = Arc::clone(&stop);

    let thread = thread::Builder::new()
        .name(format!("lvlog-listener-{}", source.name()))
        .spawn(move || serve(&mut source, &logger, &thread_stop))
        .map_err(ListenerError::Spawn)?;

    Ok(ListenerHandle {
        local_addr,
        stop,
        thread: Some(thread),
    })
}
