//! TCP Server
//!
//! Accepts connections and dispatches to worker threads.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{bounded, Receiver, TrySendError};

use crate::cluster::Cluster;
use crate::config::Config;
use crate::error::Result;
use crate::network::Connection;

/// How often the accept loop checks the shutdown flag.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Signals a running [`Server`] to stop accepting and drain its workers.
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Request shutdown. The accept loop notices within its poll interval.
    pub fn signal(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

/// TCP server for ringkv
pub struct Server {
    config: Config,
    cluster: Arc<Cluster>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind the listener for the configured address.
    ///
    /// Binding is separate from [`run`](Self::run) so callers can learn the
    /// actual address when the config asks for an ephemeral port.
    pub fn bind(config: Config, cluster: Arc<Cluster>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        // Non-blocking accept lets the loop poll the shutdown flag.
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            cluster,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping the server from another thread.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Start the server (blocking)
    ///
    /// Accepts connections until shutdown is signalled, then drains the
    /// connection queue and joins the workers.
    pub fn run(&mut self) -> Result<()> {
        let (tx, rx) = bounded::<TcpStream>(self.config.max_connections);
        let workers = self.spawn_workers(rx)?;

        tracing::info!(
            addr = %self.local_addr()?,
            workers = self.config.worker_threads,
            "server listening"
        );

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    tracing::trace!(%peer, "accepted connection");
                    match tx.try_send(stream) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            tracing::warn!(%peer, "connection queue full, dropping");
                        }
                        Err(TrySendError::Disconnected(_)) => break,
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("accept error: {e}");
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        // Closing the channel lets workers finish queued connections and exit.
        drop(tx);
        for worker in workers {
            let _ = worker.join();
        }

        tracing::info!("server stopped");
        Ok(())
    }

    fn spawn_workers(&self, rx: Receiver<TcpStream>) -> Result<Vec<JoinHandle<()>>> {
        let mut workers = Vec::with_capacity(self.config.worker_threads);

        for i in 0..self.config.worker_threads {
            let rx = rx.clone();
            let cluster = Arc::clone(&self.cluster);
            let read_ms = self.config.read_timeout_ms;
            let write_ms = self.config.write_timeout_ms;

            let handle = thread::Builder::new()
                .name(format!("ringkv-worker-{i}"))
                .spawn(move || worker_loop(rx, cluster, read_ms, write_ms))?;
            workers.push(handle);
        }

        Ok(workers)
    }
}

/// Serve connections off the queue until the channel closes.
fn worker_loop(rx: Receiver<TcpStream>, cluster: Arc<Cluster>, read_ms: u64, write_ms: u64) {
    while let Ok(stream) = rx.recv() {
        let mut conn = match Connection::new(stream, Arc::clone(&cluster)) {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("failed to set up connection: {e}");
                continue;
            }
        };

        if let Err(e) = conn.set_timeouts(read_ms, write_ms) {
            tracing::warn!(peer = conn.peer_addr(), "failed to set timeouts: {e}");
            continue;
        }

        if let Err(e) = conn.handle() {
            tracing::warn!(peer = conn.peer_addr(), "connection error: {e}");
        }
    }
}
