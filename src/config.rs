//! Configuration for ringkv
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, RingKvError};

/// Main configuration for a ringkv instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Ring Configuration
    // -------------------------------------------------------------------------
    /// Virtual ring positions placed per node identifier.
    ///
    /// Controls load smoothing only; a key always has exactly one owner.
    pub replica_count: usize,

    /// Node identifiers registered at startup.
    pub seed_nodes: Vec<String>,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Worker threads handling client connections
    pub worker_threads: usize,

    /// Max queued connections waiting for a worker
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            replica_count: 3,
            seed_nodes: vec![
                "node1".to_string(),
                "node2".to_string(),
                "node3".to_string(),
            ],
            listen_addr: "127.0.0.1:7070".to_string(),
            worker_threads: 8,
            max_connections: 1024,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the configuration for values the cluster cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.replica_count == 0 {
            return Err(RingKvError::Config(
                "replica_count must be positive".to_string(),
            ));
        }
        if self.listen_addr.is_empty() {
            return Err(RingKvError::Config("listen_addr is empty".to_string()));
        }
        if self.worker_threads == 0 {
            return Err(RingKvError::Config(
                "worker_threads must be positive".to_string(),
            ));
        }
        if self.seed_nodes.iter().any(|id| id.is_empty()) {
            return Err(RingKvError::Config(
                "seed node identifiers must be non-empty".to_string(),
            ));
        }
        let mut seen = self.seed_nodes.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.seed_nodes.len() {
            return Err(RingKvError::Config(
                "duplicate seed node identifier".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the virtual ring positions per node
    pub fn replica_count(mut self, count: usize) -> Self {
        self.config.replica_count = count;
        self
    }

    /// Set the node identifiers registered at startup
    pub fn seed_nodes<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.seed_nodes = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of connection worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the maximum number of queued connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
