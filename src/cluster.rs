//! Cluster Module
//!
//! The node registry and request router that ties the core together.
//!
//! ## Responsibilities
//! - Own the hash ring and the per-node stores
//! - Register nodes (store creation + ring membership, exactly once per id)
//! - Route put/get requests: resolve the owner, delegate to its store
//!
//! ## Concurrency Model
//!
//! - The ring and each store carry their own `RwLock`; the registry map has
//!   a third. No lock is held across a call into another component, so a
//!   request takes the locks one at a time: ring (read), registry (read),
//!   store (read or write).
//! - Resolution and the store access are not atomic as a pair. Membership
//!   only grows, and a request's resolved identifier is fixed before the
//!   store call, so the worst case is a key answered by the node that owned
//!   it at resolve time.
//!
//! Nodes are never removed, stores are never persisted, and a key lives on
//! exactly one node. Rebalancing on membership change is out of scope.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::{Result, RingKvError};
use crate::protocol::Command;
use crate::ring::HashRing;
use crate::store::KeyStore;

/// Node registry + request router.
///
/// Constructed once at startup and shared (behind `Arc`) with the transport
/// layer; there is no ambient global instance.
pub struct Cluster {
    /// Key → node identifier placement.
    ring: HashRing,

    /// Registered stores by node identifier. This map is the single source
    /// of truth for live nodes; the ring only ever sees identifiers that
    /// are present here.
    nodes: RwLock<HashMap<String, Arc<KeyStore>>>,
}

impl Cluster {
    /// Build a cluster from configuration and register its seed nodes.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let cluster = Self {
            ring: HashRing::new(config.replica_count),
            nodes: RwLock::new(HashMap::new()),
        };

        for id in &config.seed_nodes {
            cluster.add_node(id)?;
        }

        Ok(cluster)
    }

    /// Register a node: create its store and place it on the ring.
    ///
    /// The ring itself tolerates duplicate adds (and would duplicate the
    /// virtual positions); the registry is where add-once is enforced.
    pub fn add_node(&self, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(RingKvError::Config(
                "node identifier must be non-empty".to_string(),
            ));
        }

        {
            let mut nodes = self.nodes.write();
            if nodes.contains_key(id) {
                return Err(RingKvError::NodeExists(id.to_string()));
            }
            nodes.insert(id.to_string(), Arc::new(KeyStore::new(id)));
        }

        // Registry insert first, ring second: a lookup racing this add may
        // miss the new node entirely, but can never resolve to an id with
        // no store behind it.
        self.ring.add([id]);
        tracing::info!(node = %id, "registered node");
        Ok(())
    }

    /// Resolve the node identifier owning `key`.
    pub fn resolve(&self, key: &str) -> Result<String> {
        self.ring.get(key).ok_or(RingKvError::NoNodeAvailable)
    }

    /// Write `key = value` on the owning node's store.
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        let id = self.resolve(key)?;
        let store = self.store(&id)?;
        store.put(key, value);
        tracing::trace!(node = %id, key, "put");
        Ok(())
    }

    /// Read `key` from the owning node's store.
    ///
    /// `Ok(None)` is a miss on the owning node, distinct from the
    /// no-node-registered error.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let id = self.resolve(key)?;
        let store = self.store(&id)?;
        Ok(store.get(key))
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Option<Vec<u8>>> {
        match command {
            Command::Get { key } => {
                let key = decode_utf8(&key)?;
                let value = self.get(&key)?.ok_or(RingKvError::KeyNotFound)?;
                Ok(Some(value.into_bytes()))
            }
            Command::Put { key, value } => {
                let key = decode_utf8(&key)?;
                let value = decode_utf8(&value)?;
                self.put(&key, &value)?;
                Ok(None)
            }
            Command::Resolve { key } => {
                let key = decode_utf8(&key)?;
                Ok(Some(self.resolve(&key)?.into_bytes()))
            }
            Command::Ping => Ok(Some(b"PONG".to_vec())),
        }
    }

    fn store(&self, id: &str) -> Result<Arc<KeyStore>> {
        self.nodes
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| RingKvError::UnknownNode(id.to_string()))
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of registered nodes
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// Identifiers of all registered nodes (unordered)
    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.read().keys().cloned().collect()
    }

    /// Virtual ring positions per node
    pub fn replicas(&self) -> usize {
        self.ring.replicas()
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| RingKvError::Protocol("invalid UTF-8 in request".to_string()))
}
