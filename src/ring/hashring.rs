//! HashRing implementation
//!
//! Sorted-position ring with an owner map, guarded by an RwLock.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Hash function placing keys and virtual nodes on the ring.
///
/// Must be deterministic across processes: the same key has to resolve to
/// the same owner for a fixed membership, no matter which process asks.
pub type HashFn = fn(&[u8]) -> u32;

/// The default ring hash: CRC32 (IEEE).
pub fn default_hash(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Ring positions and their owners, updated together under one lock.
struct RingState {
    /// Sorted ascending; one entry per virtual node.
    positions: Vec<u32>,

    /// Position → owning node identifier.
    owners: HashMap<u32, String>,
}

/// Consistent-hash ring mapping keys to node identifiers.
///
/// Each identifier is placed at `replicas` virtual positions so that keys
/// spread evenly even with few nodes. Lookups walk clockwise: a key belongs
/// to the owner of the first position at or after its hash, wrapping past
/// the largest position back to the smallest.
///
/// `add` is not idempotent: re-adding an identifier inserts another set of
/// virtual positions. Callers register each identifier at most once (the
/// [`Cluster`](crate::cluster::Cluster) registry enforces this).
pub struct HashRing {
    /// Virtual positions per identifier, fixed at construction.
    replicas: usize,

    hash: HashFn,

    state: RwLock<RingState>,
}

impl HashRing {
    /// Create an empty ring with the default CRC32 hash.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, default_hash)
    }

    /// Create an empty ring with a custom hash function.
    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            replicas,
            hash,
            state: RwLock::new(RingState {
                positions: Vec::new(),
                owners: HashMap::new(),
            }),
        }
    }

    /// Add node identifiers to the ring.
    ///
    /// Each identifier gets `replicas` virtual positions, computed by
    /// hashing the slot index concatenated with the identifier. Positions
    /// are re-sorted once after all insertions, so a concurrent lookup sees
    /// either none or all of them.
    ///
    /// Two virtual slots hashing to the same position overwrite each other's
    /// owner entry; with a 32-bit hash this is left unguarded.
    pub fn add<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.write();
        for id in ids {
            let id = id.into();
            for slot in 0..self.replicas {
                let position = (self.hash)(format!("{slot}{id}").as_bytes());
                state.positions.push(position);
                state.owners.insert(position, id.clone());
            }
            tracing::debug!(node = %id, replicas = self.replicas, "added node to ring");
        }
        state.positions.sort_unstable();
    }

    /// Resolve the node identifier owning `key`.
    ///
    /// Returns `None` only while the ring is empty; once any identifier has
    /// been added, every key resolves to an owner.
    pub fn get(&self, key: &str) -> Option<String> {
        let state = self.state.read();
        if state.positions.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());

        // First position at or after the key's hash, wrapping to the start
        // of the ring when the hash exceeds every position.
        let idx = state.positions.partition_point(|&p| p < hash);
        let idx = if idx == state.positions.len() { 0 } else { idx };

        state.owners.get(&state.positions[idx]).cloned()
    }

    /// Number of virtual positions currently on the ring.
    pub fn len(&self) -> usize {
        self.state.read().positions.len()
    }

    /// True if no identifier has been added yet.
    pub fn is_empty(&self) -> bool {
        self.state.read().positions.is_empty()
    }

    /// Virtual positions placed per identifier.
    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("positions", &self.len())
            .finish()
    }
}
