//! Ring Module
//!
//! Consistent-hash ring mapping keys to node identifiers.
//!
//! ## Responsibilities
//! - Deterministic key → node placement
//! - Virtual-node replication for load smoothing
//! - Ordered lookup with wraparound (the ring is circular)
//! - Shared readers / exclusive writer concurrency
//!
//! ## Data Structure Choice
//! A sorted `Vec<u32>` of ring positions plus a position → owner map:
//! - Lookup is a binary search over the sorted positions
//! - Membership only grows (no removal), so append + re-sort on add is enough
//! - Both live behind a single `RwLock`; lookups never observe a
//!   partially-updated ring

mod hashring;

pub use hashring::{default_hash, HashFn, HashRing};
