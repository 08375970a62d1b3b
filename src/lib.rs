//! # ringkv
//!
//! A distributed key-value router that spreads keys across logical storage
//! nodes with consistent hashing:
//! - Virtual-node replication for smooth load distribution
//! - Deterministic placement (CRC32 by default, pluggable hash)
//! - Shared/exclusive locking for concurrent lookups and writes
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                  (Multiple Clients)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Cluster                                 │
//! │           (node registry + request routing)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  HashRing   │          │  KeyStore   │
//!   │ (key→node)  │          │ (per node)  │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! A request resolves its key to an owning node identifier on the ring, then
//! reads or writes that node's store. A key has exactly one current owner:
//! the configured replica count controls virtual ring positions per node,
//! not data redundancy.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod ring;
pub mod store;
pub mod cluster;
pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, RingKvError};
pub use config::Config;
pub use cluster::Cluster;
pub use ring::HashRing;
pub use store::KeyStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ringkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
