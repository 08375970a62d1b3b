//! Error types for ringkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RingKvError
pub type Result<T> = std::result::Result<T, RingKvError>;

/// Unified error type for ringkv operations
#[derive(Debug, Error)]
pub enum RingKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Routing Errors
    // -------------------------------------------------------------------------
    /// No node is registered on the ring; the key has no owner.
    #[error("no node available")]
    NoNodeAvailable,

    #[error("node already registered: {0}")]
    NodeExists(String),

    /// The ring resolved an identifier with no registered store.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("network error: {0}")]
    Network(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}
