//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Worker thread pool fed by a bounded channel
//! - Commands routed through Cluster

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
