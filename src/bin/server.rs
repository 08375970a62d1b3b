//! ringkv Server Binary
//!
//! Starts the TCP server for ringkv.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use ringkv::network::Server;
use ringkv::{Cluster, Config};

/// ringkv Server
#[derive(Parser, Debug)]
#[command(name = "ringkv-server")]
#[command(about = "Distributed key-value router using consistent hashing")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    listen: String,

    /// Node identifiers to register at startup (comma-separated)
    #[arg(short, long, default_value = "node1,node2,node3", value_delimiter = ',')]
    nodes: Vec<String>,

    /// Virtual ring positions per node
    #[arg(short, long, default_value = "3")]
    replicas: usize,

    /// Connection worker threads
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Maximum queued connections
    #[arg(short = 'c', long, default_value = "1024")]
    max_connections: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ringkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("ringkv Server v{}", ringkv::VERSION);
    tracing::info!("Listen address: {}", args.listen);
    tracing::info!("Nodes: {}", args.nodes.join(", "));
    tracing::info!("Replicas per node: {}", args.replicas);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .seed_nodes(args.nodes)
        .replica_count(args.replicas)
        .worker_threads(args.workers)
        .max_connections(args.max_connections)
        .build();

    let cluster = match Cluster::new(&config) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("Failed to build cluster: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Cluster initialized with {} nodes", cluster.node_count());

    let mut server = match Server::bind(config, cluster) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind listener: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
