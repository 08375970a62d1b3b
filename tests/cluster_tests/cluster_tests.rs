//! Cluster Tests
//!
//! Tests verify:
//! - Seed node registration
//! - Routed put/get through the ring
//! - No-node and duplicate-node error paths
//! - Command execution mapping

use std::sync::Arc;
use std::thread;

use ringkv::protocol::Command;
use ringkv::{Cluster, Config, RingKvError};

fn test_config() -> Config {
    Config::builder()
        .replica_count(3)
        .seed_nodes(["node1", "node2", "node3"])
        .build()
}

// =============================================================================
// Registration Tests
// =============================================================================

#[test]
fn test_seed_nodes_registered() {
    let cluster = Cluster::new(&test_config()).unwrap();

    assert_eq!(cluster.node_count(), 3);
    assert_eq!(cluster.replicas(), 3);

    let mut ids = cluster.node_ids();
    ids.sort();
    assert_eq!(ids, vec!["node1", "node2", "node3"]);
}

#[test]
fn test_duplicate_node_rejected() {
    let cluster = Cluster::new(&test_config()).unwrap();

    let err = cluster.add_node("node1").unwrap_err();
    assert!(matches!(err, RingKvError::NodeExists(id) if id == "node1"));
    assert_eq!(cluster.node_count(), 3);
}

#[test]
fn test_empty_node_id_rejected() {
    let cluster = Cluster::new(&test_config()).unwrap();

    assert!(matches!(
        cluster.add_node(""),
        Err(RingKvError::Config(_))
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let config = Config::builder().replica_count(0).build();
    assert!(matches!(
        Cluster::new(&config),
        Err(RingKvError::Config(_))
    ));

    let config = Config::builder()
        .seed_nodes(["node1", "node1"])
        .build();
    assert!(matches!(
        Cluster::new(&config),
        Err(RingKvError::Config(_))
    ));
}

// =============================================================================
// Routing Tests
// =============================================================================

#[test]
fn test_put_then_get_roundtrip() {
    let cluster = Cluster::new(&test_config()).unwrap();

    cluster.put("foo", "bar").unwrap();

    assert_eq!(cluster.get("foo").unwrap(), Some("bar".to_string()));
}

#[test]
fn test_get_miss_is_none() {
    let cluster = Cluster::new(&test_config()).unwrap();

    assert_eq!(cluster.get("never-written").unwrap(), None);
}

#[test]
fn test_single_node_cluster_resolves_to_it() {
    let config = Config::builder()
        .replica_count(3)
        .seed_nodes(["node1"])
        .build();
    let cluster = Cluster::new(&config).unwrap();

    assert_eq!(cluster.resolve("foo").unwrap(), "node1");
}

#[test]
fn test_resolution_is_stable() {
    let cluster = Cluster::new(&test_config()).unwrap();

    for i in 0..100 {
        let key = format!("key-{i}");
        let owner = cluster.resolve(&key).unwrap();
        for _ in 0..5 {
            assert_eq!(cluster.resolve(&key).unwrap(), owner);
        }
        assert!(cluster.node_ids().contains(&owner));
    }
}

#[test]
fn test_overwrite_routes_to_same_node() {
    let cluster = Cluster::new(&test_config()).unwrap();

    cluster.put("key", "v1").unwrap();
    cluster.put("key", "v2").unwrap();

    assert_eq!(cluster.get("key").unwrap(), Some("v2".to_string()));
}

// =============================================================================
// No-Node Error Paths
// =============================================================================

#[test]
fn test_empty_cluster_has_no_owner() {
    let config = Config::builder().seed_nodes(Vec::<String>::new()).build();
    let cluster = Cluster::new(&config).unwrap();

    assert!(matches!(
        cluster.resolve("foo"),
        Err(RingKvError::NoNodeAvailable)
    ));
    assert!(matches!(
        cluster.put("foo", "bar"),
        Err(RingKvError::NoNodeAvailable)
    ));
    assert!(matches!(
        cluster.get("foo"),
        Err(RingKvError::NoNodeAvailable)
    ));
}

#[test]
fn test_node_added_later_starts_owning() {
    let config = Config::builder().seed_nodes(Vec::<String>::new()).build();
    let cluster = Cluster::new(&config).unwrap();

    cluster.add_node("late").unwrap();

    assert_eq!(cluster.resolve("foo").unwrap(), "late");
    cluster.put("foo", "bar").unwrap();
    assert_eq!(cluster.get("foo").unwrap(), Some("bar".to_string()));
}

// =============================================================================
// Command Execution Tests
// =============================================================================

#[test]
fn test_execute_ping() {
    let cluster = Cluster::new(&test_config()).unwrap();

    let reply = cluster.execute(Command::Ping).unwrap();
    assert_eq!(reply, Some(b"PONG".to_vec()));
}

#[test]
fn test_execute_put_and_get() {
    let cluster = Cluster::new(&test_config()).unwrap();

    let reply = cluster
        .execute(Command::Put {
            key: b"foo".to_vec(),
            value: b"bar".to_vec(),
        })
        .unwrap();
    assert_eq!(reply, None);

    let reply = cluster
        .execute(Command::Get {
            key: b"foo".to_vec(),
        })
        .unwrap();
    assert_eq!(reply, Some(b"bar".to_vec()));
}

#[test]
fn test_execute_get_miss_is_key_not_found() {
    let cluster = Cluster::new(&test_config()).unwrap();

    let err = cluster
        .execute(Command::Get {
            key: b"missing".to_vec(),
        })
        .unwrap_err();
    assert!(matches!(err, RingKvError::KeyNotFound));
}

#[test]
fn test_execute_resolve_names_a_registered_node() {
    let cluster = Cluster::new(&test_config()).unwrap();

    let reply = cluster
        .execute(Command::Resolve {
            key: b"foo".to_vec(),
        })
        .unwrap()
        .expect("resolve always answers on a non-empty ring");

    let id = String::from_utf8(reply).unwrap();
    assert!(cluster.node_ids().contains(&id));
}

#[test]
fn test_execute_rejects_invalid_utf8() {
    let cluster = Cluster::new(&test_config()).unwrap();

    let err = cluster
        .execute(Command::Get {
            key: vec![0xff, 0xfe],
        })
        .unwrap_err();
    assert!(matches!(err, RingKvError::Protocol(_)));
}

// =============================================================================
// Concurrent Routing Tests
// =============================================================================

#[test]
fn test_concurrent_routed_writes() {
    let cluster = Arc::new(Cluster::new(&test_config()).unwrap());

    let mut handles = vec![];

    for t in 0..8 {
        let cluster = Arc::clone(&cluster);
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                let key = format!("key-{t}-{i}");
                cluster.put(&key, &format!("value-{t}-{i}")).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    for t in 0..8 {
        for i in 0..100 {
            let key = format!("key-{t}-{i}");
            assert_eq!(
                cluster.get(&key).unwrap(),
                Some(format!("value-{t}-{i}")),
                "lost update for {key}"
            );
        }
    }
}
