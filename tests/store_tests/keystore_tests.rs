//! KeyStore Tests
//!
//! Tests verify:
//! - Basic put/get operations
//! - Last-writer-wins overwrites
//! - Miss behavior
//! - Concurrent access patterns

use std::sync::Arc;
use std::thread;

use ringkv::KeyStore;

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_store_is_empty() {
    let store = KeyStore::new("node1");
    assert_eq!(store.id(), "node1");
    assert_eq!(store.len(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_put_and_get() {
    let store = KeyStore::new("node1");

    store.put("key1", "value1");

    assert_eq!(store.get("key1"), Some("value1".to_string()));
    assert!(store.contains("key1"));
}

#[test]
fn test_get_nonexistent_key() {
    let store = KeyStore::new("node1");

    assert_eq!(store.get("nonexistent"), None);
    assert!(!store.contains("nonexistent"));
}

#[test]
fn test_put_multiple_entries() {
    let store = KeyStore::new("node1");

    store.put("key1", "value1");
    store.put("key2", "value2");
    store.put("key3", "value3");

    assert_eq!(store.len(), 3);
    assert_eq!(store.get("key1"), Some("value1".to_string()));
    assert_eq!(store.get("key2"), Some("value2".to_string()));
    assert_eq!(store.get("key3"), Some("value3".to_string()));
}

#[test]
fn test_put_overwrites_existing() {
    let store = KeyStore::new("node1");

    store.put("key1", "value1");
    store.put("key1", "value2");

    assert_eq!(store.len(), 1);
    assert_eq!(store.get("key1"), Some("value2".to_string()));
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn test_empty_key_allowed_at_this_layer() {
    // The transport rejects empty keys; the store itself does not care.
    let store = KeyStore::new("node1");

    store.put("", "value");

    assert_eq!(store.get(""), Some("value".to_string()));
}

#[test]
fn test_empty_value_allowed_at_this_layer() {
    let store = KeyStore::new("node1");

    store.put("key", "");

    assert_eq!(store.get("key"), Some(String::new()));
}

#[test]
fn test_large_value() {
    let store = KeyStore::new("node1");

    let large_value = "x".repeat(1024 * 1024); // 1 MB
    store.put("big_key", large_value.clone());

    assert_eq!(store.get("big_key"), Some(large_value));
}

#[test]
fn test_many_entries() {
    let store = KeyStore::new("node1");

    for i in 0..1000 {
        store.put(format!("key{i:04}"), format!("value{i}"));
    }

    assert_eq!(store.len(), 1000);
    assert_eq!(store.get("key0500"), Some("value500".to_string()));
}

// =============================================================================
// Concurrent Access Tests
// =============================================================================

#[test]
fn test_concurrent_reads() {
    let store = Arc::new(KeyStore::new("node1"));
    store.put("key", "value");

    let mut handles = vec![];

    for _ in 0..10 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                assert_eq!(store.get("key"), Some("value".to_string()));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_writes_disjoint_keys() {
    let store = Arc::new(KeyStore::new("node1"));

    let mut handles = vec![];

    for t in 0..10 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..10 {
                store.put(format!("key{t}_{i}"), format!("value{t}_{i}"));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // No lost updates: every key holds its last written value.
    assert_eq!(store.len(), 100);
    for t in 0..10 {
        for i in 0..10 {
            assert_eq!(
                store.get(&format!("key{t}_{i}")),
                Some(format!("value{t}_{i}"))
            );
        }
    }
}

#[test]
fn test_concurrent_writes_same_key() {
    let store = Arc::new(KeyStore::new("node1"));

    let mut handles = vec![];

    for t in 0..10 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            store.put("contested", format!("value{t}"));
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Last writer wins; which writer was last is unspecified.
    let value = store.get("contested").expect("key must exist");
    assert!(value.starts_with("value"));
    assert_eq!(store.len(), 1);
}
