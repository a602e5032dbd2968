//! Error propagation: failed writes leave committed data untouched.

use crate::common::*;
use notnodb::{LimitError, Limits};
use std::sync::Arc;

fn flaky_over(inner: Arc<dyn BackingStore>) -> (Arc<FlakyStore>, Store) {
    init_tracing();
    let flaky = Arc::new(FlakyStore::new(inner));
    let store = Store::new(flaky.clone());
    (flaky, store)
}

#[test]
fn failed_upsert_leaves_record_unchanged() {
    for inner in [
        Arc::new(MemoryStore::new()) as Arc<dyn BackingStore>,
        Arc::new(SqliteStore::open_in_memory().unwrap()) as Arc<dyn BackingStore>,
    ] {
        let (flaky, store) = flaky_over(inner);
        store.put("doc.a", 1).unwrap();
        store.add("doc.list", "x").unwrap();
        let before = store.get("doc").unwrap();

        flaky.set_fail_writes(true);
        assert!(store.put("doc.a", 2).unwrap_err().is_storage());
        assert!(store.put("doc.b.c", 3).unwrap_err().is_storage());
        assert!(store.add("doc.list", "y").unwrap_err().is_storage());
        assert!(store.delete("doc.a").unwrap_err().is_storage());
        assert!(store.delete("doc").unwrap_err().is_storage());
        assert!(store.put("doc", "replaced").unwrap_err().is_storage());

        flaky.set_fail_writes(false);
        assert_eq!(store.get("doc").unwrap(), before);
    }
}

#[test]
fn retry_after_failure_succeeds() {
    let (flaky, store) = flaky_over(Arc::new(MemoryStore::new()));
    flaky.set_fail_writes(true);
    assert!(store.put("k.v", 1).is_err());
    assert_eq!(store.get("k.v").unwrap(), None);

    flaky.set_fail_writes(false);
    store.put("k.v", 1).unwrap();
    assert_eq!(store.get("k.v").unwrap(), Some(doc(json!(1))));
}

#[test]
fn rejected_add_writes_nothing() {
    let (flaky, store) = flaky_over(Arc::new(MemoryStore::new()));
    store.put("doc.name", "ann").unwrap();

    // a NotAnArray rejection happens before any write is attempted
    flaky.set_fail_writes(true);
    let err = store.add("doc.name", "x").unwrap_err();
    assert!(err.is_not_an_array(), "{:?}", err);
}

#[test]
fn corrupt_record_surfaces_as_corrupt_data() {
    init_tracing();
    let backend = Arc::new(MemoryStore::new());
    backend.upsert("broken", "broken", b"\x00\x01 not json").unwrap();
    let store = Store::new(backend);

    assert!(store.get("broken").unwrap_err().is_corrupt_data());
    assert!(store.get("broken.a").unwrap_err().is_corrupt_data());
    assert!(store.get_as::<i64>("broken.a").unwrap_err().is_corrupt_data());
    assert!(store.add("broken.list", 1).unwrap_err().is_corrupt_data());
    assert!(store.delete("broken.a").unwrap_err().is_corrupt_data());

    // replacing the whole record does not read it
    store.put("broken", json!({"ok": true})).unwrap();
    assert_eq!(store.get("broken.ok").unwrap(), Some(doc(json!(true))));
}

#[test]
fn invalid_paths_never_reach_the_backend() {
    let (flaky, store) = flaky_over(Arc::new(MemoryStore::new()));
    flaky.set_fail_writes(true);
    for key in ["", "a..b", ".lead", "trail.", "..."] {
        let err = store.put(key, 1).unwrap_err();
        assert!(err.is_invalid_path(), "{:?}: {:?}", key, err);
        assert!(err.to_string().contains("Invalid path"));
    }
}

#[test]
fn limits_reject_before_write() {
    init_tracing();
    let backend = Arc::new(MemoryStore::new());
    let store = Store::new(backend.clone()).with_limits(Limits::with_small_limits());

    let err = store.put("deep.a.b.c.d.e.f.g.h", 1).unwrap_err();
    assert!(matches!(
        err,
        Error::LimitExceeded(LimitError::PathTooLong { .. })
    ));

    let err = store.put("wide", "y".repeat(1000)).unwrap_err();
    assert!(matches!(
        err,
        Error::LimitExceeded(LimitError::DocumentTooLarge { .. })
    ));
    assert!(backend.is_empty("wide"));
}
