use nsledger_ledger::{
    ChainState, CursorState, LedgerError, MemoryCursor, MemoryLedger, StateCursor,
};
use nsledger_namespace::{NamespaceStore, codec};
use std::sync::Arc;

fn seed_keys(ledger: &MemoryLedger, tenant: &NamespaceStore<&MemoryLedger>) {
    ledger.start_transaction("tx1");
    tenant.put_state("key1", &[1]).unwrap();
    tenant.put_state("key2", &[2]).unwrap();
    tenant.put_state("key3", &[3]).unwrap();
    ledger.end_transaction("tx1");
}

#[test]
fn test_put_state_writes_physical_key() {
    let ledger = MemoryLedger::new();
    let tenant = NamespaceStore::new("prefix", &ledger).unwrap();

    ledger.start_transaction("tx1");
    tenant.put_state("key1", b"value").unwrap();
    ledger.end_transaction("tx1");

    assert_eq!(ledger.get_state("prefix:key1").unwrap().as_deref(), Some(&b"value"[..]));
    assert_eq!(ledger.get_state("key1").unwrap(), None);
}

#[test]
fn test_get_state_reads_physical_key() {
    let ledger = MemoryLedger::new();
    ledger.start_transaction("seed");
    ledger.put_state("prefix:key1", b"value").unwrap();
    ledger.end_transaction("seed");

    let tenant = NamespaceStore::new("prefix", &ledger).unwrap();
    assert_eq!(tenant.get_state("key1").unwrap().as_deref(), Some(&b"value"[..]));
    assert_eq!(tenant.get_state("key2").unwrap(), None);
}

#[test]
fn test_store_errors_pass_through() {
    let ledger = MemoryLedger::new();
    let tenant = NamespaceStore::new("prefix", &ledger).unwrap();

    let err = tenant.put_state("key1", b"value").expect_err("expected error");
    assert!(matches!(err, LedgerError::NoTransaction { context: None, .. }));

    let err = tenant.del_state("key1").expect_err("expected error");
    assert!(matches!(err, LedgerError::NoTransaction { context: None, .. }));
}

#[test]
fn test_del_state_removes_only_own_key() {
    let ledger = MemoryLedger::new();
    let a = NamespaceStore::new("a", &ledger).unwrap();
    let b = NamespaceStore::new("b", &ledger).unwrap();

    ledger.start_transaction("tx1");
    a.put_state("shared", b"from a").unwrap();
    b.put_state("shared", b"from b").unwrap();
    a.del_state("shared").unwrap();
    ledger.end_transaction("tx1");

    assert_eq!(a.get_state("shared").unwrap(), None);
    assert_eq!(b.get_state("shared").unwrap().as_deref(), Some(&b"from b"[..]));
}

#[test]
fn test_create_and_split_composite_key() {
    let ledger = MemoryLedger::new();
    let tenant = NamespaceStore::new("p", &ledger).unwrap();
    let attributes = ["a1", "a2"];

    let key = tenant.create_composite_key("key1", &attributes).unwrap();
    assert_eq!(&key.as_bytes()[..8], &[0, 0x70, 0x3a, 0x6b, 0x65, 0x79, 0x31, 0]);

    let (object_type, split) = tenant.split_composite_key(&key).unwrap();
    assert_eq!(object_type, "key1");
    assert_eq!(split, attributes);
}

#[test]
fn test_split_foreign_composite_key() {
    let ledger = MemoryLedger::new();
    let p = NamespaceStore::new("p", &ledger).unwrap();
    let q = NamespaceStore::new("q", &ledger).unwrap();

    let key = p.create_composite_key("asset", &["a1"]).unwrap();
    assert!(matches!(q.split_composite_key(&key), Err(LedgerError::MalformedKey { .. })));

    let plain = ledger.create_composite_key("asset", &["a1"]).unwrap();
    assert!(matches!(p.split_composite_key(&plain), Err(LedgerError::MalformedKey { .. })));
}

#[test]
fn test_composite_key_stored_with_double_namespace() {
    let ledger = MemoryLedger::new();
    let tenant = NamespaceStore::new("p", &ledger).unwrap();

    let key = tenant.create_composite_key("asset", &["a1"]).unwrap();
    ledger.start_transaction("tx1");
    tenant.put_state(&key, b"v").unwrap();
    ledger.end_transaction("tx1");

    let physical = codec::to_physical("p", "\u{0}p:asset\u{0}a1\u{0}");
    assert_eq!(ledger.get_state(&physical).unwrap().as_deref(), Some(&b"v"[..]));
    assert_eq!(tenant.get_state(&key).unwrap().as_deref(), Some(&b"v"[..]));
}

#[test]
fn test_range_iterator() {
    let ledger = MemoryLedger::new();
    let tenant = NamespaceStore::new("prefix", &ledger).unwrap();
    seed_keys(&ledger, &tenant);

    assert_eq!(ledger.get_state("prefix:key1").unwrap(), Some(vec![1]));
    assert_eq!(ledger.get_state("prefix:key2").unwrap(), Some(vec![2]));
    assert_eq!(ledger.get_state("prefix:key3").unwrap(), Some(vec![3]));

    let mut cursor = tenant.get_state_by_range("key1", "key3").unwrap();
    let mut index = 1;
    while cursor.has_next() {
        let kv = cursor.next_entry().unwrap();
        assert_eq!(kv.key(), format!("key{index}"));
        assert_eq!(kv.value()[0], u8::try_from(index).unwrap());
        index += 1;
    }
    assert_eq!(index, 3);
    assert_eq!(cursor.state(), CursorState::Exhausted);

    cursor.close().unwrap();
    cursor.close().unwrap();
    assert_eq!(cursor.state(), CursorState::Closed);
    assert_eq!(ledger.open_cursors(), 0);
}

#[test]
fn test_closed_cursor_rejects_next() {
    let ledger = MemoryLedger::new();
    let tenant = NamespaceStore::new("prefix", &ledger).unwrap();
    seed_keys(&ledger, &tenant);

    let mut cursor = tenant.get_state_by_range("key1", "").unwrap();
    let first = cursor.next_entry().unwrap();
    cursor.close().unwrap();
    cursor.close().unwrap();

    assert_eq!(first.key(), "key1");
    assert!(!cursor.has_next());
    assert!(matches!(cursor.next_entry(), Err(LedgerError::CursorClosed { .. })));
    assert_eq!(ledger.open_cursors(), 0);
}

#[test]
fn test_cursor_released_on_early_return() {
    fn first_key(tenant: &NamespaceStore<&MemoryLedger>) -> Result<String, LedgerError> {
        let mut cursor = tenant.get_state_by_range("", "")?;
        let kv = cursor.next_entry()?;
        Ok(kv.into_parts().0)
    }

    let ledger = MemoryLedger::new();
    let tenant = NamespaceStore::new("prefix", &ledger).unwrap();
    seed_keys(&ledger, &tenant);

    assert_eq!(first_key(&tenant).unwrap(), "key1");
    assert_eq!(ledger.open_cursors(), 0);
}

/// Ledger whose range scans ignore their bounds.
#[derive(Debug)]
struct UnboundedScans(MemoryLedger);

impl ChainState for UnboundedScans {
    type Cursor = MemoryCursor;

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.0.get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.0.put_state(key, value)
    }

    fn del_state(&self, key: &str) -> Result<(), LedgerError> {
        self.0.del_state(key)
    }

    fn create_composite_key<S: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[S],
    ) -> Result<String, LedgerError> {
        self.0.create_composite_key(object_type, attributes)
    }

    fn split_composite_key(&self, key: &str) -> Result<(String, Vec<String>), LedgerError> {
        self.0.split_composite_key(key)
    }

    fn get_state_by_range(&self, _: &str, _: &str) -> Result<MemoryCursor, LedgerError> {
        self.0.get_state_by_range("", "")
    }

    fn get_state_by_partial_composite_key<S: AsRef<str>>(
        &self,
        _: &str,
        _: &[S],
    ) -> Result<MemoryCursor, LedgerError> {
        self.0.get_state_by_range("", "")
    }
}

#[test]
fn test_cursor_rejects_foreign_key() {
    let ledger = MemoryLedger::new();
    ledger.start_transaction("tx1");
    ledger.put_state("a:key", b"own").unwrap();
    ledger.put_state("b:key", b"foreign").unwrap();
    ledger.end_transaction("tx1");

    let tenant = NamespaceStore::new("a", UnboundedScans(ledger.clone())).unwrap();
    let mut cursor = tenant.get_state_by_range("key", "key0").unwrap();

    assert_eq!(cursor.next_entry().unwrap().key(), "key");
    assert!(matches!(
        cursor.next_entry(),
        Err(LedgerError::MalformedKey { context: Some(ref ctx), .. }) if ctx == "range cursor entry"
    ));
    assert_eq!(cursor.state(), CursorState::Exhausted);

    drop(cursor);
    assert_eq!(ledger.open_cursors(), 0);
}

#[test]
fn test_partial_composite_key_scan() {
    let ledger = MemoryLedger::new();
    let p = NamespaceStore::new("p", &ledger).unwrap();
    let q = NamespaceStore::new("q", &ledger).unwrap();

    ledger.start_transaction("tx1");
    for (store, owner) in [(&p, "p1"), (&p, "p2"), (&q, "q1")] {
        let key = store.create_composite_key("owner~asset", &["blue", owner]).unwrap();
        store.put_state(&key, owner.as_bytes()).unwrap();
    }
    let red = p.create_composite_key("owner~asset", &["red", "p3"]).unwrap();
    p.put_state(&red, b"p3").unwrap();
    ledger.end_transaction("tx1");

    let found: Vec<(String, Vec<String>)> = p
        .get_state_by_partial_composite_key("owner~asset", &["blue"])
        .unwrap()
        .entries()
        .map(|kv| p.split_composite_key(kv.unwrap().key()).unwrap())
        .collect();

    assert_eq!(
        found,
        vec![
            ("owner~asset".to_owned(), vec!["blue".to_owned(), "p1".to_owned()]),
            ("owner~asset".to_owned(), vec!["blue".to_owned(), "p2".to_owned()]),
        ]
    );
    assert_eq!(ledger.open_cursors(), 0);
}

#[test]
fn test_nested_namespaces() {
    let ledger = MemoryLedger::new();
    let org = NamespaceStore::new("org", &ledger).unwrap();
    let team = NamespaceStore::new("team", &org).unwrap();

    ledger.start_transaction("tx1");
    team.put_state("k", b"v").unwrap();
    ledger.end_transaction("tx1");

    assert_eq!(ledger.get_state("org:team:k").unwrap().as_deref(), Some(&b"v"[..]));

    let key = team.create_composite_key("t", &["x"]).unwrap();
    assert_eq!(key, "\u{0}org:team:t\u{0}x\u{0}");
    assert_eq!(team.split_composite_key(&key).unwrap(), ("t".to_owned(), vec!["x".to_owned()]));

    let keys: Vec<String> = team
        .get_state_by_range("", "")
        .unwrap()
        .entries()
        .map(|kv| kv.unwrap().into_parts().0)
        .collect();
    assert_eq!(keys, ["k"]);
}

#[test]
fn test_shared_ledger_across_threads() {
    let ledger = Arc::new(MemoryLedger::new());
    ledger.start_transaction("tx1");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tenant = NamespaceStore::new(format!("tenant{i}"), Arc::clone(&ledger)).unwrap();
            std::thread::spawn(move || {
                for n in 0..10u8 {
                    tenant.put_state(&format!("k{n}"), &[n]).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    ledger.end_transaction("tx1");

    assert_eq!(ledger.len(), 40);
    let tenant = NamespaceStore::new("tenant2", Arc::clone(&ledger)).unwrap();
    assert_eq!(tenant.get_state_by_range("", "").unwrap().entries().count(), 10);
}

/// Ledger whose every operation fails with an internal error.
#[derive(Debug)]
struct FailingLedger;

impl ChainState for FailingLedger {
    type Cursor = MemoryCursor;

    fn get_state(&self, _: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Err("state read failed".into())
    }

    fn put_state(&self, _: &str, _: &[u8]) -> Result<(), LedgerError> {
        Err("state write failed".into())
    }

    fn del_state(&self, key: &str) -> Result<(), LedgerError> {
        Err(format!("delete of {key:?} failed").into())
    }

    fn create_composite_key<S: AsRef<str>>(
        &self,
        _: &str,
        _: &[S],
    ) -> Result<String, LedgerError> {
        Err("composite key encoding failed".into())
    }

    fn split_composite_key(&self, _: &str) -> Result<(String, Vec<String>), LedgerError> {
        Err("composite key decoding failed".into())
    }

    fn get_state_by_range(&self, _: &str, _: &str) -> Result<MemoryCursor, LedgerError> {
        Err("range scan failed".into())
    }

    fn get_state_by_partial_composite_key<S: AsRef<str>>(
        &self,
        _: &str,
        _: &[S],
    ) -> Result<MemoryCursor, LedgerError> {
        Err("partial composite scan failed".into())
    }
}

fn assert_internal<T: std::fmt::Debug>(result: Result<T, LedgerError>, expected: &str) {
    match result {
        Err(LedgerError::Internal { message, context: None }) => assert_eq!(message, expected),
        other => panic!("expected internal error {expected:?}, got {other:?}"),
    }
}

#[test]
fn test_internal_errors_pass_through() {
    let tenant = NamespaceStore::new("prefix", FailingLedger).unwrap();

    assert_internal(tenant.get_state("key1"), "state read failed");
    assert_internal(tenant.put_state("key1", b"v"), "state write failed");
    assert_internal(tenant.del_state("key1"), "delete of \"prefix:key1\" failed");
    assert_internal(tenant.create_composite_key("t", &["a"]), "composite key encoding failed");
    assert_internal(tenant.split_composite_key("\u{0}prefix:t\u{0}"), "composite key decoding failed");
    assert_internal(tenant.get_state_by_range("a", "b").map(|_| ()), "range scan failed");
    assert_internal(
        tenant.get_state_by_partial_composite_key("t", &["a"]).map(|_| ()),
        "composite key encoding failed",
    );
}

#[test]
fn test_composite_key_errors_pass_through() {
    let ledger = MemoryLedger::new();
    let tenant = NamespaceStore::new("prefix", &ledger).unwrap();

    assert!(matches!(
        tenant.create_composite_key("t", &["a\u{0}"]),
        Err(LedgerError::InvalidKey { context: None, .. })
    ));
    assert!(matches!(
        tenant.split_composite_key("plain"),
        Err(LedgerError::InvalidKey { context: None, .. })
    ));
    assert!(matches!(
        tenant.get_state_by_partial_composite_key("t", &["a\u{10FFFF}"]),
        Err(LedgerError::InvalidKey { context: None, .. })
    ));
    assert_eq!(ledger.open_cursors(), 0);
}

#[test]
fn test_entries_release_through_inner_cursor() {
    let ledger = MemoryLedger::new();
    let tenant = NamespaceStore::new("prefix", &ledger).unwrap();
    seed_keys(&ledger, &tenant);

    let mut entries = tenant.get_state_by_range("", "").unwrap().entries();
    assert_eq!(entries.next().unwrap().unwrap().key(), "key1");

    let mut cursor = entries.into_inner();
    assert!(cursor.has_next());
    cursor.close().unwrap();
    assert_eq!(cursor.state(), CursorState::Closed);
    assert_eq!(ledger.open_cursors(), 0);
}
