//! In-memory transactional ledger.
//!
//! [`MemoryLedger`] keeps state in an ordered map behind a lock and enforces the
//! same rules as a real peer ledger: writes require an active transaction, range
//! bounds must be simple keys, and composite keys are only reachable through
//! partial composite-key queries.

use crate::composite;
use crate::cursor::{CursorState, KeyValue, StateCursor};
use crate::error::LedgerError;
use crate::state::ChainState;
use parking_lot::RwLock;
use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct LedgerInner {
    state: BTreeMap<String, Vec<u8>>,
    tx_id: Option<String>,
}

/// A thread-safe, cheaply cloneable in-memory ledger.
///
/// Clones share the same state, transaction slot and cursor accounting.
///
/// # Example
///
/// ```rust
/// use nsledger_ledger::{ChainState, MemoryLedger};
///
/// let ledger = MemoryLedger::new();
/// ledger.start_transaction("tx1");
/// ledger.put_state("asset1", b"blue").unwrap();
/// ledger.end_transaction("tx1");
///
/// assert_eq!(ledger.get_state("asset1").unwrap().as_deref(), Some(&b"blue"[..]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    inner: Arc<RwLock<LedgerInner>>,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a transaction. Writes are rejected until one is active.
    pub fn start_transaction(&self, tx_id: impl Into<String>) {
        let tx_id = tx_id.into();
        debug!(tx_id = %tx_id, "Transaction started");
        self.inner.write().tx_id = Some(tx_id);
    }

    /// Ends the active transaction if its id matches `tx_id`.
    pub fn end_transaction(&self, tx_id: &str) {
        let mut inner = self.inner.write();
        if inner.tx_id.as_deref() == Some(tx_id) {
            inner.tx_id = None;
            debug!(tx_id, "Transaction ended");
        } else {
            warn!(tx_id, active = ?inner.tx_id, "Ending a transaction that is not active");
        }
    }

    /// Returns the id of the active transaction, if any.
    #[must_use]
    pub fn transaction_id(&self) -> Option<String> {
        self.inner.read().tx_id.clone()
    }

    /// Number of entries currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().state.len()
    }

    /// Number of cursors opened and not yet released.
    #[must_use]
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::Acquire)
    }

    /// Runs `write` under the write guard, provided a transaction is active.
    ///
    /// The transaction check and the mutation share one guard, so a concurrent
    /// `end_transaction` cannot slip in between them.
    fn with_transaction<T>(
        &self,
        op: &'static str,
        write: impl FnOnce(&mut BTreeMap<String, Vec<u8>>) -> T,
    ) -> Result<T, LedgerError> {
        let mut inner = self.inner.write();
        if inner.tx_id.is_none() {
            return Err(LedgerError::NoTransaction {
                message: format!("cannot {op} without a transaction").into(),
                context: None,
            });
        }
        Ok(write(&mut inner.state))
    }

    fn scan(&self, start_key: &str, end_key: &str) -> MemoryCursor {
        let lower = if start_key.is_empty() { Bound::Unbounded } else { Bound::Included(start_key) };
        let upper = if end_key.is_empty() { Bound::Unbounded } else { Bound::Excluded(end_key) };

        let inverted = matches!((lower, upper), (Bound::Included(s), Bound::Excluded(e)) if s >= e);

        let entries: VecDeque<KeyValue> = if inverted {
            VecDeque::new()
        } else {
            self.inner
                .read()
                .state
                .range::<str, _>((lower, upper))
                .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
                .collect()
        };

        debug!(start_key, end_key, entries = entries.len(), "Range cursor opened");
        MemoryCursor::new(entries, Arc::clone(&self.open_cursors))
    }
}

impl ChainState for MemoryLedger {
    type Cursor = MemoryCursor;

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.inner.read().state.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::invalid_key("key must not be an empty string"));
        }
        self.with_transaction("put state", |state| {
            state.insert(key.to_owned(), value.to_vec());
        })?;
        debug!(key, bytes = value.len(), "State written");
        Ok(())
    }

    fn del_state(&self, key: &str) -> Result<(), LedgerError> {
        self.with_transaction("delete state", |state| {
            state.remove(key);
        })?;
        debug!(key, "State deleted");
        Ok(())
    }

    fn create_composite_key<S: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[S],
    ) -> Result<String, LedgerError> {
        composite::create_composite_key(object_type, attributes)
    }

    fn split_composite_key(
        &self,
        composite_key: &str,
    ) -> Result<(String, Vec<String>), LedgerError> {
        composite::split_composite_key(composite_key)
    }

    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Self::Cursor, LedgerError> {
        for key in [start_key, end_key] {
            if composite::is_composite_key(key) {
                return Err(LedgerError::invalid_key(format!(
                    "first character of the key {key:?} is a null character, which is reserved for composite keys"
                )));
            }
        }
        Ok(self.scan(start_key, end_key))
    }

    fn get_state_by_partial_composite_key<S: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[S],
    ) -> Result<Self::Cursor, LedgerError> {
        let start_key = composite::create_composite_key(object_type, attributes)?;
        let end_key = composite::prefix_end(&start_key);
        Ok(self.scan(&start_key, &end_key))
    }
}

/// Cursor over a snapshot of a [`MemoryLedger`] range.
///
/// Entries are captured when the cursor opens; later writes are not observed.
#[derive(Debug)]
pub struct MemoryCursor {
    entries: VecDeque<KeyValue>,
    state: CursorState,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryCursor {
    fn new(entries: VecDeque<KeyValue>, open_cursors: Arc<AtomicUsize>) -> Self {
        open_cursors.fetch_add(1, Ordering::AcqRel);
        let state = if entries.is_empty() { CursorState::Exhausted } else { CursorState::Open };
        Self { entries, state, open_cursors }
    }

    #[must_use]
    pub const fn state(&self) -> CursorState {
        self.state
    }
}

impl StateCursor for MemoryCursor {
    fn has_next(&self) -> bool {
        self.state != CursorState::Closed && !self.entries.is_empty()
    }

    fn next_entry(&mut self) -> Result<KeyValue, LedgerError> {
        if self.state == CursorState::Closed {
            return Err(LedgerError::cursor_closed());
        }
        let entry = self.entries.pop_front().ok_or_else(LedgerError::cursor_exhausted)?;
        if self.entries.is_empty() {
            self.state = CursorState::Exhausted;
        }
        Ok(entry)
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        if self.state != CursorState::Closed {
            self.state = CursorState::Closed;
            self.entries.clear();
            self.open_cursors.fetch_sub(1, Ordering::AcqRel);
        }
        Ok(())
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
