use crate::codec;
use crate::namespace::Namespace;
use nsledger_ledger::{CursorState, KeyValue, LedgerError, LedgerErrorExt, StateCursor};
use tracing::{debug, warn};

/// A range cursor that hands out logical keys.
///
/// Wraps the cursor of the underlying ledger and strips the namespace prefix from
/// every key it yields. The wrapped cursor is released on [`StateCursor::close`]
/// or, failing that, when the wrapper is dropped.
#[derive(Debug)]
pub struct NamespacedCursor<C: StateCursor> {
    namespace: Namespace,
    inner: C,
    state: CursorState,
}

impl<C: StateCursor> NamespacedCursor<C> {
    pub(crate) fn new(namespace: Namespace, inner: C) -> Self {
        let state = if inner.has_next() { CursorState::Open } else { CursorState::Exhausted };
        Self { namespace, inner, state }
    }

    #[must_use]
    pub const fn state(&self) -> CursorState {
        self.state
    }

    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }
}

impl<C: StateCursor> StateCursor for NamespacedCursor<C> {
    fn has_next(&self) -> bool {
        self.state != CursorState::Closed && self.inner.has_next()
    }

    fn next_entry(&mut self) -> Result<KeyValue, LedgerError> {
        if self.state == CursorState::Closed {
            return Err(LedgerError::CursorClosed {
                message: format!("range cursor of namespace {:?} was closed", self.namespace.as_str())
                    .into(),
                context: None,
            });
        }

        let (physical, value) = self.inner.next_entry()?.into_parts();
        if !self.inner.has_next() {
            self.state = CursorState::Exhausted;
        }

        let logical = codec::to_logical(&self.namespace, &physical).context("range cursor entry")?;
        Ok(KeyValue::new(logical, value))
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        if self.state == CursorState::Closed {
            return Ok(());
        }
        self.state = CursorState::Closed;
        debug!(namespace = %self.namespace, "Range cursor closed");
        self.inner.close()
    }
}

impl<C: StateCursor> Drop for NamespacedCursor<C> {
    fn drop(&mut self) {
        if self.state == CursorState::Closed {
            return;
        }
        if let Err(err) = self.close() {
            warn!(namespace = %self.namespace, error = %err, "Range cursor release failed");
        }
    }
}
