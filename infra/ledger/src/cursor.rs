use crate::error::LedgerError;

/// A single key/value pair yielded by a range cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    key: String,
    value: Vec<u8>,
}

impl KeyValue {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    #[must_use]
    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.key, self.value)
    }
}

/// Lifecycle of a range cursor.
///
/// `Exhausted` is terminal for the cursor itself; a fresh range call yields a new one.
/// `Closed` is terminal and every further advance fails with
/// [`LedgerError::CursorClosed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorState {
    #[default]
    Open,
    Exhausted,
    Closed,
}

/// An ordered, forward-only cursor over a key range.
///
/// Cursors may hold resources inside the backing store, so callers must release
/// them with [`StateCursor::close`]. Implementations make `close` idempotent and
/// also release on drop, so early returns and `?` paths never leak.
pub trait StateCursor {
    /// Reports whether another entry is available. Never moves the cursor.
    fn has_next(&self) -> bool;

    /// Advances the cursor and returns the entry it moved over.
    ///
    /// # Errors
    /// Returns [`LedgerError::CursorClosed`] after `close()`, or
    /// [`LedgerError::CursorExhausted`] when no entry remains.
    fn next_entry(&mut self) -> Result<KeyValue, LedgerError>;

    /// Releases the cursor. Calling it more than once is a no-op.
    fn close(&mut self) -> Result<(), LedgerError>;

    /// Adapts the cursor into a std [`Iterator`] of entries.
    fn entries(self) -> Entries<Self>
    where
        Self: Sized,
    {
        Entries { cursor: self }
    }
}

impl<C: StateCursor + ?Sized> StateCursor for Box<C> {
    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn next_entry(&mut self) -> Result<KeyValue, LedgerError> {
        (**self).next_entry()
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        (**self).close()
    }
}

/// Iterator adapter returned by [`StateCursor::entries`].
///
/// Iteration stops as soon as the cursor reports no further entries; the cursor
/// is released when the adapter is dropped.
#[derive(Debug)]
pub struct Entries<C> {
    cursor: C,
}

impl<C: StateCursor> Entries<C> {
    /// Returns the wrapped cursor, e.g. to close it explicitly.
    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C: StateCursor> Iterator for Entries<C> {
    type Item = Result<KeyValue, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.has_next().then(|| self.cursor.next_entry())
    }
}
