use crate::cursor::StateCursor;
use crate::error::LedgerError;
use std::sync::Arc;

/// The state capability set of a transactional key-value ledger.
///
/// Every layer of the stack implements this same contract: a backing ledger,
/// and any number of decorators wrapping it. Methods take `&self`; handles are
/// expected to be cheap to share and to synchronize internally.
pub trait ChainState {
    /// Cursor type returned by range scans.
    type Cursor: StateCursor;

    /// Reads the value stored under `key`.
    ///
    /// A missing key is not an error and yields `Ok(None)`.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Writes `value` under `key`.
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Removes `key`.
    fn del_state(&self, key: &str) -> Result<(), LedgerError>;

    /// Encodes `object_type` and `attributes` into a composite key.
    fn create_composite_key<S: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[S],
    ) -> Result<String, LedgerError>;

    /// Decodes a composite key into its object type and attributes.
    fn split_composite_key(&self, composite_key: &str)
    -> Result<(String, Vec<String>), LedgerError>;

    /// Opens a cursor over `[start_key, end_key)` in key order.
    ///
    /// An empty bound leaves that side of the range open.
    fn get_state_by_range(&self, start_key: &str, end_key: &str)
    -> Result<Self::Cursor, LedgerError>;

    /// Opens a cursor over every composite key that extends the given partial key.
    fn get_state_by_partial_composite_key<S: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[S],
    ) -> Result<Self::Cursor, LedgerError>;
}

impl<T: ChainState + ?Sized> ChainState for &T {
    type Cursor = T::Cursor;

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        (**self).put_state(key, value)
    }

    fn del_state(&self, key: &str) -> Result<(), LedgerError> {
        (**self).del_state(key)
    }

    fn create_composite_key<S: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[S],
    ) -> Result<String, LedgerError> {
        (**self).create_composite_key(object_type, attributes)
    }

    fn split_composite_key(
        &self,
        composite_key: &str,
    ) -> Result<(String, Vec<String>), LedgerError> {
        (**self).split_composite_key(composite_key)
    }

    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Self::Cursor, LedgerError> {
        (**self).get_state_by_range(start_key, end_key)
    }

    fn get_state_by_partial_composite_key<S: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[S],
    ) -> Result<Self::Cursor, LedgerError> {
        (**self).get_state_by_partial_composite_key(object_type, attributes)
    }
}

impl<T: ChainState + ?Sized> ChainState for Arc<T> {
    type Cursor = T::Cursor;

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        (**self).put_state(key, value)
    }

    fn del_state(&self, key: &str) -> Result<(), LedgerError> {
        (**self).del_state(key)
    }

    fn create_composite_key<S: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[S],
    ) -> Result<String, LedgerError> {
        (**self).create_composite_key(object_type, attributes)
    }

    fn split_composite_key(
        &self,
        composite_key: &str,
    ) -> Result<(String, Vec<String>), LedgerError> {
        (**self).split_composite_key(composite_key)
    }

    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Self::Cursor, LedgerError> {
        (**self).get_state_by_range(start_key, end_key)
    }

    fn get_state_by_partial_composite_key<S: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[S],
    ) -> Result<Self::Cursor, LedgerError> {
        (**self).get_state_by_partial_composite_key(object_type, attributes)
    }
}
