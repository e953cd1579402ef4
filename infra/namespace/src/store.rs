use crate::codec;
use crate::config::TenantConfig;
use crate::cursor::NamespacedCursor;
use crate::namespace::Namespace;
use nsledger_ledger::{ChainState, LedgerError, composite};
use tracing::debug;

/// A tenant-scoped view of a shared ledger.
///
/// `NamespaceStore` implements [`ChainState`] by rewriting every key before it
/// reaches the wrapped ledger, so tenants sharing one ledger never see or clobber
/// each other's keys while the ledger itself stays unaware of tenancy.
///
/// # Key layout
/// - Simple keys are stored as `namespace:key`.
/// - Composite keys carry the namespace twice: the object type is qualified as
///   `namespace:objectType` before the ledger encodes it, and the resulting
///   composite key is prefixed again like any other key when it is stored.
///   [`create_composite_key`](ChainState::create_composite_key) therefore returns
///   a *logical* key, ready to pass to `put_state`/`get_state` on this store.
///
/// # Characteristics
/// - **Stateless**: holds only the immutable namespace and the wrapped ledger;
///   errors from the ledger are forwarded untouched.
/// - **Composable**: wraps any [`ChainState`], held by value, by reference or in
///   an `Arc`, including another `NamespaceStore`.
///
/// # Example
///
/// ```rust
/// use nsledger_ledger::{ChainState, MemoryLedger};
/// use nsledger_namespace::NamespaceStore;
///
/// # fn main() -> Result<(), nsledger_ledger::LedgerError> {
/// let ledger = MemoryLedger::new();
/// let tenant = NamespaceStore::new("prefix", &ledger)?;
///
/// ledger.start_transaction("tx1");
/// tenant.put_state("key1", b"value")?;
/// ledger.end_transaction("tx1");
///
/// assert_eq!(ledger.get_state("prefix:key1")?.as_deref(), Some(&b"value"[..]));
/// assert_eq!(tenant.get_state("key1")?.as_deref(), Some(&b"value"[..]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NamespaceStore<S> {
    namespace: Namespace,
    inner: S,
}

impl<S: ChainState> NamespaceStore<S> {
    /// Wraps `inner` in the namespace `name`.
    ///
    /// # Errors
    /// Returns [`LedgerError::InvalidNamespace`] if the name is empty or contains
    /// the `:` delimiter or a character reserved by the composite-key encoding.
    pub fn new<N>(name: N, inner: S) -> Result<Self, LedgerError>
    where
        N: TryInto<Namespace, Error = LedgerError>,
    {
        let namespace = name.try_into()?;
        debug!(namespace = %namespace, "Namespace store created");
        Ok(Self { namespace, inner })
    }

    /// Builds a store for the tenant described by `config`.
    ///
    /// # Errors
    /// Returns [`LedgerError::InvalidNamespace`] if the configured namespace is invalid.
    pub fn from_config(config: &TenantConfig, inner: S) -> Result<Self, LedgerError> {
        Self::new(&config.namespace, inner)
    }

    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn physical(&self, key: &str) -> String {
        codec::to_physical(&self.namespace, key)
    }

    /// Physical bounds for a logical range; empty bounds stay inside the
    /// namespace, and an empty start skips the composite-key space.
    fn physical_bounds(&self, start_key: &str, end_key: &str) -> (String, String) {
        let start = if start_key.is_empty() {
            codec::namespace_start(&self.namespace)
        } else {
            self.physical(start_key)
        };
        let end = if end_key.is_empty() {
            codec::namespace_end(&self.namespace)
        } else {
            self.physical(end_key)
        };
        (start, end)
    }

    fn open_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<NamespacedCursor<S::Cursor>, LedgerError> {
        let cursor = self.inner.get_state_by_range(start, end)?;
        Ok(NamespacedCursor::new(self.namespace.clone(), cursor))
    }
}

impl<S: ChainState> ChainState for NamespaceStore<S> {
    type Cursor = NamespacedCursor<S::Cursor>;

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.inner.get_state(&self.physical(key))
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::InvalidKey {
                message: "key must not be an empty string".into(),
                context: None,
            });
        }
        let physical = self.physical(key);
        self.inner.put_state(&physical, value)?;
        debug!(namespace = %self.namespace, key = ?physical, "Namespaced state written");
        Ok(())
    }

    fn del_state(&self, key: &str) -> Result<(), LedgerError> {
        let physical = self.physical(key);
        self.inner.del_state(&physical)?;
        debug!(namespace = %self.namespace, key = ?physical, "Namespaced state deleted");
        Ok(())
    }

    fn create_composite_key<A: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[A],
    ) -> Result<String, LedgerError> {
        let object_type = codec::namespace_object_type(&self.namespace, object_type);
        self.inner.create_composite_key(&object_type, attributes)
    }

    fn split_composite_key(
        &self,
        composite_key: &str,
    ) -> Result<(String, Vec<String>), LedgerError> {
        let (object_type, attributes) = self.inner.split_composite_key(composite_key)?;
        let object_type = codec::strip_object_type(&self.namespace, &object_type)?;
        Ok((object_type.to_owned(), attributes))
    }

    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Self::Cursor, LedgerError> {
        for key in [start_key, end_key] {
            if composite::is_composite_key(key) {
                return Err(LedgerError::InvalidKey {
                    message: format!("range bound {key:?} is a composite key").into(),
                    context: None,
                });
            }
        }
        let (start, end) = self.physical_bounds(start_key, end_key);
        let cursor = self.open_range(&start, &end)?;
        debug!(namespace = %self.namespace, start = ?start, end = ?end, "Range cursor opened");
        Ok(cursor)
    }

    fn get_state_by_partial_composite_key<A: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[A],
    ) -> Result<Self::Cursor, LedgerError> {
        let partial = self.create_composite_key(object_type, attributes)?;
        let end = composite::prefix_end(&partial);
        let cursor = self.open_range(&self.physical(&partial), &self.physical(&end))?;
        debug!(namespace = %self.namespace, object_type, "Partial composite key cursor opened");
        Ok(cursor)
    }
}
