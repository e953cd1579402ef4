//! # Namespace
//!
//! Tenant isolation over a shared key-value ledger.
//!
//! Many independent tenants write into one physical ledger; this crate keeps
//! their keys apart without the ledger being aware of tenancy. Every key passes
//! through a reversible transformation on the way in, and range results are
//! transformed back on the way out.
//!
//! # Core Features
//!
//! - **Key prefixing**: simple keys become `namespace:key`; the mapping is a
//!   bijection for a fixed namespace and preserves lexicographic order.
//! - **Namespaced composite keys**: the object type of a composite key is
//!   qualified with the namespace while the ledger's own encoding (marker and
//!   delimiters) is left untouched.
//! - **Range translation**: bounds are translated to physical keys and the
//!   resulting cursor strips the namespace from every yielded key.
//!
//! # Architectural Overview
//!
//! 1. **[`codec`]**: pure key transformations.
//! 2. **[`NamespaceStore`]**: the [`ChainState`](nsledger_ledger::ChainState)
//!    decorator.
//! 3. **[`NamespacedCursor`]**: the range cursor wrapper.
//! 4. **[`config`]**: tenant settings loaded from file and environment.
//!
//! # Examples
//!
//! ```rust
//! use nsledger_ledger::{ChainState, MemoryLedger, StateCursor};
//! use nsledger_namespace::NamespaceStore;
//!
//! # fn main() -> Result<(), nsledger_ledger::LedgerError> {
//! let ledger = MemoryLedger::new();
//! let tenant = NamespaceStore::new("prefix", &ledger)?;
//!
//! ledger.start_transaction("tx1");
//! for (i, key) in ["key1", "key2", "key3"].into_iter().enumerate() {
//!     tenant.put_state(key, &[i as u8 + 1])?;
//! }
//! ledger.end_transaction("tx1");
//!
//! let mut cursor = tenant.get_state_by_range("key1", "key3")?;
//! let mut keys = Vec::new();
//! while cursor.has_next() {
//!     keys.push(cursor.next_entry()?.into_parts().0);
//! }
//! cursor.close()?;
//!
//! assert_eq!(keys, ["key1", "key2"]);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
mod cursor;
mod namespace;
mod store;

pub use cursor::NamespacedCursor;
pub use namespace::Namespace;
pub use store::NamespaceStore;
