//! # Ledger State
//!
//! The state contract of a transactional key-value ledger and an in-memory
//! implementation of it.
//!
//! * **[`ChainState`]**: get/put/delete by key, composite-key construction and
//!   parsing, and ordered range scans. Decorators implement the same trait as the
//!   ledger they wrap, so layers compose freely.
//! * **[`StateCursor`]**: forward-only range cursor with explicit, idempotent release.
//! * **[`composite`]**: the composite-key wire layout (`U+0000` marker and delimiters).
//! * **[`MemoryLedger`]**: an ordered in-memory ledger with transaction checks and
//!   cursor accounting, intended for tests and benchmarks.
//!
//! ## Example
//!
//! ```rust
//! use nsledger_ledger::{ChainState, MemoryLedger, StateCursor};
//!
//! # fn main() -> Result<(), nsledger_ledger::LedgerError> {
//! let ledger = MemoryLedger::new();
//! ledger.start_transaction("tx1");
//! ledger.put_state("a", &[1])?;
//! ledger.put_state("b", &[2])?;
//! ledger.end_transaction("tx1");
//!
//! let mut cursor = ledger.get_state_by_range("a", "b")?;
//! while cursor.has_next() {
//!     let kv = cursor.next_entry()?;
//!     assert_eq!(kv.key(), "a");
//! }
//! cursor.close()?;
//! # Ok(())
//! # }
//! ```

pub mod composite;
mod cursor;
mod error;
mod memory;
mod state;

pub use cursor::{CursorState, Entries, KeyValue, StateCursor};
pub use error::{LedgerError, LedgerErrorExt};
pub use memory::{MemoryCursor, MemoryLedger};
pub use state::ChainState;
