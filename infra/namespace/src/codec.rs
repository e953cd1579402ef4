//! Reversible key transformations between a tenant's logical keys and the
//! physical keys stored in the shared ledger.
//!
//! A physical key is `namespace + ':' + logical`. Because the prefix is constant
//! for a namespace, prefixing preserves the lexicographic order of logical keys,
//! and stripping it recovers the logical key exactly as long as the namespace
//! itself never contains the delimiter.

use nsledger_ledger::LedgerError;
use nsledger_ledger::composite::MAX_UNICODE_RUNE;

/// Separator between the namespace and the rest of a key.
pub const DELIMITER: char = ':';

/// Prefixes `logical` with `namespace` and the delimiter.
#[must_use]
pub fn to_physical(namespace: &str, logical: &str) -> String {
    let mut key = String::with_capacity(namespace.len() + 1 + logical.len());
    key.push_str(namespace);
    key.push(DELIMITER);
    key.push_str(logical);
    key
}

/// Strips the `namespace` prefix from `physical`.
///
/// # Errors
/// Returns [`LedgerError::MalformedKey`] if `physical` does not start with
/// `namespace` followed by the delimiter.
pub fn to_logical<'a>(namespace: &str, physical: &'a str) -> Result<&'a str, LedgerError> {
    strip_namespace(namespace, physical).ok_or_else(|| LedgerError::MalformedKey {
        message: format!("{physical:?} is not a key of namespace {namespace:?}").into(),
        context: None,
    })
}

/// Qualifies a composite-key object type with `namespace`.
#[must_use]
pub fn namespace_object_type(namespace: &str, object_type: &str) -> String {
    to_physical(namespace, object_type)
}

/// Recovers the caller's object type from a namespaced one.
///
/// # Errors
/// Returns [`LedgerError::MalformedKey`] if the object type was not qualified with
/// `namespace`.
pub fn strip_object_type<'a>(
    namespace: &str,
    namespaced_object_type: &'a str,
) -> Result<&'a str, LedgerError> {
    strip_namespace(namespace, namespaced_object_type).ok_or_else(|| LedgerError::MalformedKey {
        message: format!(
            "object type {namespaced_object_type:?} does not belong to namespace {namespace:?}"
        )
        .into(),
        context: None,
    })
}

/// Inclusive physical lower bound of the simple keys under `namespace`.
///
/// Composite keys sort between `namespace:` and this bound, so open-ended
/// scans starting here never reach them.
#[must_use]
pub fn namespace_start(namespace: &str) -> String {
    let mut key = to_physical(namespace, "");
    key.push('\u{1}');
    key
}

/// Exclusive physical upper bound of every key under `namespace`.
#[must_use]
pub fn namespace_end(namespace: &str) -> String {
    let mut key = to_physical(namespace, "");
    key.push(MAX_UNICODE_RUNE);
    key
}

fn strip_namespace<'a>(namespace: &str, key: &'a str) -> Option<&'a str> {
    key.strip_prefix(namespace)?.strip_prefix(DELIMITER)
}
