//! Composite-key encoding.
//!
//! A composite key is `U+0000 objectType U+0000 (attribute U+0000)*`. The leading
//! marker keeps composite keys out of the simple-key space, and the trailing
//! delimiter after every component makes a partial key a strict prefix of every
//! key that extends it.

use crate::error::LedgerError;

/// Leading marker of every composite key.
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';
/// Delimiter written after every component.
pub const MIN_UNICODE_RUNE: char = '\u{0}';
/// Upper sentinel used to close partial composite-key ranges.
pub const MAX_UNICODE_RUNE: char = char::MAX;

/// Encodes an object type and its attributes into a composite key.
///
/// # Errors
/// Returns [`LedgerError::InvalidKey`] if any component contains `U+0000` or `U+10FFFF`.
pub fn create_composite_key<S: AsRef<str>>(
    object_type: &str,
    attributes: &[S],
) -> Result<String, LedgerError> {
    validate_component(object_type)?;

    let capacity = attributes.iter().map(|a| a.as_ref().len() + 1).sum::<usize>();
    let mut key = String::with_capacity(object_type.len() + 2 + capacity);
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(MIN_UNICODE_RUNE);

    for attribute in attributes {
        let attribute = attribute.as_ref();
        validate_component(attribute)?;
        key.push_str(attribute);
        key.push(MIN_UNICODE_RUNE);
    }

    Ok(key)
}

/// Decodes a composite key back into its object type and attributes.
///
/// # Errors
/// Returns [`LedgerError::InvalidKey`] if the key lacks the leading marker or has no
/// terminated object type.
pub fn split_composite_key(composite_key: &str) -> Result<(String, Vec<String>), LedgerError> {
    let Some(body) = composite_key.strip_prefix(COMPOSITE_KEY_NAMESPACE) else {
        return Err(LedgerError::invalid_key(format!(
            "{composite_key:?} does not start with the composite key marker"
        )));
    };

    let mut components = body.split_terminator(MIN_UNICODE_RUNE).map(str::to_owned);
    let object_type = match components.next() {
        Some(object_type) if body.ends_with(MIN_UNICODE_RUNE) => object_type,
        _ => {
            return Err(LedgerError::invalid_key(format!(
                "{composite_key:?} has no terminated object type"
            )));
        },
    };

    Ok((object_type, components.collect()))
}

/// Returns `true` when `key` lives in the composite-key space.
#[must_use]
pub fn is_composite_key(key: &str) -> bool {
    key.starts_with(COMPOSITE_KEY_NAMESPACE)
}

/// Exclusive upper bound for every key that starts with `prefix`.
#[must_use]
pub fn prefix_end(prefix: &str) -> String {
    let mut end = String::with_capacity(prefix.len() + MAX_UNICODE_RUNE.len_utf8());
    end.push_str(prefix);
    end.push(MAX_UNICODE_RUNE);
    end
}

fn validate_component(component: &str) -> Result<(), LedgerError> {
    match component.char_indices().find(|&(_, c)| c == MIN_UNICODE_RUNE || c == MAX_UNICODE_RUNE) {
        Some((position, c)) => Err(LedgerError::invalid_key(format!(
            "input contains unicode {:#X} starting at position [{position}]; \
             U+0000 and U+10FFFF are not allowed in a composite key component",
            u32::from(c)
        ))),
        None => Ok(()),
    }
}
