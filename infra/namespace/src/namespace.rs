use crate::codec::DELIMITER;
use nsledger_ledger::LedgerError;
use nsledger_ledger::composite::{MAX_UNICODE_RUNE, MIN_UNICODE_RUNE};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A validated tenant identifier.
///
/// # Constraints
/// - Must not be empty.
/// - Must not contain the key delimiter (`:`), otherwise the physical key of one
///   namespace could be read as the key of another.
/// - Must not contain `U+0000` or `U+10FFFF`, which are reserved by the
///   composite-key encoding.
///
/// Cloning is cheap; the name is reference-counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(Arc<str>);

impl Namespace {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Namespace {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, LedgerError> {
        if value.is_empty() {
            return Err(LedgerError::InvalidNamespace {
                message: "EMPTY".into(),
                context: Some("Namespace cannot be empty".into()),
            });
        }

        if let Some(c) =
            value.chars().find(|&c| c == DELIMITER || c == MIN_UNICODE_RUNE || c == MAX_UNICODE_RUNE)
        {
            return Err(LedgerError::InvalidNamespace {
                message: value.to_owned().into(),
                context: Some(
                    format!("Namespace contains reserved character {:#X}", u32::from(c)).into(),
                ),
            });
        }

        Ok(Self(Arc::from(value)))
    }
}

impl TryFrom<String> for Namespace {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, LedgerError> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&String> for Namespace {
    type Error = LedgerError;

    fn try_from(value: &String) -> Result<Self, LedgerError> {
        Self::try_from(value.as_str())
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for Namespace {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
