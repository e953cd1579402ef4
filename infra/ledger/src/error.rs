use std::borrow::Cow;

/// Errors produced by any [`ChainState`](crate::ChainState) implementation.
///
/// The set is shared by every layer of the state contract so that a decorator
/// can forward its collaborator's failures without translating them.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A write was attempted while no transaction is active.
    #[error("No active transaction{}: {message}", format_context(.context))]
    NoTransaction { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A key or composite-key component violates the encoding rules.
    #[error("Invalid key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A key does not carry the namespace prefix it is expected to carry.
    #[error("Malformed key{}: {message}", format_context(.context))]
    MalformedKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A namespace value was rejected at construction.
    #[error("Invalid namespace{}: {message}", format_context(.context))]
    InvalidNamespace { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The cursor was used after `close()`.
    #[error("Cursor closed{}: {message}", format_context(.context))]
    CursorClosed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The cursor was advanced past its last entry.
    #[error("Cursor exhausted{}: {message}", format_context(.context))]
    CursorExhausted { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Store-level failure reported by a backend.
    #[error("Internal ledger fault{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl LedgerError {
    pub(crate) fn invalid_key(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidKey { message: message.into(), context: None }
    }

    pub(crate) fn cursor_closed() -> Self {
        Self::CursorClosed { message: "cursor was already closed".into(), context: None }
    }

    pub(crate) fn cursor_exhausted() -> Self {
        Self::CursorExhausted { message: "next called without a remaining entry".into(), context: None }
    }

    fn context_mut(&mut self) -> &mut Option<Cow<'static, str>> {
        match self {
            Self::NoTransaction { context, .. }
            | Self::InvalidKey { context, .. }
            | Self::MalformedKey { context, .. }
            | Self::InvalidNamespace { context, .. }
            | Self::CursorClosed { context, .. }
            | Self::CursorExhausted { context, .. }
            | Self::Internal { context, .. } => context,
        }
    }
}

/// Attaches a human-readable context to a failing [`LedgerError`] result.
pub trait LedgerErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, LedgerError>;
}

impl<T> LedgerErrorExt<T> for Result<T, LedgerError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            *e.context_mut() = Some(context.into());
            e
        })
    }
}

impl From<&'static str> for LedgerError {
    #[inline]
    fn from(s: &'static str) -> Self {
        Self::Internal { message: Cow::Borrowed(s), context: None }
    }
}

impl From<String> for LedgerError {
    #[inline]
    fn from(s: String) -> Self {
        Self::Internal { message: Cow::Owned(s), context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
