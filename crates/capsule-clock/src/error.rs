/// A result type defaulting to this crate's [`Error`].
///
/// Computing a breakdown from an already-constructed [`Instant`] is
/// infallible; only the string-facing entry points return this.
///
/// [`Instant`]: crate::Instant
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `capsule-clock` can produce.
///
/// There is exactly one failure mode: a start or target instant that cannot
/// be read as a point in time. It is always recoverable. The caller decides
/// whether to render a fallback text, an all-zero breakdown, or give up.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The supplied instant could not be parsed or is out of range.
    #[error("invalid instant {input:?}: {reason}")]
    InvalidInput {
        /// The offending input, as received.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl Error {
    pub(crate) fn invalid_input(input: impl Into<String>, reason: &'static str) -> Self {
        let input = input.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(%input, reason, "rejected instant");
        Self::InvalidInput { input, reason }
    }

    /// Returns `true` for [`Error::InvalidInput`].
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
