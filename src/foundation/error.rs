/// Result alias used across the crate.
pub type TricolorResult<T> = Result<T, TricolorError>;

/// Error taxonomy shared by the vote ledger, the compositor and the exporter.
///
/// Apart from [`TricolorError::Other`] and [`TricolorError::Serde`], every variant describes a
/// degraded outcome the caller is expected to recover from (fallback store, skipped layer,
/// next share tier, user-facing warning).
#[derive(thiserror::Error, Debug)]
pub enum TricolorError {
    /// The remote counter store could not be reached or rejected the operation.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// An image asset could not be read or decoded.
    #[error("asset load failure: {0}")]
    AssetLoad(String),

    /// User input failed validation; nothing was written.
    #[error("validation error: {0}")]
    Validation(String),

    /// The platform lacks the capability a share tier needs.
    #[error("share unsupported: {0}")]
    ShareUnsupported(String),

    /// An upload exceeded the configured size ceiling.
    #[error("file too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge {
        /// Size of the rejected file.
        size: u64,
        /// Configured ceiling.
        limit: u64,
    },

    /// Malformed JSON in a persisted record, scene or config.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TricolorError {
    /// Build a [`TricolorError::StoreUnavailable`].
    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Build a [`TricolorError::AssetLoad`].
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`TricolorError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TricolorError::ShareUnsupported`].
    pub fn share_unsupported(msg: impl Into<String>) -> Self {
        Self::ShareUnsupported(msg.into())
    }

    /// Build a [`TricolorError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for [`TricolorError::StoreUnavailable`].
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// `true` when the error only degrades the outcome.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Other(_) | Self::Serde(_))
    }
}

impl From<serde_json::Error> for TricolorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
