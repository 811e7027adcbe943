use crate::locator::Asset;

/// Error types for the asset downloads.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Neither the compact nor the full asset could be downloaded.
    #[error("Asset {asset} unavailable (last status: {last_status:?})")]
    AssetUnavailable {
        /// The requested asset.
        asset: Asset,
        /// Status of the last attempt, `None` when it failed before a response.
        last_status: Option<u16>,
    },

    /// The request was cancelled or superseded by a newer one.
    #[error("Request aborted")]
    Aborted,

    /// Scene ids are sharded on six digits.
    #[error("Scene id {0} does not fit in six digits")]
    SceneIdOutOfRange(u64),

    /// The transport failed before a response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error raised by the HTTP client.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl FetchError {
    /// Whether the error only reports a cancelled or superseded request.
    ///
    /// Such errors are not failures and must not be surfaced.
    pub fn is_aborted(&self) -> bool {
        matches!(self, FetchError::Aborted)
    }
}
