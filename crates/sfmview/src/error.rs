use sfmview_colmap::ColmapError;
use sfmview_fetch::FetchError;

/// Error types of the viewer core.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ViewerError {
    /// Failed to decode an asset.
    #[error(transparent)]
    Colmap(#[from] ColmapError),

    /// Failed to download an asset.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Failed to parse the configuration.
    #[error("Invalid configuration")]
    Config(#[from] serde_json::Error),

    /// Failed to read a file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    /// Whether the error only reports a cancelled or superseded request.
    pub fn is_aborted(&self) -> bool {
        matches!(self, ViewerError::Fetch(err) if err.is_aborted())
    }
}
