/// Error types for the reconstruction records.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ColmapError {
    /// The buffer ended on a record boundary before the declared count was reached.
    #[error("Expected {expected} records, but parsed {actual}")]
    RecordCountMismatch {
        /// Count declared in the section header.
        expected: u64,
        /// Number of records decoded before the buffer ended.
        actual: u64,
    },

    /// The buffer ended in the middle of a record.
    #[error("Buffer truncated at offset {offset}, {needed} more bytes needed")]
    TruncatedBuffer {
        /// Offset of the read that failed.
        offset: usize,
        /// Number of missing bytes.
        needed: usize,
    },

    /// The camera model id is not part of the registry.
    #[error("Unknown camera model id: {0}")]
    UnknownCameraModel(i32),

    /// The camera model name is not part of the registry.
    #[error("Unknown camera model name: {0}")]
    UnknownCameraModelName(String),

    /// The record format tag is not recognised.
    #[error("Unknown record format: {0}")]
    UnknownRecordFormat(String),

    /// Image names are NUL terminated single-byte strings on the wire. They
    /// cannot contain NUL or chars above U+00FF.
    #[error("Image name is not encodable: {0:?}")]
    InvalidImageName(String),

    /// Failed to deserialize a record.
    #[error("Failed to deserialize record")]
    Deserialize(#[from] bincode::error::DecodeError),

    /// Failed to serialize a record.
    #[error("Failed to serialize record")]
    Serialize(#[from] bincode::error::EncodeError),
}
