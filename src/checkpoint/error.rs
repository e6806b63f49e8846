//! Errors raised while encoding, decoding or checking engine snapshots.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// One or more of blueprint, attribute and entity is blank
    #[error("Snapshot binds nothing to {}", .fields.join(", "))]
    BlankBinding { fields: Vec<&'static str> },
}
