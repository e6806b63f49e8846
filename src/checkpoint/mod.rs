//! Snapshots for re-attaching engines after a restart.
//!
//! A snapshot names the blueprint, the workflow attribute and the entity an
//! engine was bound to. It does NOT include closures (not serializable) or
//! the entity itself: on restore the blueprint comes from a
//! [`BlueprintRegistry`](crate::blueprint::BlueprintRegistry) and the entity
//! from an [`EntityResolver`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for snapshot format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Loads entities by id when restoring engines.
pub trait EntityResolver<E> {
    fn find(&self, id: &str) -> Option<E>;
}

impl<E, F> EntityResolver<E> for F
where
    F: Fn(&str) -> Option<E>,
{
    fn find(&self, id: &str) -> Option<E> {
        self(id)
    }
}

/// Serializable binding of an engine to its blueprint and entity.
///
/// # Example
///
/// ```rust
/// use waymark::checkpoint::EngineSnapshot;
///
/// let snapshot = EngineSnapshot::new("article", "status", "42");
/// let json = snapshot.to_json().unwrap();
/// let restored = EngineSnapshot::from_json(&json).unwrap();
///
/// assert_eq!(restored, snapshot);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: Uuid,

    /// Blueprint id
    pub blueprint: String,

    /// Name of the workflow attribute on the entity
    pub attribute: String,

    /// Entity id
    pub entity: String,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl EngineSnapshot {
    pub fn new(
        blueprint: impl Into<String>,
        attribute: impl Into<String>,
        entity: impl Into<String>,
    ) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            blueprint: blueprint.into(),
            attribute: attribute.into(),
            entity: entity.into(),
            taken_at: Utc::now(),
        }
    }

    /// Check the version and that every binding field is present.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        let fields: Vec<&'static str> = [
            ("blueprint", &self.blueprint),
            ("attribute", &self.attribute),
            ("entity", &self.entity),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if fields.is_empty() {
            Ok(())
        } else {
            Err(CheckpointError::BlankBinding { fields })
        }
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Decode from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Encode as compact binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Decode from binary and validate.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
