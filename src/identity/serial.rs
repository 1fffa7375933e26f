//! Save/load of identity state.
//!
//! Shapes are not saved; ids are stored per offset and re-attached after
//! [`ShapeIdentity::set_shape`] has decomposed the same shape again.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SerialError};
use crate::topology::ShapeKind;

use super::{DerivedKey, PersistentId, ShapeIdentity};

/// Serializable form of a [`ShapeIdentity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialShapeIdentity {
    pub root_id: PersistentId,
    /// Id of the shape at each offset.
    pub shape_ids: Vec<PersistentId>,
    pub evolves: Vec<SerialEvolve>,
    pub feature_tags: Vec<SerialFeatureTag>,
    pub derived: Vec<SerialDerived>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialEvolve {
    #[serde(rename = "in")]
    pub id_in: PersistentId,
    #[serde(rename = "out")]
    pub id_out: PersistentId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialFeatureTag {
    pub tag: String,
    pub id: PersistentId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialDerived {
    pub kind: ShapeKind,
    pub parents: Vec<PersistentId>,
    pub discriminator: usize,
    pub id: PersistentId,
}

impl SerialShapeIdentity {
    /// Encodes as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self).map_err(SerialError::from)?)
    }

    /// Decodes from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid encoding.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).map_err(SerialError::from)?)
    }
}

impl<S> ShapeIdentity<S>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    /// Captures ids, evolve pairs, tags and derived entries.
    #[must_use]
    pub fn serial_out(&self) -> SerialShapeIdentity {
        SerialShapeIdentity {
            root_id: self.root_shape_id(),
            shape_ids: self.all_shape_ids(),
            evolves: self
                .evolve
                .iter()
                .map(|(id_in, id_out)| SerialEvolve { id_in, id_out })
                .collect(),
            feature_tags: self
                .tags
                .iter()
                .map(|(tag, id)| SerialFeatureTag {
                    tag: tag.to_string(),
                    id,
                })
                .collect(),
            derived: self
                .derived
                .iter()
                .map(|(key, id)| SerialDerived {
                    kind: key.kind,
                    parents: key.parents.iter().copied().collect(),
                    discriminator: key.discriminator,
                    id,
                })
                .collect(),
        }
    }

    /// Restores saved state onto the current generation, which must be the
    /// decomposition of the shape that was saved. Offsets past the current
    /// generation are skipped with a warning, as are conflicting tags.
    pub fn serial_in(&mut self, serial: &SerialShapeIdentity) {
        let keys = self.records.keys().to_vec();
        if serial.shape_ids.len() != keys.len() {
            warn!(
                saved = serial.shape_ids.len(),
                current = keys.len(),
                "saved identity does not match the shape"
            );
        }
        for (offset, id) in serial.shape_ids.iter().enumerate() {
            match keys.get(offset) {
                Some(key) => self.records.set_id(*key, *id),
                None => warn!(offset, "skipping saved id past the last shape"),
            }
        }
        if let Some(root) = self.root {
            self.records.set_id(root, serial.root_id);
        }
        for evolve in &serial.evolves {
            self.evolve.insert(evolve.id_in, evolve.id_out);
        }
        for tag in &serial.feature_tags {
            if let Err(err) = self.tags.insert(tag.id, &tag.tag) {
                warn!(tag = %tag.tag, error = %err, "skipping saved feature tag");
            }
        }
        for derived in &serial.derived {
            let key = DerivedKey::new(
                derived.kind,
                derived.parents.iter().copied(),
                derived.discriminator,
            );
            self.derived.insert(key, derived.id);
        }
    }
}
