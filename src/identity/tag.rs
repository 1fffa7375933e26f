use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::IdentityError;

use super::PersistentId;

/// Stable bindings between feature-level names and ids.
///
/// A binding never changes once made.
#[derive(Debug, Clone, Default)]
pub struct FeatureTagStore {
    by_tag: BTreeMap<String, PersistentId>,
    by_id: HashMap<PersistentId, String>,
}

impl FeatureTagStore {
    #[must_use]
    pub fn id(&self, tag: &str) -> Option<PersistentId> {
        self.by_tag.get(tag).copied()
    }

    #[must_use]
    pub fn tag(&self, id: PersistentId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Binds `tag` to `id`. Binding the same pair again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NilId`] for a nil id and
    /// [`IdentityError::TagConflict`] if either side is bound elsewhere.
    pub fn insert(&mut self, id: PersistentId, tag: &str) -> Result<(), IdentityError> {
        if id.is_nil() {
            return Err(IdentityError::NilId);
        }
        match (self.by_tag.get(tag), self.by_id.get(&id)) {
            (Some(bound), _) if *bound == id => Ok(()),
            (None, None) => {
                self.by_tag.insert(tag.to_string(), id);
                self.by_id.insert(id, tag.to_string());
                Ok(())
            }
            _ => Err(IdentityError::TagConflict {
                tag: tag.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    /// Bindings ordered by tag.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PersistentId)> + '_ {
        self.by_tag.iter().map(|(t, id)| (t.as_str(), *id))
    }
}

impl fmt::Display for FeatureTagStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "feature tags ({} records)", self.len())?;
        for (tag, id) in self.iter() {
            writeln!(f, "  {tag}: {id}")?;
        }
        Ok(())
    }
}
