use crate::error::{OperationError, Result};
use crate::topology::{CompoundData, CompoundId, Shape, TopologyStore};

/// Groups existing shapes into a compound without touching them.
pub struct MakeCompound {
    children: Vec<Shape>,
}

impl MakeCompound {
    /// Creates a new `MakeCompound` operation.
    #[must_use]
    pub fn new(children: Vec<Shape>) -> Self {
        Self { children }
    }

    /// Executes the operation, creating the compound in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if a child is not in the store.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<CompoundId> {
        if let Some(missing) = self.children.iter().find(|c| !store.contains(**c)) {
            return Err(OperationError::InvalidInput(format!("unknown compound member {missing}")).into());
        }
        Ok(store.add_compound(CompoundData {
            children: self.children.clone(),
        }))
    }
}
