//! The fixed-order driver of the matching and repair passes.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::kernel::ShapeModification;

use super::ShapeIdentity;

/// Knobs of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name used in log records, usually the feature's name.
    pub label: String,
    /// Log nil and duplicated ids before repairing them.
    pub dump_diagnostics: bool,
    /// Derive ids of unidentified wires from their face.
    pub derive_wires: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "identity".to_string(),
            dump_diagnostics: true,
            derive_wires: true,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

/// What the repair passes had to fix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Records that were still nil after matching.
    pub nils_repaired: usize,
    /// Records that repeated an earlier record's id.
    pub duplicates_repaired: usize,
}

impl RepairReport {
    /// Whether matching alone identified everything.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.nils_repaired == 0 && self.duplicates_repaired == 0
    }
}

/// Runs the passes against a freshly set identity:
///
/// 1. shape match, for every source
/// 2. unique type match, for every source
/// 3. outer wire match, for every source
/// 4. modified match, for every registered operation
/// 5. derived match
/// 6. nil repair
/// 7. duplicate repair
///
/// Sources are visited in registration order.
pub struct Pipeline<'a, S> {
    config: PipelineConfig,
    sources: Vec<&'a ShapeIdentity<S>>,
    modifications: Vec<(&'a dyn ShapeModification<Shape = S>, &'a ShapeIdentity<S>)>,
}

impl<'a, S> Pipeline<'a, S>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
            modifications: Vec::new(),
        }
    }

    /// Registers an input identity for passes 1 to 3.
    #[must_use]
    pub fn source(mut self, source: &'a ShapeIdentity<S>) -> Self {
        self.sources.push(source);
        self
    }

    /// Registers a kernel operation that turned `source` into the target,
    /// for pass 4.
    #[must_use]
    pub fn modified(
        mut self,
        operation: &'a dyn ShapeModification<Shape = S>,
        source: &'a ShapeIdentity<S>,
    ) -> Self {
        self.modifications.push((operation, source));
        self
    }

    /// Runs every pass on `target`.
    pub fn run(&self, target: &mut ShapeIdentity<S>) -> RepairReport {
        let label = self.config.label.as_str();
        let evolve_before = target.evolve_store().len();

        for source in &self.sources {
            target.shape_match(source);
        }
        for source in &self.sources {
            target.unique_type_match(source);
        }
        for source in &self.sources {
            target.outer_wire_match(source);
        }
        for (operation, source) in &self.modifications {
            target.modified_match(*operation, source);
        }
        target.derived_match(self.config.derive_wires);

        if self.config.dump_diagnostics {
            target.dump_nils(label);
            target.dump_duplicates(label);
        }
        let report = RepairReport {
            nils_repaired: target.ensure_no_nils(),
            duplicates_repaired: target.ensure_no_duplicates(),
        };
        debug!(
            label,
            sources = self.sources.len(),
            operations = self.modifications.len(),
            new_evolve_records = target.evolve_store().len() - evolve_before,
            nils = report.nils_repaired,
            duplicates = report.duplicates_repaired,
            "identity pipeline finished"
        );
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn config_fills_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"label": "split"}"#).unwrap();
        assert_eq!(config.label, "split");
        assert!(config.dump_diagnostics);
        assert!(config.derive_wires);

        let config: PipelineConfig = serde_json::from_str(r#"{"derive_wires": false}"#).unwrap();
        assert_eq!(config.label, "identity");
        assert!(!config.derive_wires);
    }

    #[test]
    fn clean_report() {
        assert!(RepairReport::default().is_clean());
        let report = RepairReport {
            nils_repaired: 1,
            duplicates_repaired: 0,
        };
        assert!(!report.is_clean());
    }
}
