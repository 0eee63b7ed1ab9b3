//! Medication records as exposed by the catalog.

use serde::{Deserialize, Serialize};

use medsub_common::{component_count, principal_component};

/// One medication in the catalog.
///
/// The canonical `name` is the catalog key and is compared case-insensitively.
/// `composition` lists active components joined by `+`, each optionally
/// followed by a parenthesized dose, e.g. `"Amoxicillin (500mg) + Clavulanic
/// Acid (125mg)"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecord {
    /// Canonical (primary-language) medication name.
    pub name: String,
    /// Active components; never empty for records held by a catalog.
    pub composition: String,
    /// Therapeutic class, if known.
    pub therapeutic_class: Option<String>,
    /// Chemical class, if known.
    pub chemical_class: Option<String>,
    /// Percentage of "excellent" reviews (0 to 100).
    pub review_excellent: f64,
    /// Brief side-effect summary.
    pub side_effects: Option<String>,
    /// Aggregated detailed side effects.
    pub side_effects_detailed: Option<String>,
    /// Brief indications ("uses").
    pub indications: Option<String>,
    /// Aggregated extended clinical uses.
    pub indications_extended: Option<String>,
}

impl MedicationRecord {
    /// Creates a record with only a name and composition.
    pub fn new(name: impl Into<String>, composition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            composition: composition.into(),
            therapeutic_class: None,
            chemical_class: None,
            review_excellent: 0.0,
            side_effects: None,
            side_effects_detailed: None,
            indications: None,
            indications_extended: None,
        }
    }

    #[must_use]
    pub fn with_therapeutic_class(mut self, class: impl Into<String>) -> Self {
        self.therapeutic_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn with_chemical_class(mut self, class: impl Into<String>) -> Self {
        self.chemical_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn with_review(mut self, review_excellent: f64) -> Self {
        self.review_excellent = review_excellent;
        self
    }

    #[must_use]
    pub fn with_side_effects(mut self, brief: impl Into<String>) -> Self {
        self.side_effects = Some(brief.into());
        self
    }

    #[must_use]
    pub fn with_side_effects_detailed(mut self, detailed: impl Into<String>) -> Self {
        self.side_effects_detailed = Some(detailed.into());
        self
    }

    #[must_use]
    pub fn with_indications(mut self, brief: impl Into<String>) -> Self {
        self.indications = Some(brief.into());
        self
    }

    #[must_use]
    pub fn with_indications_extended(mut self, extended: impl Into<String>) -> Self {
        self.indications_extended = Some(extended.into());
        self
    }

    /// Principal active component (see [`medsub_common::principal_component`]).
    pub fn principal_component(&self) -> String {
        principal_component(&self.composition)
    }

    /// Number of `+`-joined components in the composition.
    pub fn component_count(&self) -> usize {
        component_count(&self.composition)
    }

    /// Brief and extended indications joined by a space.
    pub fn combined_indications(&self) -> String {
        join_present(&[&self.indications, &self.indications_extended])
    }

    /// True if either indication field carries text.
    pub fn has_indications(&self) -> bool {
        !self.combined_indications().is_empty()
    }
}

fn join_present(parts: &[&Option<String>]) -> String {
    parts
        .iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_present_indications() {
        let record = MedicationRecord::new("Azee 500", "Azithromycin (500mg)")
            .with_indications("Bacterial infections")
            .with_indications_extended("  ");
        assert_eq!(record.combined_indications(), "Bacterial infections");
        assert!(record.has_indications());
        assert!(!MedicationRecord::new("X", "Y").has_indications());
    }

    #[test]
    fn derives_components() {
        let record = MedicationRecord::new("Dolo Cold", "Paracetamol (500mg) + Cafeína (30mg)");
        assert_eq!(record.principal_component(), "paracetamol");
        assert_eq!(record.component_count(), 2);
    }
}
