//! In-memory medication catalog.
//!
//! The catalog owns the medication records and the substitute table. All
//! normalized forms used by matching are computed once in [`Catalog::new`];
//! lookups never normalize catalog data on the request path.

use std::collections::HashMap;

use medsub_common::{component_count, normalize_text, principal_component};

use crate::medication::MedicationRecord;
use crate::substitute::{SubstitutePair, SubstituteTable};

/// Normalized views of one record, derived at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub name: String,
    pub composition: String,
    pub principal_component: String,
    pub component_count: usize,
    pub indications: String,
    pub indications_extended: String,
    /// Brief and extended indications joined by a space.
    pub indications_combined: String,
    pub side_effects_detailed: String,
}

impl NormalizedRecord {
    fn from_record(record: &MedicationRecord) -> Self {
        let indications = normalize_opt(record.indications.as_deref());
        let indications_extended = normalize_opt(record.indications_extended.as_deref());
        let indications_combined = normalize_text(&record.combined_indications());
        Self {
            name: normalize_text(&record.name),
            composition: normalize_text(&record.composition),
            principal_component: principal_component(&record.composition),
            component_count: component_count(&record.composition),
            indications,
            indications_extended,
            indications_combined,
            side_effects_detailed: normalize_opt(record.side_effects_detailed.as_deref()),
        }
    }
}

fn normalize_opt(value: Option<&str>) -> String {
    value.map(normalize_text).unwrap_or_default()
}

/// A record paired with its normalized forms.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry<'a> {
    pub record: &'a MedicationRecord,
    pub normalized: &'a NormalizedRecord,
}

/// Immutable medication catalog plus substitute table.
///
/// Records without a name or composition are excluded at construction, as
/// are later records repeating an earlier name (case-insensitive). The value
/// is `Send + Sync` and may be shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<MedicationRecord>,
    normalized: Vec<NormalizedRecord>,
    by_name: HashMap<String, usize>,
    by_normalized_name: HashMap<String, usize>,
    substitutes: SubstituteTable,
    excluded: usize,
    duplicates: usize,
}

impl Catalog {
    pub fn new(
        records: impl IntoIterator<Item = MedicationRecord>,
        substitutes: SubstituteTable,
    ) -> Self {
        let mut catalog = Self {
            substitutes,
            ..Self::default()
        };
        for record in records {
            if record.name.trim().is_empty() || record.composition.trim().is_empty() {
                catalog.excluded += 1;
                continue;
            }
            let key = record.name.trim().to_lowercase();
            if catalog.by_name.contains_key(&key) {
                catalog.duplicates += 1;
                continue;
            }
            let normalized = NormalizedRecord::from_record(&record);
            let idx = catalog.records.len();
            catalog.by_name.insert(key, idx);
            if !normalized.name.is_empty() {
                catalog
                    .by_normalized_name
                    .entry(normalized.name.clone())
                    .or_insert(idx);
            }
            catalog.normalized.push(normalized);
            catalog.records.push(record);
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records rejected for a missing name or composition.
    pub fn excluded_count(&self) -> usize {
        self.excluded
    }

    /// Records dropped because their name was already present.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    pub fn records(&self) -> &[MedicationRecord] {
        &self.records
    }

    /// All entries in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry<'_>> {
        self.records
            .iter()
            .zip(&self.normalized)
            .map(|(record, normalized)| CatalogEntry { record, normalized })
    }

    /// Entry at a catalog position.
    pub fn entry(&self, idx: usize) -> Option<CatalogEntry<'_>> {
        Some(CatalogEntry {
            record: self.records.get(idx)?,
            normalized: self.normalized.get(idx)?,
        })
    }

    /// Looks a record up by canonical name.
    ///
    /// Matches case-insensitively first, then on the normalized name.
    pub fn get(&self, name: &str) -> Option<CatalogEntry<'_>> {
        let idx = self
            .by_name
            .get(&name.trim().to_lowercase())
            .or_else(|| self.by_normalized_name.get(&normalize_text(name)))?;
        self.entry(*idx)
    }

    /// Finds a candidate by name, else by the first record whose normalized
    /// composition contains the normalized query.
    pub fn find_candidate(&self, name: &str) -> Option<CatalogEntry<'_>> {
        if let Some(entry) = self.get(name) {
            return Some(entry);
        }
        let needle = normalize_text(name);
        if needle.is_empty() {
            return None;
        }
        self.entries()
            .find(|entry| entry.normalized.composition.contains(&needle))
    }

    pub fn substitutes(&self) -> &SubstituteTable {
        &self.substitutes
    }

    /// Substitute pairs recorded for a canonical name.
    pub fn substitutes_for(&self, canonical_name: &str) -> &[SubstitutePair] {
        self.substitutes.pairs_for(canonical_name)
    }

    /// Local-language name for a canonical name, if the substitute table has one.
    pub fn local_name(&self, canonical_name: &str) -> Option<&str> {
        self.substitutes.local_name(canonical_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                MedicationRecord::new("Amoxil 500", "Amoxicillin (500mg)"),
                MedicationRecord::new("No Composition", "  "),
                MedicationRecord::new("amoxil 500", "Duplicate (1mg)"),
                MedicationRecord::new("Crocin Advance", "Paracetamol (500mg)"),
            ],
            SubstituteTable::default(),
        )
    }

    #[test]
    fn excludes_invalid_and_duplicate_records() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.excluded_count(), 1);
        assert_eq!(catalog.duplicate_count(), 1);
        let entry = catalog.get("AMOXIL 500").expect("present");
        assert_eq!(entry.record.composition, "Amoxicillin (500mg)");
        assert_eq!(entry.normalized.composition, "amoxicillin 500mg");
        assert_eq!(entry.normalized.principal_component, "amoxicillin");
    }

    #[test]
    fn get_falls_back_to_normalized_name() {
        let catalog = catalog();
        assert!(catalog.get("crocin-advance").is_some());
        assert!(catalog.get("crocin").is_none());
    }

    #[test]
    fn find_candidate_uses_composition_substring() {
        let catalog = catalog();
        let entry = catalog.find_candidate("Paracetamol").expect("by composition");
        assert_eq!(entry.record.name, "Crocin Advance");
        assert!(catalog.find_candidate("ibuprofen").is_none());
        assert!(catalog.find_candidate("  ").is_none());
    }
}
