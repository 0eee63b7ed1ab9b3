//! Substitute-pair table: principal medication to named substitutes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use medsub_common::normalize_text;

/// Maximum number of substitute slots per principal medication.
pub const MAX_SUBSTITUTES: usize = 5;

/// One suggested substitute, named in both languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutePair {
    /// Local-language (display) name.
    pub local_name: String,
    /// Canonical name used to look the substitute up in the catalog.
    pub canonical_name: String,
}

/// Substitutes recorded for one principal medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstituteEntry {
    /// Canonical name of the principal medication.
    pub canonical_name: String,
    /// Local-language name of the principal medication.
    pub local_name: Option<String>,
    /// Deduplicated substitutes in slot order.
    pub substitutes: Vec<SubstitutePair>,
}

impl SubstituteEntry {
    /// Builds an entry from raw `(local, canonical)` slots.
    ///
    /// Only the first [`MAX_SUBSTITUTES`] slots are read. Slots with either
    /// name missing or blank are dropped. Slots sharing a canonical name
    /// (case-insensitive) collapse to one pair that keeps the position of the
    /// first occurrence and the names of the last.
    pub fn new<I>(
        canonical_name: impl Into<String>,
        local_name: Option<String>,
        slots: I,
    ) -> Self
    where
        I: IntoIterator<Item = (Option<String>, Option<String>)>,
    {
        let mut substitutes: Vec<SubstitutePair> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (local, canonical) in slots.into_iter().take(MAX_SUBSTITUTES) {
            let (Some(local), Some(canonical)) = (non_blank(local), non_blank(canonical)) else {
                continue;
            };
            let pair = SubstitutePair {
                local_name: local,
                canonical_name: canonical,
            };
            let key = pair.canonical_name.to_lowercase();
            match positions.get(&key) {
                Some(&idx) => substitutes[idx] = pair,
                None => {
                    positions.insert(key, substitutes.len());
                    substitutes.push(pair);
                }
            }
        }
        Self {
            canonical_name: canonical_name.into().trim().to_string(),
            local_name: non_blank(local_name),
            substitutes,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read-only table of substitute entries with a bidirectional name map.
///
/// Both canonical and local names of every principal medication map to the
/// canonical name, keyed by normalized text.
#[derive(Debug, Clone, Default)]
pub struct SubstituteTable {
    entries: Vec<SubstituteEntry>,
    by_canonical: HashMap<String, usize>,
    name_map: HashMap<String, String>,
}

impl SubstituteTable {
    /// Builds the table. When several entries share a canonical name the
    /// first one is kept.
    pub fn new(entries: impl IntoIterator<Item = SubstituteEntry>) -> Self {
        let mut table = Self::default();
        for entry in entries {
            if entry.canonical_name.is_empty() {
                continue;
            }
            let key = entry.canonical_name.to_lowercase();
            if table.by_canonical.contains_key(&key) {
                continue;
            }
            table.by_canonical.insert(key, table.entries.len());
            table.entries.push(entry);
        }
        // Local names first so a canonical name always resolves to itself.
        for entry in &table.entries {
            if let Some(local) = &entry.local_name {
                let key = normalize_text(local);
                if !key.is_empty() {
                    table.name_map.insert(key, entry.canonical_name.clone());
                }
            }
        }
        for entry in &table.entries {
            let key = normalize_text(&entry.canonical_name);
            if !key.is_empty() {
                table
                    .name_map
                    .insert(key, entry.canonical_name.clone());
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubstituteEntry> {
        self.entries.iter()
    }

    /// Entry for a principal medication, by canonical name (case-insensitive).
    pub fn entry(&self, canonical_name: &str) -> Option<&SubstituteEntry> {
        self.by_canonical
            .get(&canonical_name.trim().to_lowercase())
            .map(|&idx| &self.entries[idx])
    }

    /// Substitutes recorded for a principal medication; empty if none.
    pub fn pairs_for(&self, canonical_name: &str) -> &[SubstitutePair] {
        self.entry(canonical_name)
            .map(|entry| entry.substitutes.as_slice())
            .unwrap_or(&[])
    }

    /// Canonical name for a canonical or local name (normalized lookup).
    pub fn canonical_for(&self, name: &str) -> Option<&str> {
        self.name_map.get(&normalize_text(name)).map(String::as_str)
    }

    /// Local-language name of a principal medication.
    pub fn local_name(&self, canonical_name: &str) -> Option<&str> {
        self.entry(canonical_name)
            .and_then(|entry| entry.local_name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(local: &str, canonical: &str) -> (Option<String>, Option<String>) {
        (Some(local.to_string()), Some(canonical.to_string()))
    }

    #[test]
    fn drops_incomplete_slots_and_collapses_duplicates() {
        let entry = SubstituteEntry::new(
            "Augmentin 625 Duo Tablet",
            Some("Augmentin 625 Duo Tableta".to_string()),
            vec![
                slot("Moxikind CV", "Moxikind-CV 625 Tablet"),
                (None, Some("Novamox CV".to_string())),
                slot("Clavam", "Clavam 625 Tablet"),
                slot("Moxikind CV 625", "moxikind-cv 625 tablet"),
                (Some("  ".to_string()), Some("Blank".to_string())),
                slot("Sixth", "Never Read"),
            ],
        );
        assert_eq!(entry.substitutes.len(), 2);
        assert_eq!(entry.substitutes[0].local_name, "Moxikind CV 625");
        assert_eq!(entry.substitutes[0].canonical_name, "moxikind-cv 625 tablet");
        assert_eq!(entry.substitutes[1].canonical_name, "Clavam 625 Tablet");
    }

    #[test]
    fn name_map_is_bidirectional() {
        let table = SubstituteTable::new(vec![SubstituteEntry::new(
            "Amoxicillin",
            Some("Amoxicilina".to_string()),
            Vec::new(),
        )]);
        assert_eq!(table.canonical_for("AMOXICILINA"), Some("Amoxicillin"));
        assert_eq!(table.canonical_for("amoxicillin"), Some("Amoxicillin"));
        assert_eq!(table.canonical_for("penicillin"), None);
        assert_eq!(table.local_name("AMOXICILLIN"), Some("Amoxicilina"));
        assert!(table.pairs_for("unknown").is_empty());
    }
}
