//! Broadened search for therapeutic alternatives.
//!
//! Runs only when no direct substitute passed. Two pools are gathered from
//! the whole catalog: records indicated for the diagnosis, then records of
//! the current drug's therapeutic class with overlapping indications.

use std::collections::HashSet;

use tracing::debug;

use medsub_common::{contains_word, keywords};
use medsub_model::{
    Catalog, CatalogEntry, ResolvedMedication, ScoredCandidate, SearchOrigin, SubstitutePair,
};

use crate::allergy::stated_allergens;
use crate::options::EngineOptions;
use crate::ranking::rank;
use crate::scorer::{PatientProfile, Scorer, same_class};

/// Words that never count as indication overlap.
const INDICATION_STOP_WORDS: &[&str] = &[
    "and", "the", "for", "with", "from", "used", "treatment", "y", "el", "la", "de", "del", "los",
    "las", "para", "por", "con", "tratamiento", "mg", "pp", "p", "en", "crema", "gel", "tableta",
    "capsula", "pv",
];

/// Searches the catalog for alternatives to the current drug.
#[derive(Debug, Clone, Copy)]
pub struct AlternativeSearch<'a> {
    catalog: &'a Catalog,
    scorer: Scorer<'a>,
    options: &'a EngineOptions,
}

impl<'a> AlternativeSearch<'a> {
    pub fn new(catalog: &'a Catalog, scorer: Scorer<'a>, options: &'a EngineOptions) -> Self {
        Self {
            catalog,
            scorer,
            options,
        }
    }

    /// Scored and ranked alternatives.
    ///
    /// The current drug and every attempted substitute (by canonical or
    /// local name) are excluded, as is any record whose composition contains
    /// an allergen the notes mention.
    pub fn search(
        &self,
        current: &ResolvedMedication,
        attempted: &[SubstitutePair],
        patient: &PatientProfile,
    ) -> Vec<ScoredCandidate> {
        let mut used: HashSet<String> = HashSet::new();
        used.insert(current.name.to_lowercase());
        for pair in attempted {
            used.insert(pair.canonical_name.to_lowercase());
            used.insert(pair.local_name.to_lowercase());
        }
        let stated = stated_allergens(&patient.notes_normalized, self.scorer.allergens());
        let allergen_free = |entry: &CatalogEntry<'_>| {
            !stated
                .iter()
                .any(|allergen| entry.normalized.composition.contains(allergen.as_str()))
        };

        let diagnosis_pool: Vec<CatalogEntry<'a>> = self
            .diagnosis_matches(patient)
            .into_iter()
            .filter(|entry| !used.contains(&entry.record.name.to_lowercase()))
            .filter(allergen_free)
            .take(self.options.diagnosis_pool_size)
            .collect();
        for entry in &diagnosis_pool {
            used.insert(entry.record.name.to_lowercase());
        }

        let class_pool: Vec<CatalogEntry<'a>> = self
            .class_matches(current)
            .into_iter()
            .filter(|entry| !used.contains(&entry.record.name.to_lowercase()))
            .filter(allergen_free)
            .take(self.options.class_pool_size)
            .collect();
        debug!(
            diagnosis = diagnosis_pool.len(),
            class = class_pool.len(),
            stated_allergens = stated.len(),
            "alternative pools"
        );

        let mut alternatives: Vec<ScoredCandidate> = diagnosis_pool
            .iter()
            .map(|entry| (entry, SearchOrigin::Diagnosis))
            .chain(
                class_pool
                    .iter()
                    .map(|entry| (entry, SearchOrigin::TherapeuticClass)),
            )
            .map(|(entry, origin)| {
                self.scorer
                    .score(&entry.record.name, None, origin, patient, current)
            })
            .collect();
        rank(&mut alternatives);
        alternatives
    }

    /// Records whose indications name the diagnosis or a synonym as whole words.
    fn diagnosis_matches(&self, patient: &PatientProfile) -> Vec<CatalogEntry<'a>> {
        let diagnosis = patient.diagnosis_normalized.as_str();
        if diagnosis.is_empty() {
            return Vec::new();
        }
        let synonyms = self.options.diagnosis_synonyms.for_diagnosis(diagnosis);
        self.catalog
            .entries()
            .filter(|entry| {
                let indications = entry.normalized.indications_combined.as_str();
                contains_word(indications, diagnosis)
                    || synonyms
                        .iter()
                        .any(|synonym| contains_word(indications, synonym))
            })
            .collect()
    }

    /// Records of the current drug's therapeutic class with indications
    /// overlapping the current drug's own.
    fn class_matches(&self, current: &ResolvedMedication) -> Vec<CatalogEntry<'a>> {
        let has_class = current
            .therapeutic_class
            .as_deref()
            .is_some_and(|class| !class.trim().is_empty());
        if !has_class {
            return Vec::new();
        }
        let current_keywords: Vec<String> = self
            .catalog
            .get(&current.name)
            .map(|entry| indication_keywords(&entry.normalized.indications_combined))
            .unwrap_or_default();
        self.catalog
            .entries()
            .filter(|entry| same_class(&current.therapeutic_class, &entry.record.therapeutic_class))
            .filter(|entry| !entry.normalized.indications_combined.is_empty())
            .filter(|entry| {
                current_keywords.is_empty()
                    || current_keywords.iter().any(|keyword| {
                        contains_word(&entry.normalized.indications_combined, keyword)
                    })
            })
            .collect()
    }
}

/// Distinctive words of an indication text.
fn indication_keywords(indications: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords(indications, INDICATION_STOP_WORDS)
        .into_iter()
        .filter(|word| word.chars().count() > 2)
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indication_keywords_skip_function_words() {
        assert_eq!(
            indication_keywords("treatment of bacterial infections and bacterial acne"),
            vec!["bacterial", "infections", "acne"]
        );
    }
}
