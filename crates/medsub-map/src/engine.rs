//! Resolution cascade.

use std::cmp::Ordering;

use rapidfuzz::distance::indel;
use serde::{Deserialize, Serialize};
use tracing::debug;

use medsub_common::{contains_word, normalize_text};
use medsub_model::{
    Catalog, CatalogEntry, MatchStage, MedsubError, ResolvedMedication, Result,
};

use crate::patterns::query_keywords;

/// Default minimum name similarity accepted by the fuzzy stage.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.6;

/// A catalog name and its similarity to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameSimilarity {
    pub name: String,
    /// Normalized Indel similarity in `[0, 1]`.
    pub similarity: f64,
}

/// Resolves free-text medication queries against one catalog.
///
/// Stages run in order and the first one that yields a record wins:
/// 1. exact normalized composition, simplest formulation first
/// 2. exact canonical or local name through the substitute name map
/// 3. every query keyword as a whole word of the name or composition
/// 4. closest catalog name at or above the fuzzy threshold
#[derive(Debug, Clone, Copy)]
pub struct MedicationResolver<'a> {
    catalog: &'a Catalog,
    fuzzy_threshold: f64,
}

impl<'a> MedicationResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    /// Runs the cascade for `query`.
    ///
    /// Fails with [`MedsubError::ResolutionFailure`] when no stage matches.
    pub fn resolve(&self, query: &str) -> Result<ResolvedMedication> {
        let normalized = normalize_text(query);
        if normalized.is_empty() {
            return Err(MedsubError::ResolutionFailure {
                query: query.to_string(),
            });
        }
        let stages: [(MatchStage, fn(&Self, &str) -> Option<CatalogEntry<'a>>); 4] = [
            (MatchStage::ExactComposition, Self::exact_composition),
            (MatchStage::ExactName, Self::exact_name),
            (MatchStage::Keyword, Self::keyword),
            (MatchStage::Fuzzy, Self::fuzzy),
        ];
        for (stage, run) in stages {
            if let Some(entry) = run(self, &normalized) {
                debug!(
                    query,
                    stage = stage.label(),
                    matched = %entry.record.name,
                    "resolved medication"
                );
                return Ok(self.describe(entry, stage));
            }
            debug!(query, stage = stage.label(), "stage produced no match");
        }
        Err(MedsubError::ResolutionFailure {
            query: query.to_string(),
        })
    }

    fn exact_composition(&self, normalized: &str) -> Option<CatalogEntry<'a>> {
        simplest(
            self.catalog
                .entries()
                .filter(|entry| entry.normalized.composition == normalized),
        )
    }

    fn exact_name(&self, normalized: &str) -> Option<CatalogEntry<'a>> {
        let canonical = self.catalog.substitutes().canonical_for(normalized)?;
        self.catalog.get(canonical)
    }

    fn keyword(&self, normalized: &str) -> Option<CatalogEntry<'a>> {
        let keywords = query_keywords(normalized);
        if keywords.is_empty() {
            return None;
        }
        simplest(self.catalog.entries().filter(|entry| {
            keywords.iter().all(|keyword| {
                contains_word(&entry.normalized.name, keyword)
                    || contains_word(&entry.normalized.composition, keyword)
            })
        }))
    }

    fn fuzzy(&self, normalized: &str) -> Option<CatalogEntry<'a>> {
        let mut best: Option<(f64, CatalogEntry<'a>)> = None;
        for entry in self.catalog.entries() {
            let similarity = name_similarity(normalized, &entry.normalized.name);
            if best.is_none_or(|(score, _)| similarity > score) {
                best = Some((similarity, entry));
            }
        }
        let (similarity, entry) = best?;
        debug!(similarity, candidate = %entry.record.name, "closest catalog name");
        (similarity >= self.fuzzy_threshold).then_some(entry)
    }

    /// Catalog names closest to `query`, best first.
    pub fn closest_names(&self, query: &str, limit: usize) -> Vec<NameSimilarity> {
        let normalized = normalize_text(query);
        let mut scored: Vec<NameSimilarity> = self
            .catalog
            .entries()
            .map(|entry| NameSimilarity {
                name: entry.record.name.clone(),
                similarity: name_similarity(&normalized, &entry.normalized.name),
            })
            .collect();
        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        scored.truncate(limit);
        scored
    }

    fn describe(&self, entry: CatalogEntry<'_>, stage: MatchStage) -> ResolvedMedication {
        let record = entry.record;
        let local_name = self
            .catalog
            .local_name(&record.name)
            .unwrap_or(&record.name)
            .to_string();
        ResolvedMedication {
            name: record.name.clone(),
            local_name,
            composition: record.composition.clone(),
            therapeutic_class: record.therapeutic_class.clone(),
            chemical_class: record.chemical_class.clone(),
            review_excellent: record.review_excellent,
            principal_component: entry.normalized.principal_component.clone(),
            stage,
        }
    }
}

/// Resolves `query` with the default fuzzy threshold.
pub fn resolve(query: &str, catalog: &Catalog) -> Result<ResolvedMedication> {
    MedicationResolver::new(catalog).resolve(query)
}

fn name_similarity(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars())
}

/// Entry with the fewest components; the earliest wins ties.
fn simplest<'a>(entries: impl Iterator<Item = CatalogEntry<'a>>) -> Option<CatalogEntry<'a>> {
    entries.min_by_key(|entry| entry.normalized.component_count)
}
