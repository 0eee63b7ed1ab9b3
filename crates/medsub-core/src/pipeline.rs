//! Recommendation pipeline: resolve, score substitutes, fall back to
//! alternatives.

use tracing::{debug, info};

use medsub_map::MedicationResolver;
use medsub_model::{
    AllergenList, Catalog, PatientContext, RecommendationResult, Result, ScoredCandidate,
    SearchOrigin, SubstitutionReason,
};

use crate::alternatives::AlternativeSearch;
use crate::options::EngineOptions;
use crate::ranking::rank;
use crate::scorer::{PatientProfile, Scorer};

/// Returned by [`effects_for`] when no side effects are recorded.
pub const EFFECTS_NOT_AVAILABLE: &str = "not available";

/// Returned by [`composition_for`] when nothing matches.
pub const COMPOSITION_NOT_FOUND: &str = "composition not found";

/// The recommendation engine over one catalog snapshot.
#[derive(Debug, Clone)]
pub struct Engine<'a> {
    catalog: &'a Catalog,
    allergens: &'a AllergenList,
    options: EngineOptions,
}

impl<'a> Engine<'a> {
    pub fn new(catalog: &'a Catalog, allergens: &'a AllergenList) -> Self {
        Self::with_options(catalog, allergens, EngineOptions::default())
    }

    pub fn with_options(
        catalog: &'a Catalog,
        allergens: &'a AllergenList,
        options: EngineOptions,
    ) -> Self {
        Self {
            catalog,
            allergens,
            options,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn resolver(&self) -> MedicationResolver<'a> {
        MedicationResolver::new(self.catalog).with_fuzzy_threshold(self.options.fuzzy_threshold)
    }

    /// Resolves `query`, scores its substitutes and, when none is valid,
    /// searches for alternatives.
    pub fn recommend(&self, query: &str, patient: &PatientContext) -> Result<RecommendationResult> {
        let current = self.resolver().resolve(query)?;
        let profile = PatientProfile::new(patient);
        let scorer = Scorer::new(self.catalog, self.allergens, &self.options);

        let pairs = self.catalog.substitutes_for(&current.name);
        let mut substitutes: Vec<ScoredCandidate> = pairs
            .iter()
            .map(|pair| {
                scorer.score(
                    &pair.canonical_name,
                    Some(pair.local_name.as_str()),
                    SearchOrigin::DirectSubstitute,
                    &profile,
                    &current,
                )
            })
            .collect();
        rank(&mut substitutes);
        let valid: Vec<ScoredCandidate> = substitutes
            .iter()
            .filter(|candidate| candidate.is_valid())
            .cloned()
            .collect();

        let alternatives = if valid.is_empty() {
            debug!(medication = %current.name, "no valid substitute, searching alternatives");
            AlternativeSearch::new(self.catalog, scorer, &self.options).search(
                &current,
                pairs,
                &profile,
            )
        } else {
            Vec::new()
        };

        info!(
            medication = %current.name,
            stage = current.stage.label(),
            reason = patient.reason.label(),
            substitutes = substitutes.len(),
            valid = valid.len(),
            alternatives = alternatives.len(),
            "recommendation computed"
        );
        Ok(RecommendationResult {
            current,
            reason: patient.reason,
            substitutes,
            valid,
            alternatives,
        })
    }
}

/// One-shot entry point with default options.
pub fn resolve_and_score(
    query: &str,
    notes: &str,
    diagnosis: &str,
    reason: SubstitutionReason,
    catalog: &Catalog,
    allergens: &AllergenList,
) -> Result<RecommendationResult> {
    let patient = PatientContext::new(notes, diagnosis, reason);
    Engine::new(catalog, allergens).recommend(query, &patient)
}

/// Brief side effects of a medication, or [`EFFECTS_NOT_AVAILABLE`].
pub fn effects_for(name: &str, catalog: &Catalog) -> String {
    catalog
        .get(name)
        .and_then(|entry| entry.record.side_effects.as_deref())
        .map(str::trim)
        .filter(|effects| !effects.is_empty())
        .unwrap_or(EFFECTS_NOT_AVAILABLE)
        .to_string()
}

/// Composition for a name.
///
/// Text that already looks like a composition (has parentheses) is returned
/// as is. Otherwise the record is looked up by name, by local name, then by
/// exact composition text; [`COMPOSITION_NOT_FOUND`] when all fail.
pub fn composition_for(name: &str, catalog: &Catalog) -> String {
    if name.contains('(') && name.contains(')') {
        return name.to_string();
    }
    let by_name = catalog.get(name).or_else(|| {
        catalog
            .substitutes()
            .canonical_for(name)
            .and_then(|canonical| catalog.get(canonical))
    });
    if let Some(entry) = by_name {
        return entry.record.composition.clone();
    }
    let wanted = name.trim().to_lowercase();
    catalog
        .records()
        .iter()
        .find(|record| record.composition.trim().to_lowercase() == wanted)
        .map(|record| record.composition.clone())
        .unwrap_or_else(|| COMPOSITION_NOT_FOUND.to_string())
}

/// Local-language name for a canonical or local name; the input itself when
/// none is recorded.
pub fn local_name_for(name: &str, catalog: &Catalog) -> String {
    let substitutes = catalog.substitutes();
    substitutes
        .canonical_for(name)
        .and_then(|canonical| substitutes.local_name(canonical))
        .unwrap_or(name)
        .to_string()
}
