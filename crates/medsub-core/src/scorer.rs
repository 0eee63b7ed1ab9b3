//! Substitute scoring.
//!
//! Criteria run in a fixed order and each one that fires appends a
//! [`Justification`]. The accumulated score is clamped to
//! [`MIN_SCORE`]..=[`MAX_SCORE`]; a candidate without catalog data gets the
//! unclamped [`NOT_FOUND_SCORE`] instead.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use medsub_common::normalize_text;
use medsub_model::{
    AllergenList, Catalog, CatalogEntry, Justification, MAX_SCORE, MIN_SCORE, PatientContext,
    ResolvedMedication, ScoredCandidate, SearchOrigin, SubstitutionReason,
};

use crate::allergy::{check_normalized, shared_family};
use crate::options::{EngineOptions, ScoringWeights};
use crate::symptoms::aggravated_symptoms;

/// Side effects that warrant the larger penalty.
static SEVERE_SIDE_EFFECT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:burn(?:s|ing)?|photosensitiv\w*|quemaduras?|fotosensibilidad)\b")
        .expect("Invalid severe side effect regex")
});

static MILD_SIDE_EFFECT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:dryness|dry skin|mild irritation|sequedad|irritacion leve)\b")
        .expect("Invalid mild side effect regex")
});

/// Patient context prepared once per query.
#[derive(Debug, Clone)]
pub struct PatientProfile {
    /// Raw notes, used for symptom overlap.
    pub notes: String,
    pub notes_normalized: String,
    /// Diagnosis as entered, used in justification messages.
    pub diagnosis: String,
    pub diagnosis_normalized: String,
    pub reason: SubstitutionReason,
}

impl PatientProfile {
    pub fn new(patient: &PatientContext) -> Self {
        Self {
            notes: patient.notes.clone(),
            notes_normalized: normalize_text(&patient.notes),
            diagnosis: patient.diagnosis.trim().to_string(),
            diagnosis_normalized: normalize_text(&patient.diagnosis),
            reason: patient.reason,
        }
    }
}

/// Scores candidates for one catalog, allergen vocabulary and option set.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    catalog: &'a Catalog,
    allergens: &'a AllergenList,
    options: &'a EngineOptions,
}

impl<'a> Scorer<'a> {
    pub fn new(
        catalog: &'a Catalog,
        allergens: &'a AllergenList,
        options: &'a EngineOptions,
    ) -> Self {
        Self {
            catalog,
            allergens,
            options,
        }
    }

    pub fn allergens(&self) -> &'a AllergenList {
        self.allergens
    }

    /// Scores one candidate against the patient and the current drug.
    ///
    /// `local_name` overrides the substitute table's local name, if given.
    pub fn score(
        &self,
        candidate: &str,
        local_name: Option<&str>,
        origin: SearchOrigin,
        patient: &PatientProfile,
        current: &ResolvedMedication,
    ) -> ScoredCandidate {
        let Some(entry) = self.catalog.find_candidate(candidate) else {
            debug!(candidate, origin = origin.label(), "candidate has no catalog data");
            let mut missing = ScoredCandidate::not_found(candidate, origin);
            missing.local_name = local_name.map(str::to_string);
            return missing;
        };
        let (raw, justifications) = self.evaluate(entry, patient, current);
        let score = raw.clamp(MIN_SCORE, MAX_SCORE);
        let local_name = local_name
            .or_else(|| self.catalog.local_name(&entry.record.name))
            .map(str::to_string);
        let scored = ScoredCandidate {
            name: candidate.to_string(),
            local_name,
            score,
            justifications,
            origin,
        };
        debug!(
            candidate,
            matched = %entry.record.name,
            raw_score = raw,
            score,
            status = scored.status().label(),
            "scored candidate"
        );
        scored
    }

    fn evaluate(
        &self,
        entry: CatalogEntry<'_>,
        patient: &PatientProfile,
        current: &ResolvedMedication,
    ) -> (f64, Vec<Justification>) {
        let weights: &ScoringWeights = &self.options.weights;
        let record = entry.record;
        let normalized = entry.normalized;
        let diagnosis = patient.diagnosis_normalized.as_str();
        let mut score = 0.0;
        let mut trail = Vec::new();

        if record.review_excellent >= 80.0 {
            score += weights.review_excellent;
            trail.push(Justification::ExcellentReview);
        } else if record.review_excellent >= 50.0 {
            score += weights.review_good;
            trail.push(Justification::GoodReview);
        }

        let candidate_component = normalized.principal_component.as_str();
        let current_component = current.principal_component.as_str();
        if candidate_component.is_empty() || current_component.is_empty() {
            trail.push(Justification::ComponentUnidentified);
        } else if candidate_component == current_component {
            score += weights.same_component;
            trail.push(Justification::SamePrincipalComponent);
        } else {
            score += weights.different_component;
            trail.push(Justification::DifferentComponent);
        }

        let indicated =
            !diagnosis.is_empty() && normalized.indications_combined.contains(diagnosis);
        if diagnosis.is_empty() {
            trail.push(Justification::NoDiagnosis);
        } else if !indicated {
            score += weights.not_indicated;
            trail.push(Justification::NotIndicated {
                diagnosis: patient.diagnosis.clone(),
            });
        } else if same_class(&current.therapeutic_class, &record.therapeutic_class) {
            score += weights.class_and_indication;
            trail.push(Justification::ClassAndIndicationMatch {
                diagnosis: patient.diagnosis.clone(),
            });
        } else {
            trail.push(Justification::IndicatedOtherClass {
                diagnosis: patient.diagnosis.clone(),
            });
        }

        if same_class(&current.chemical_class, &record.chemical_class) {
            score += weights.same_chemical_class;
            trail.push(Justification::SameChemicalClass);
        }

        if !diagnosis.is_empty() {
            if normalized.indications_extended.contains(diagnosis) {
                score += weights.indicated_extended;
                trail.push(Justification::IndicatedSpecifically {
                    diagnosis: patient.diagnosis.clone(),
                });
            } else if normalized.indications.contains(diagnosis) {
                score += weights.indicated_brief;
                trail.push(Justification::GeneralUseMatch {
                    diagnosis: patient.diagnosis.clone(),
                });
            }
        }

        let side_effects = normalized.side_effects_detailed.as_str();
        if SEVERE_SIDE_EFFECT_REGEX.is_match(side_effects) {
            score += weights.severe_side_effects;
            trail.push(Justification::SevereReactionRisk);
        } else if MILD_SIDE_EFFECT_REGEX.is_match(side_effects) {
            score += weights.mild_side_effects;
            trail.push(Justification::MildIrritationRisk);
        }

        if let Some(hit) =
            check_normalized(&patient.notes_normalized, &normalized.composition, self.allergens)
        {
            score += weights.allergy;
            trail.push(Justification::AllergyDetected {
                allergen: hit.allergen,
            });
        } else if patient.reason == SubstitutionReason::Allergy {
            match shared_family(current_component, &normalized.composition) {
                Some(family) => {
                    score += weights.cross_reactivity;
                    trail.push(Justification::CrossReactivity {
                        family: family.name.to_string(),
                    });
                }
                None => {
                    score += weights.different_family;
                    trail.push(Justification::DifferentFamily);
                }
            }
        }

        if patient.reason == SubstitutionReason::Shortage {
            if !current_component.is_empty() && normalized.composition.contains(current_component)
            {
                score += weights.shortage_similar;
                trail.push(Justification::PartiallySimilarComposition);
            } else {
                trail.push(Justification::DifferentComposition);
            }
        }

        if self.options.symptom_warnings {
            let symptoms = aggravated_symptoms(
                &patient.notes,
                &[
                    record.side_effects_detailed.as_deref(),
                    record.side_effects.as_deref(),
                ],
            );
            if !symptoms.is_empty() {
                trail.push(Justification::MayAggravateSymptoms { symptoms });
            }
        }

        (score, trail)
    }
}

/// Case-insensitive equality of two optional classes; absent never matches.
pub(crate) fn same_class(a: &Option<String>, b: &Option<String>) -> bool {
    match (a.as_deref().map(str::trim), b.as_deref().map(str::trim)) {
        (Some(a), Some(b)) if !a.is_empty() => a.to_lowercase() == b.to_lowercase(),
        _ => false,
    }
}

/// Scores one direct substitute with default options.
pub fn score(
    candidate: &str,
    patient: &PatientContext,
    current: &ResolvedMedication,
    allergens: &AllergenList,
    catalog: &Catalog,
) -> ScoredCandidate {
    let options = EngineOptions::default();
    Scorer::new(catalog, allergens, &options).score(
        candidate,
        None,
        SearchOrigin::DirectSubstitute,
        &PatientProfile::new(patient),
        current,
    )
}
