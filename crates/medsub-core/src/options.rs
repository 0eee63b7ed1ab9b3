//! Engine configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use medsub_common::normalize_text;
use medsub_map::DEFAULT_FUZZY_THRESHOLD;

/// Score contributions of each scoring criterion.
///
/// Penalties are stored as negative values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Review percentage of 80 or more.
    pub review_excellent: f64,
    /// Review percentage from 50 to 79.
    pub review_good: f64,
    pub same_component: f64,
    pub different_component: f64,
    pub class_and_indication: f64,
    pub not_indicated: f64,
    pub same_chemical_class: f64,
    pub indicated_extended: f64,
    pub indicated_brief: f64,
    pub severe_side_effects: f64,
    pub mild_side_effects: f64,
    pub allergy: f64,
    pub cross_reactivity: f64,
    pub different_family: f64,
    pub shortage_similar: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            review_excellent: 2.0,
            review_good: 1.0,
            same_component: 5.0,
            different_component: 1.0,
            class_and_indication: 2.0,
            not_indicated: -1.0,
            same_chemical_class: 1.0,
            indicated_extended: 0.5,
            indicated_brief: 0.25,
            severe_side_effects: -2.0,
            mild_side_effects: -1.0,
            allergy: -10.0,
            cross_reactivity: -5.0,
            different_family: 5.0,
            shortage_similar: 3.0,
        }
    }
}

/// Alternative phrasings of diagnoses, keyed by normalized diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisSynonyms {
    map: BTreeMap<String, Vec<String>>,
}

impl DiagnosisSynonyms {
    /// An empty synonym table.
    pub fn none() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, diagnosis: &str, synonyms: &[&str]) -> Self {
        let key = normalize_text(diagnosis);
        let values = synonyms
            .iter()
            .map(|synonym| normalize_text(synonym))
            .filter(|synonym| !synonym.is_empty());
        self.map.entry(key).or_default().extend(values);
        self
    }

    /// Synonyms for an already-normalized diagnosis.
    pub fn for_diagnosis(&self, normalized: &str) -> &[String] {
        self.map.get(normalized).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for DiagnosisSynonyms {
    fn default() -> Self {
        Self::none()
            .with("bronquitis", &["inflamacion bronquios", "infeccion vias respiratorias"])
            .with("bronchitis", &["bronchial inflammation", "respiratory tract infection"])
            .with("acne", &["acne vulgar", "acne vulgaris", "comedones"])
            .with("neumonia", &["infeccion pulmonar", "pulmonia"])
            .with("pneumonia", &["lung infection"])
    }
}

/// Options for one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    pub weights: ScoringWeights,
    /// Minimum name similarity for the resolver's fuzzy stage.
    pub fuzzy_threshold: f64,
    /// Maximum candidates taken from the diagnosis search.
    pub diagnosis_pool_size: usize,
    /// Maximum candidates taken from the therapeutic-class search.
    pub class_pool_size: usize,
    /// Add a note when side effects overlap the patient's symptoms.
    pub symptom_warnings: bool,
    pub diagnosis_synonyms: DiagnosisSynonyms,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            diagnosis_pool_size: 10,
            class_pool_size: 5,
            symptom_warnings: true,
            diagnosis_synonyms: DiagnosisSynonyms::default(),
        }
    }
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_symptom_warnings(mut self, enable: bool) -> Self {
        self.symptom_warnings = enable;
        self
    }

    #[must_use]
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_pool_sizes(mut self, diagnosis: usize, class: usize) -> Self {
        self.diagnosis_pool_size = diagnosis;
        self.class_pool_size = class;
        self
    }
}
