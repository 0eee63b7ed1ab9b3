//! Dataset loading and case evaluation shared by the commands.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use medsub_core::{Engine, EngineOptions};
use medsub_ingest::{ClinicalCase, Dataset, DatasetPaths, load_dataset};
use medsub_model::{PatientContext, Recommendation, SubstitutionReason};

use crate::logging::redact_value;
use crate::timing::{ResponseTimes, TimingStats};

/// Per-file overrides on top of the standard layout.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub medications: Option<PathBuf>,
    pub substitutes: Option<PathBuf>,
    pub allergens: Option<PathBuf>,
    pub clinical: Option<PathBuf>,
}

/// Standard layout under `data_dir` with any overrides applied.
pub fn dataset_paths(data_dir: &Path, overrides: PathOverrides) -> DatasetPaths {
    let defaults = DatasetPaths::from_data_dir(data_dir);
    DatasetPaths {
        medications: overrides.medications.unwrap_or(defaults.medications),
        substitutes: overrides.substitutes.unwrap_or(defaults.substitutes),
        allergens: overrides.allergens.unwrap_or(defaults.allergens),
        clinical: overrides.clinical.unwrap_or(defaults.clinical),
    }
}

/// Loads the dataset, logging how long it took.
pub fn load(paths: &DatasetPaths) -> Result<Dataset> {
    let span = info_span!("load", medications = %paths.medications.display());
    let _guard = span.enter();
    let start = Instant::now();
    let dataset = load_dataset(paths).context("load dataset")?;
    info!(
        medications = dataset.catalog.len(),
        excluded = dataset.catalog.excluded_count(),
        duration_ms = start.elapsed().as_millis(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Result of evaluating one recorded case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub medication: String,
    pub diagnosis: String,
    /// Canonical name the medication resolved to.
    pub resolved: Option<String>,
    pub recommendation: Option<Recommendation>,
    /// Why no recommendation was produced.
    pub error: Option<String>,
    pub elapsed: Duration,
}

impl CaseOutcome {
    pub fn is_success(&self) -> bool {
        self.recommendation.is_some()
    }
}

/// Every case outcome plus timing statistics.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<CaseOutcome>,
    pub times: ResponseTimes,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn stats(&self) -> Option<TimingStats> {
        self.times.stats()
    }
}

/// Runs the engine for one recorded case.
pub fn evaluate_case(
    engine: &Engine<'_>,
    case: &ClinicalCase,
    reason: SubstitutionReason,
) -> CaseOutcome {
    debug!(
        medication = %case.medication,
        diagnosis = %case.diagnosis,
        notes = redact_value(&case.notes),
        "evaluating case"
    );
    let patient = PatientContext::new(case.notes.as_str(), case.diagnosis.as_str(), reason);
    let start = Instant::now();
    let outcome = engine.recommend(&case.medication, &patient);
    let elapsed = start.elapsed();
    let (resolved, recommendation, error) = match outcome {
        Ok(result) => {
            let resolved = Some(result.current.name.clone());
            match result.into_recommendation() {
                Ok(recommendation) => (resolved, Some(recommendation), None),
                Err(error) => (resolved, None, Some(error.to_string())),
            }
        }
        Err(error) => {
            warn!(medication = %case.medication, %error, "case not evaluated");
            (None, None, Some(error.to_string()))
        }
    };
    CaseOutcome {
        medication: case.medication.clone(),
        diagnosis: case.diagnosis.clone(),
        resolved,
        recommendation,
        error,
        elapsed,
    }
}

/// Evaluates up to `limit` cases in order.
///
/// `on_case` sees each outcome as it completes, with the rolling mean when
/// the case closes a window.
pub fn run_cases<F>(
    engine: &Engine<'_>,
    cases: &[ClinicalCase],
    reason: SubstitutionReason,
    limit: Option<usize>,
    mut on_case: F,
) -> BatchReport
where
    F: FnMut(usize, &CaseOutcome, Option<Duration>),
{
    let mut report = BatchReport::default();
    for (idx, case) in cases.iter().take(limit.unwrap_or(usize::MAX)).enumerate() {
        let outcome = evaluate_case(engine, case, reason);
        let rolling = report.times.record(outcome.elapsed);
        on_case(idx + 1, &outcome, rolling);
        report.outcomes.push(outcome);
    }
    info!(
        cases = report.outcomes.len(),
        recommended = report.success_count(),
        "batch complete"
    );
    report
}

/// Engine options assembled from command-line values.
pub fn engine_options(
    fuzzy_threshold: f64,
    diagnosis_pool: usize,
    class_pool: usize,
    symptom_warnings: bool,
) -> EngineOptions {
    EngineOptions::new()
        .with_fuzzy_threshold(fuzzy_threshold)
        .with_pool_sizes(diagnosis_pool, class_pool)
        .with_symptom_warnings(symptom_warnings)
}
