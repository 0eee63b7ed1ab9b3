use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{info, info_span};

use medsub_cli::logging::redact_value;
use medsub_cli::pipeline::{
    CaseOutcome, PathOverrides, dataset_paths, engine_options, load, run_cases,
};
use medsub_cli::timing::millis;
use medsub_core::{Engine, EngineOptions, effects_for, local_name_for};
use medsub_ingest::{Dataset, DatasetPaths};
use medsub_map::MedicationResolver;
use medsub_model::{MedsubError, PatientContext, Recommendation, RecommendationResult};

use crate::cli::{BatchArgs, DataArgs, EffectsArgs, EngineArgs, RecommendArgs, ResolveArgs};
use crate::summary::{print_batch, print_recommendation, print_resolved};

const SUGGESTION_LIMIT: usize = 3;

#[derive(Serialize)]
struct RecommendationOutput<'a> {
    result: &'a RecommendationResult,
    recommendation: Option<Recommendation>,
    side_effects: Option<String>,
}

/// Returns whether a recommendation was produced.
pub fn run_recommend(data: &DataArgs, args: &RecommendArgs) -> Result<bool> {
    let dataset = load_from(data)?;
    let engine = Engine::with_options(
        &dataset.catalog,
        &dataset.allergens,
        options_from(&args.engine),
    );
    let patient = match &args.notes {
        Some(notes) => {
            PatientContext::new(notes.as_str(), args.diagnosis.as_str(), args.reason.into())
        }
        None => PatientContext::from_parts(
            &args.symptoms,
            &args.history,
            &args.allergies,
            args.diagnosis.as_str(),
            args.reason.into(),
        ),
    };
    let span = info_span!("recommend", medication = %args.medication);
    let _guard = span.enter();
    info!(
        diagnosis = %patient.diagnosis,
        reason = patient.reason.label(),
        notes = redact_value(&patient.notes),
        "patient context"
    );

    let result = engine
        .recommend(&args.medication, &patient)
        .map_err(|error| with_suggestions(error, &engine.resolver(), &args.medication))?;
    let best = result.best();
    let side_effects = best
        .as_ref()
        .map(|best| effects_for(&best.candidate.name, &dataset.catalog));

    if args.json {
        let output = RecommendationOutput {
            result: &result,
            recommendation: best.clone(),
            side_effects,
        };
        let json = serde_json::to_string_pretty(&output).context("serialize recommendation")?;
        println!("{json}");
    } else {
        let effects = side_effects.as_deref().unwrap_or_default();
        print_recommendation(&result, args.detailed, effects);
    }
    Ok(best.is_some())
}

pub fn run_resolve(data: &DataArgs, args: &ResolveArgs) -> Result<()> {
    let dataset = load_from(data)?;
    let resolver =
        MedicationResolver::new(&dataset.catalog).with_fuzzy_threshold(args.fuzzy_threshold);
    let resolved = resolver
        .resolve(&args.medication)
        .map_err(|error| with_suggestions(error, &resolver, &args.medication))?;
    print_resolved(&resolved);
    Ok(())
}

pub fn run_effects(data: &DataArgs, args: &EffectsArgs) -> Result<()> {
    let dataset = load_from(data)?;
    let catalog = &dataset.catalog;
    let name = match catalog.get(&args.medication) {
        Some(entry) => entry.record.name.clone(),
        None => catalog
            .substitutes()
            .canonical_for(&args.medication)
            .map_or_else(|| args.medication.clone(), str::to_string),
    };
    println!("{} ({})", name, local_name_for(&name, catalog));
    println!("Side effects: {}", effects_for(&name, catalog));
    Ok(())
}

pub fn run_batch(data: &DataArgs, args: &BatchArgs) -> Result<()> {
    let paths = paths_from(data);
    let dataset = load(&paths)?;
    let cases = dataset
        .cases
        .as_deref()
        .ok_or_else(|| anyhow!("clinical cases file not found: {}", paths.clinical.display()))?;
    let engine = Engine::with_options(
        &dataset.catalog,
        &dataset.allergens,
        options_from(&args.engine),
    );
    let span = info_span!("batch", cases = cases.len());
    let _guard = span.enter();
    let on_case = |case_no: usize, outcome: &CaseOutcome, rolling: Option<Duration>| {
        let recommended = outcome
            .recommendation
            .as_ref()
            .map_or("no recommendation", |best| best.candidate.display_name());
        println!(
            "case {case_no}: {} -> {recommended} ({:.3} ms)",
            outcome.medication,
            millis(outcome.elapsed)
        );
        if let Some(mean) = rolling {
            println!("  average over {case_no} cases: {:.3} ms", millis(mean));
        }
    };
    let report = run_cases(&engine, cases, args.reason.into(), args.limit, on_case);
    println!();
    print_batch(&report);
    Ok(())
}

fn paths_from(data: &DataArgs) -> DatasetPaths {
    dataset_paths(
        &data.data_dir,
        PathOverrides {
            medications: data.medications.clone(),
            substitutes: data.substitutes.clone(),
            allergens: data.allergens.clone(),
            clinical: data.clinical.clone(),
        },
    )
}

fn load_from(data: &DataArgs) -> Result<Dataset> {
    load(&paths_from(data))
}

fn options_from(args: &EngineArgs) -> EngineOptions {
    engine_options(
        args.fuzzy_threshold,
        args.diagnosis_pool,
        args.class_pool,
        !args.no_symptom_warnings,
    )
}

/// Adds the closest catalog names to a resolution failure.
fn with_suggestions(
    error: MedsubError,
    resolver: &MedicationResolver<'_>,
    query: &str,
) -> anyhow::Error {
    if !error.is_resolution_failure() {
        return error.into();
    }
    let names: Vec<String> = resolver
        .closest_names(query, SUGGESTION_LIMIT)
        .into_iter()
        .map(|similar| similar.name)
        .collect();
    if names.is_empty() {
        return error.into();
    }
    anyhow!("{error} (did you mean: {}?)", names.join(", "))
}
