use medsub_core::{
    Engine, EngineOptions, PatientProfile, Scorer, composition_for, effects_for, local_name_for,
    resolve_and_score, score,
};
use medsub_map::resolve;
use medsub_model::{
    AllergenList, CandidateStatus, Catalog, Justification, MatchStage, MedicationRecord,
    MedsubError, PatientContext, RecommendationSource, SearchOrigin, SubstituteEntry,
    SubstituteTable, SubstitutionReason,
};

fn slot(local: &str, canonical: &str) -> (Option<String>, Option<String>) {
    (Some(local.to_string()), Some(canonical.to_string()))
}

fn catalog() -> Catalog {
    let substitutes = SubstituteTable::new(vec![SubstituteEntry::new(
        "Amoxil 500",
        Some("Amoxil 500 Cápsula".to_string()),
        vec![
            slot("Mox 500 Cápsula", "Mox 500"),
            slot("Cefalexina 500", "Cephalexin 500"),
            slot("Augmentina", "Augmentin 625"),
            slot("Fantasma", "Ghost Tablet"),
        ],
    )]);
    Catalog::new(
        vec![
            MedicationRecord::new("Amoxil 500", "Amoxicillin (500mg)")
                .with_therapeutic_class("Antibiotic")
                .with_chemical_class("Penicillin")
                .with_review(60.0)
                .with_indications("Bacterial infections, bronchitis")
                .with_indications_extended("Respiratory tract infections"),
            MedicationRecord::new("Mox 500", "Amoxicillin (500mg)")
                .with_therapeutic_class("Antibiotic")
                .with_chemical_class("Penicillin")
                .with_review(85.0)
                .with_indications("bronchitis"),
            MedicationRecord::new("Cephalexin 500", "Cephalexin (500mg)")
                .with_therapeutic_class("Antibiotic")
                .with_chemical_class("Cephalosporin")
                .with_review(55.0)
                .with_indications("Bacterial infections")
                .with_indications_extended("bronchitis, skin infections")
                .with_side_effects_detailed("diarrhea"),
            MedicationRecord::new(
                "Augmentin 625",
                "Amoxicillin (500mg) + Clavulanic Acid (125mg)",
            )
            .with_therapeutic_class("Antibiotic"),
            MedicationRecord::new("Azee 500", "Azithromycin (500mg)")
                .with_therapeutic_class("Antibiotic")
                .with_chemical_class("Macrolide")
                .with_review(90.0)
                .with_indications("bronchitis"),
            MedicationRecord::new("Doxy 100", "Doxycycline (100mg)")
                .with_therapeutic_class("Antibiotic")
                .with_indications("Bacterial infections"),
            MedicationRecord::new("Dolo Cold", "Paracetamol (500mg) + Cafeína (50mg)")
                .with_therapeutic_class("Analgesic")
                .with_side_effects("Nausea"),
        ],
        substitutes,
    )
}

fn allergens() -> AllergenList {
    AllergenList::new([
        "amoxicillin",
        "cephalexin",
        "azithromycin",
        "doxycycline",
        "paracetamol",
        "clavulanic acid",
    ])
}

fn notes(allergies: &str) -> String {
    PatientContext::from_parts("cough", "none", allergies, "", SubstitutionReason::Unspecified)
        .notes
}

#[test]
fn amoxicillin_allergy_prefers_a_cephalosporin() {
    let catalog = catalog();
    let result = resolve_and_score(
        "amoxicillin",
        &notes("allergic to amoxicillin"),
        "bronchitis",
        SubstitutionReason::Allergy,
        &catalog,
        &allergens(),
    )
    .expect("resolved");

    assert_eq!(result.current.name, "Amoxil 500");
    assert_eq!(result.current.stage, MatchStage::Keyword);
    assert_eq!(result.current.principal_component, "amoxicillin");
    assert_eq!(result.current.local_name, "Amoxil 500 Cápsula");

    for candidate in &result.substitutes {
        let composition = composition_for(&candidate.name, &catalog).to_lowercase();
        if composition.contains("amoxicillin") {
            assert_eq!(candidate.status(), CandidateStatus::AllergyRejected);
            assert!(candidate.score <= 0.25, "{} scored {}", candidate.name, candidate.score);
        }
    }

    let cephalexin = result
        .substitutes
        .iter()
        .find(|candidate| candidate.name == "Cephalexin 500")
        .expect("cephalexin scored");
    assert!(cephalexin.justifications.contains(&Justification::DifferentFamily));
    assert_eq!(cephalexin.local_name.as_deref(), Some("Cefalexina 500"));
    assert_eq!(cephalexin.score, 9.5);

    let ghost = result
        .substitutes
        .iter()
        .find(|candidate| candidate.name == "Ghost Tablet")
        .expect("ghost scored");
    assert_eq!(ghost.status(), CandidateStatus::DataMissing);
    assert_eq!(ghost.score, -5.0);
    assert_eq!(result.substitutes.last().map(|c| c.name.as_str()), Some("Ghost Tablet"));

    assert_eq!(result.valid.len(), 1);
    assert!(result.alternatives.is_empty());
    let best = result.into_recommendation().expect("recommendation");
    assert_eq!(best.source, RecommendationSource::DirectSubstitute);
    assert_eq!(best.candidate.name, "Cephalexin 500");
    insta::assert_snapshot!(
        best.candidate.justification_text(),
        @"good review score (50-79), different component, comparable therapeutic function, same therapeutic class and indicated for bronchitis, specifically indicated for bronchitis, different pharmacological family"
    );
}

#[test]
fn rejected_substitutes_fall_back_to_alternatives() {
    let catalog = catalog();
    let result = resolve_and_score(
        "Amoxil 500 capsula",
        &notes("amoxicillin, cephalexin"),
        "bronchitis",
        SubstitutionReason::Allergy,
        &catalog,
        &allergens(),
    )
    .expect("resolved");

    assert_eq!(result.current.stage, MatchStage::ExactName);
    assert!(result.valid.is_empty());
    assert!(result.substitutes.iter().all(|candidate| !candidate.is_valid()));

    let alternatives: Vec<(&str, SearchOrigin)> = result
        .alternatives
        .iter()
        .map(|candidate| (candidate.name.as_str(), candidate.origin))
        .collect();
    assert_eq!(
        alternatives,
        vec![
            ("Azee 500", SearchOrigin::Diagnosis),
            ("Doxy 100", SearchOrigin::TherapeuticClass),
        ]
    );
    assert_eq!(result.alternatives[0].score, 10.0);
    assert_eq!(result.alternatives[1].score, 5.0);

    let best = result.best().expect("alternative");
    assert_eq!(best.source, RecommendationSource::Alternative);
    assert_eq!(best.candidate.name, "Azee 500");
}

#[test]
fn shortage_rewards_shared_component() {
    let catalog = catalog();
    let result = resolve_and_score(
        "Amoxil 500",
        &notes(""),
        "bronchitis",
        SubstitutionReason::Shortage,
        &catalog,
        &allergens(),
    )
    .expect("resolved");

    let ranked: Vec<(&str, f64)> = result
        .substitutes
        .iter()
        .map(|candidate| (candidate.name.as_str(), candidate.score))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("Mox 500", 10.0),
            ("Augmentin 625", 7.0),
            ("Cephalexin 500", 4.5),
            ("Ghost Tablet", -5.0),
        ]
    );
    insta::assert_snapshot!(
        result.substitutes[0].justification_text(),
        @"excellent review score (>=80), same principal component, same therapeutic class and indicated for bronchitis, same chemical class, general uses include bronchitis, partially similar composition"
    );
    assert!(
        result.substitutes[2]
            .justifications
            .contains(&Justification::DifferentComposition)
    );
}

#[test]
fn unknown_medication_is_a_resolution_failure() {
    let catalog = catalog();
    let err = resolve_and_score(
        "xyzyxzzy123",
        "",
        "",
        SubstitutionReason::Unspecified,
        &catalog,
        &allergens(),
    )
    .expect_err("unresolvable");
    assert!(matches!(err, MedsubError::ResolutionFailure { query } if query == "xyzyxzzy123"));
}

#[test]
fn combination_resolves_to_its_principal_component() {
    let catalog = catalog();
    let result = resolve_and_score(
        "Paracetamol (500mg) + Cafeína (50mg)",
        "",
        "fever",
        SubstitutionReason::Unspecified,
        &catalog,
        &allergens(),
    )
    .expect("resolved");
    assert_eq!(result.current.name, "Dolo Cold");
    assert_eq!(result.current.stage, MatchStage::ExactComposition);
    assert_eq!(result.current.principal_component, "paracetamol");
    assert!(result.substitutes.is_empty());
    assert!(matches!(
        result.into_recommendation(),
        Err(MedsubError::NoOptions { medication }) if medication == "Dolo Cold"
    ));
}

#[test]
fn symptom_overlap_is_noted_and_can_be_disabled() {
    let catalog = catalog();
    let allergens = allergens();
    let patient = PatientContext::from_parts(
        "nausea",
        "",
        "",
        "fever",
        SubstitutionReason::Unspecified,
    );
    let engine = Engine::new(&catalog, &allergens);
    let scorer = Scorer::new(&catalog, &allergens, engine.options());
    let current = engine.resolver().resolve("Amoxil 500").expect("resolved");
    let profile = PatientProfile::new(&patient);
    let scored = scorer.score("Dolo Cold", None, SearchOrigin::Diagnosis, &profile, &current);
    assert_eq!(scored.symptom_warning_count(), 1);
    assert!(
        scored
            .justification_text()
            .ends_with("could aggravate symptoms: nausea")
    );

    let quiet = EngineOptions::default().with_symptom_warnings(false);
    let scorer = Scorer::new(&catalog, &allergens, &quiet);
    let scored = scorer.score("Dolo Cold", None, SearchOrigin::Diagnosis, &profile, &current);
    assert_eq!(scored.symptom_warning_count(), 0);
}

#[test]
fn lookups() {
    let catalog = catalog();
    assert_eq!(effects_for("Dolo Cold", &catalog), "Nausea");
    assert_eq!(effects_for("Azee 500", &catalog), "not available");
    assert_eq!(local_name_for("Amoxil 500", &catalog), "Amoxil 500 Cápsula");
    assert_eq!(composition_for("Doxy 100", &catalog), "Doxycycline (100mg)");
}

fn scoring_catalog() -> Catalog {
    Catalog::new(
        vec![
            MedicationRecord::new("Amoxil 500", "Amoxicillin (500mg)")
                .with_therapeutic_class("Antibiotic")
                .with_chemical_class("Penicillin")
                .with_indications("bronchitis"),
            MedicationRecord::new("Mox 500", "Amoxicillin (500mg)")
                .with_therapeutic_class("Antibiotic")
                .with_chemical_class("Penicillin")
                .with_review(85.0)
                .with_indications("bronchitis"),
            MedicationRecord::new("Ampi 250", "Ampicillin (250mg)")
                .with_therapeutic_class("Antibiotic")
                .with_chemical_class("Penicillin")
                .with_review(85.0)
                .with_indications("bronchitis"),
            MedicationRecord::new("Cefu 500", "Cefuroxime (500mg)")
                .with_therapeutic_class("Antibiotic")
                .with_chemical_class("Cephalosporin")
                .with_review(60.0)
                .with_indications("bronchitis")
                .with_side_effects_detailed("burning sensation, dryness"),
            MedicationRecord::new("Cefu Lite", "Cefuroxime (250mg)")
                .with_therapeutic_class("Antibiotic")
                .with_chemical_class("Cephalosporin")
                .with_review(60.0)
                .with_indications("bronchitis")
                .with_side_effects_detailed("dryness"),
            MedicationRecord::new("Doxy 100", "Doxycycline (100mg)")
                .with_therapeutic_class("Antibiotic")
                .with_review(60.0)
                .with_indications("acne"),
            MedicationRecord::new("Azee 500", "Azithromycin (500mg)")
                .with_therapeutic_class("Macrolide")
                .with_review(90.0)
                .with_indications("bronchitis"),
        ],
        SubstituteTable::default(),
    )
}

fn score_against_amoxil(candidate: &str, patient: &PatientContext) -> (f64, String) {
    let catalog = scoring_catalog();
    let allergens = AllergenList::new(["amoxicillin", "ampicillin", "cefuroxime"]);
    let current = resolve("Amoxil 500", &catalog).expect("resolved");
    let scored = score(candidate, patient, &current, &allergens, &catalog);
    (scored.score, scored.justification_text())
}

#[test]
fn same_family_substitute_flags_cross_reactivity() {
    let patient = PatientContext::new(
        "allergic to amoxicillin",
        "bronchitis",
        SubstitutionReason::Allergy,
    );
    let (score, trail) = score_against_amoxil("Ampi 250", &patient);
    assert_eq!(score, 1.25);
    insta::assert_snapshot!(
        trail,
        @"excellent review score (>=80), different component, comparable therapeutic function, same therapeutic class and indicated for bronchitis, same chemical class, general uses include bronchitis, possible cross-reactivity within the penicillin family, clinician review required"
    );
}

#[test]
fn severe_side_effects_outweigh_mild_ones() {
    let patient = PatientContext::new("", "bronchitis", SubstitutionReason::Unspecified);
    let (severe, trail) = score_against_amoxil("Cefu 500", &patient);
    assert_eq!(severe, 2.25);
    insta::assert_snapshot!(
        trail,
        @"good review score (50-79), different component, comparable therapeutic function, same therapeutic class and indicated for bronchitis, general uses include bronchitis, risk of severe reaction"
    );

    let (mild, trail) = score_against_amoxil("Cefu Lite", &patient);
    assert_eq!(mild, 3.25);
    assert!(trail.ends_with("may cause mild irritation"));
}

#[test]
fn candidate_without_the_indication_is_penalized() {
    let patient = PatientContext::new("", "bronchitis", SubstitutionReason::Unspecified);
    let (score, trail) = score_against_amoxil("Doxy 100", &patient);
    assert_eq!(score, 1.0);
    insta::assert_snapshot!(
        trail,
        @"good review score (50-79), different component, comparable therapeutic function, not indicated for bronchitis"
    );
}

#[test]
fn indicated_candidate_from_another_class_is_noted() {
    let patient = PatientContext::new("", "bronchitis", SubstitutionReason::Unspecified);
    let (score, trail) = score_against_amoxil("Azee 500", &patient);
    assert_eq!(score, 3.25);
    insta::assert_snapshot!(
        trail,
        @"excellent review score (>=80), different component, comparable therapeutic function, indicated for bronchitis, different therapeutic class, general uses include bronchitis"
    );
}

#[test]
fn missing_diagnosis_skips_the_indication_check() {
    let patient = PatientContext::new("", "", SubstitutionReason::Unspecified);
    let (score, trail) = score_against_amoxil("Mox 500", &patient);
    assert_eq!(score, 8.0);
    insta::assert_snapshot!(
        trail,
        @"excellent review score (>=80), same principal component, no diagnosis given, indication not assessed, same chemical class"
    );
}
