//! Allergy rules.
//!
//! Two independent checks:
//! - [`check`]: the patient's notes mention an allergen that is present in
//!   the candidate's composition. Any mention counts; the rule prefers false
//!   positives over missed allergies.
//! - [`shared_family`]: the current drug and the candidate belong to the same
//!   allergenic drug family, so cross-reactivity is possible.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use medsub_common::{contains_word, normalize_text};
use medsub_model::AllergenList;

/// Allergy phrases over normalized text, English and Spanish.
///
/// A match must be followed directly by the allergen.
static ALLERGY_PHRASE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\ballerg(?:ic|y|ies) to|\bhypersensitivity to|\b(?:adverse )?reaction to|\burticaria (?:from|with)|\balergi(?:a|as|co|ca|cos|cas) a|\breaccion (?:(?:adversa|cutanea) )?(?:a|con)|\burticaria (?:por|con)|\bhipersensibilidad a) ",
    )
    .expect("Invalid allergy phrase regex")
});

/// How the allergen showed up in the notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllergyEvidence {
    /// After an allergy phrase such as "allergic to".
    Phrase,
    /// As a standalone word.
    Mention,
}

/// A direct allergy hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergyMatch {
    /// Allergen label as listed in the vocabulary.
    pub allergen: String,
    pub evidence: AllergyEvidence,
}

/// Checks raw notes against a raw composition.
pub fn check(notes: &str, composition: &str, allergens: &AllergenList) -> Option<AllergyMatch> {
    check_normalized(&normalize_text(notes), &normalize_text(composition), allergens)
}

/// [`check`] over text that is already normalized.
///
/// Allergens are tried in vocabulary order; the first hit is returned.
pub fn check_normalized(
    notes: &str,
    composition: &str,
    allergens: &AllergenList,
) -> Option<AllergyMatch> {
    if notes.is_empty() || composition.is_empty() {
        return None;
    }
    for term in allergens.iter() {
        let allergen = term.normalized.as_str();
        if !composition.contains(allergen) {
            continue;
        }
        let evidence = if follows_phrase(notes, allergen) {
            AllergyEvidence::Phrase
        } else if contains_word(notes, allergen) {
            AllergyEvidence::Mention
        } else {
            continue;
        };
        return Some(AllergyMatch {
            allergen: term.label.clone(),
            evidence,
        });
    }
    None
}

fn follows_phrase(notes: &str, allergen: &str) -> bool {
    ALLERGY_PHRASE_REGEX
        .find_iter(notes)
        .any(|phrase| notes[phrase.end()..].starts_with(allergen))
}

/// Normalized allergens from the vocabulary that the notes mention as words.
///
/// Used to keep alternatives containing a stated allergen out of the pools.
pub fn stated_allergens(notes: &str, allergens: &AllergenList) -> Vec<String> {
    allergens
        .iter()
        .filter(|term| contains_word(notes, &term.normalized))
        .map(|term| term.normalized.clone())
        .collect()
}

/// An allergenic drug family and its member substances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllergenFamily {
    pub name: &'static str,
    /// Normalized English and Spanish member names.
    pub members: &'static [&'static str],
}

pub const ALLERGEN_FAMILIES: &[AllergenFamily] = &[
    AllergenFamily {
        name: "penicillin",
        members: &[
            "amoxicillin",
            "amoxicilina",
            "ampicillin",
            "ampicilina",
            "penicillin",
            "penicilina",
            "cloxacillin",
            "cloxacilina",
        ],
    },
    AllergenFamily {
        name: "cephalosporin",
        members: &[
            "cephalexin",
            "cefalexina",
            "cefuroxime",
            "cefuroxima",
            "cefixime",
            "cefixima",
            "ceftazidime",
            "ceftazidima",
        ],
    },
    AllergenFamily {
        name: "macrolide",
        members: &[
            "azithromycin",
            "azitromicina",
            "clarithromycin",
            "claritromicina",
            "erythromycin",
            "eritromicina",
        ],
    },
    AllergenFamily {
        name: "tetracycline",
        members: &["doxycycline", "doxiciclina", "tetracycline", "tetraciclina"],
    },
    AllergenFamily {
        name: "sulfonamide",
        members: &[
            "sulfamethoxazole",
            "sulfametoxazol",
            "sulfadiazine",
            "sulfadiazina",
            "sulfisoxazole",
            "sulfisoxazol",
        ],
    },
];

/// Families with a member named in the normalized text.
pub fn classify(normalized: &str) -> Vec<&'static AllergenFamily> {
    if normalized.is_empty() {
        return Vec::new();
    }
    ALLERGEN_FAMILIES
        .iter()
        .filter(|family| family.members.iter().any(|member| normalized.contains(member)))
        .collect()
}

/// First family shared by both normalized texts, if any.
///
/// Unclassified text shares no family.
pub fn shared_family(current: &str, candidate: &str) -> Option<&'static AllergenFamily> {
    let candidate_families = classify(candidate);
    classify(current)
        .into_iter()
        .find(|family| candidate_families.contains(family))
}
