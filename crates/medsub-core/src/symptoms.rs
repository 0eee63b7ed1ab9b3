//! Overlap between reported symptoms and a candidate's side effects.

use std::collections::BTreeSet;

use medsub_common::tokens;

/// Words ignored when comparing notes with side effects: short function
/// words and the section labels used when notes are composed from parts.
const STOP_WORDS: &[&str] = &[
    "y", "el", "la", "de", "a", "en", "con", "por", "para", "del", "al", "un", "una", "los", "las",
    "and", "the", "with", "for", "from", "of", "or", "symptoms", "history", "allergies", "none",
];

/// Significant words of a text: normalized, longer than two characters, not
/// stop words.
pub fn significant_words(text: &str) -> BTreeSet<String> {
    tokens(text)
        .into_iter()
        .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

/// Symptom words the side-effect texts share with the notes, sorted.
pub fn aggravated_symptoms(notes: &str, side_effects: &[Option<&str>]) -> Vec<String> {
    let effects: String = side_effects
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if effects.trim().is_empty() {
        return Vec::new();
    }
    let effect_words = significant_words(&effects);
    significant_words(notes)
        .intersection(&effect_words)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_sorted_overlap() {
        let notes = "Symptoms: nausea, headache and rash\nHistory: none\nAllergies: none";
        let overlap = aggravated_symptoms(notes, &[Some("Rash, Nausea, dizziness"), None]);
        assert_eq!(overlap, vec!["nausea", "rash"]);
    }

    #[test]
    fn ignores_labels_and_short_words() {
        let notes = "Symptoms: eye pain\nHistory: none";
        assert!(aggravated_symptoms(notes, &[Some("history of skin rash, none")]).is_empty());
        assert!(aggravated_symptoms(notes, &[None, None]).is_empty());
    }
}
