use medsub_common::{contains_word, normalize_text, principal_component};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalization_is_idempotent(raw in "\\PC{0,40}") {
        let once = normalize_text(&raw);
        prop_assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn normalized_alphabet_is_restricted(raw in "\\PC{0,40}") {
        let normalized = normalize_text(&raw);
        prop_assert!(normalized
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == ' '));
        prop_assert!(!normalized.contains("  "));
        prop_assert_eq!(normalized.trim(), normalized.as_str());
    }

    #[test]
    fn unit_spacing_is_irrelevant(dose in 1u32..2000, unit in "(mg|ml|g)") {
        let spaced = normalize_text(&format!("Ibuprofen {dose} {unit}"));
        let joined = normalize_text(&format!("Ibuprofen {dose}{unit}"));
        prop_assert_eq!(spaced, joined);
    }

    #[test]
    fn principal_component_is_normalized(raw in "[A-Za-zÀ-ÿ ]{1,20}", dose in 1u32..1000) {
        let component = principal_component(&format!("{raw} ({dose}mg) + Caffeine (30mg)"));
        prop_assert_eq!(normalize_text(&component), component);
    }
}

#[test]
fn accented_and_plain_spellings_compare_equal() {
    assert_eq!(normalize_text("Tretinoína"), normalize_text("tretinoina"));
    assert_eq!(normalize_text("CEFALEXINA"), normalize_text("Cefalexína"));
}

#[test]
fn whole_word_match_over_normalized_notes() {
    let notes = normalize_text("Refiere alergia previa a Penicilina; urticaria.");
    assert!(contains_word(&notes, "penicilina"));
    assert!(!contains_word(&notes, "penicil"));
}
