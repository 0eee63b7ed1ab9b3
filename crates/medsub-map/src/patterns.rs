use medsub_common::keywords;

/// Tokens that carry no identifying value in a medication query: units,
/// dosage forms and short function words in Spanish and English.
pub const QUERY_STOP_WORDS: &[&str] = &[
    "mg", "pp", "p", "de", "la", "el", "en", "crema", "gel", "tableta", "capsula", "pv", "cream",
    "tablet", "capsule", "of", "the",
];

/// Identifying keywords of a medication query.
pub fn query_keywords(query: &str) -> Vec<String> {
    keywords(query, QUERY_STOP_WORDS)
}
