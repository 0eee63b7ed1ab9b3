//! Allergen vocabulary.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use medsub_common::{fold, normalize_text};

/// One active-ingredient name usable as an allergy match target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenTerm {
    /// Name as it appeared in the source.
    pub label: String,
    /// Normalized form compared against compositions and notes.
    pub normalized: String,
}

impl AllergenTerm {
    /// Returns `None` when the label normalizes to nothing.
    pub fn new(label: impl Into<String>) -> Option<Self> {
        let label = label.into();
        let normalized = normalize_text(&label);
        if normalized.is_empty() {
            return None;
        }
        Some(Self {
            label: label.trim().to_string(),
            normalized,
        })
    }
}

/// Deduplicated allergen terms in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenList {
    terms: Vec<AllergenTerm>,
}

impl AllergenList {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let terms = labels
            .into_iter()
            .filter_map(AllergenTerm::new)
            .filter(|term| seen.insert(term.normalized.clone()))
            .collect();
        Self { terms }
    }

    /// Derives a vocabulary from composition strings.
    ///
    /// Each composition is split on `+ , ; /`, parenthesized doses are
    /// removed, and only purely alphabetic names are kept.
    pub fn from_compositions<'a>(compositions: impl IntoIterator<Item = &'a str>) -> Self {
        let mut labels = Vec::new();
        for composition in compositions {
            for part in fold(composition).split(['+', ',', ';', '/']) {
                let name = strip_parenthesized(part);
                let name = name.trim();
                if name.is_empty() || name.chars().any(|ch| ch.is_ascii_digit()) {
                    continue;
                }
                if name
                    .chars()
                    .all(|ch| ch.is_alphabetic() || ch.is_whitespace() || ch == '-')
                {
                    labels.push(name.to_string());
                }
            }
        }
        Self::new(labels)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AllergenTerm> {
        self.terms.iter()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn strip_parenthesized(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}
