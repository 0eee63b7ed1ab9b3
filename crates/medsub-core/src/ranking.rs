//! Candidate ordering.

use std::cmp::Ordering;

use medsub_model::ScoredCandidate;

/// Ordering used for every ranked list: higher score first, then higher
/// origin priority, then fewer symptom warnings.
pub fn compare(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.origin.priority().cmp(&a.origin.priority()))
        .then_with(|| a.symptom_warning_count().cmp(&b.symptom_warning_count()))
}

/// Sorts in place. Equal candidates keep their enumeration order.
pub fn rank(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use medsub_model::{Justification, SearchOrigin};

    fn candidate(name: &str, score: f64, origin: SearchOrigin, symptoms: usize) -> ScoredCandidate {
        let mut justifications = vec![Justification::GoodReview];
        if symptoms > 0 {
            justifications.push(Justification::MayAggravateSymptoms {
                symptoms: (0..symptoms).map(|idx| format!("symptom{idx}")).collect(),
            });
        }
        ScoredCandidate {
            name: name.to_string(),
            local_name: None,
            score,
            justifications,
            origin,
        }
    }

    fn names(candidates: &[ScoredCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn score_dominates() {
        let mut list = vec![
            candidate("low", 3.0, SearchOrigin::Diagnosis, 0),
            candidate("high", 8.0, SearchOrigin::DirectSubstitute, 3),
        ];
        rank(&mut list);
        assert_eq!(names(&list), vec!["high", "low"]);
    }

    #[test]
    fn ties_prefer_diagnosis_then_class_then_substitute() {
        let mut list = vec![
            candidate("substitute", 5.0, SearchOrigin::DirectSubstitute, 0),
            candidate("class", 5.0, SearchOrigin::TherapeuticClass, 0),
            candidate("diagnosis", 5.0, SearchOrigin::Diagnosis, 0),
        ];
        rank(&mut list);
        assert_eq!(names(&list), vec!["diagnosis", "class", "substitute"]);
    }

    #[test]
    fn fewer_symptom_warnings_then_stable() {
        let mut list = vec![
            candidate("two", 5.0, SearchOrigin::Diagnosis, 2),
            candidate("first", 5.0, SearchOrigin::Diagnosis, 0),
            candidate("second", 5.0, SearchOrigin::Diagnosis, 0),
        ];
        rank(&mut list);
        assert_eq!(names(&list), vec!["first", "second", "two"]);
    }
}
