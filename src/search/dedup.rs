// src/search/dedup.rs
use crate::dataset::EmployerRecord;
use crate::utils::normalize_employer_name;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Descending order with absent values last
pub(crate) fn desc_present_first<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Best-first: cap-exempt score, then approval rate, then petition count
pub fn best_first(a: &EmployerRecord, b: &EmployerRecord) -> Ordering {
    desc_present_first(a.cap_exempt_score, b.cap_exempt_score)
        .then_with(|| desc_present_first(a.approval_rate, b.approval_rate))
        .then_with(|| desc_present_first(a.total_petitions, b.total_petitions))
}

/// Keep the best record per normalized employer name. The sort is stable so
/// equally ranked records keep their dataset order.
pub fn best_per_employer<'a>(mut records: Vec<&'a EmployerRecord>) -> Vec<&'a EmployerRecord> {
    records.sort_by(|a, b| best_first(a, b));

    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records.retain(|record| seen.insert(normalize_employer_name(&record.employer_name)));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_highest_scoring_record() {
        let older = EmployerRecord::new("Acme University", "MA", "2024").with_scores(0.8, 0.9);
        let newer = EmployerRecord::new("ACME UNIVERSITY.", "MA", "2025").with_scores(0.95, 0.7);
        let other = EmployerRecord::new("Widget Co", "TX", "2024").with_scores(0.1, 0.5);

        let kept = best_per_employer(vec![&older, &other, &newer]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].data_year, "2025");
        assert_eq!(kept[1].employer_name, "Widget Co");
    }

    #[test]
    fn test_ties_fall_through_to_approval_then_petitions() {
        let a = EmployerRecord::new("Acme", "MA", "2024")
            .with_scores(0.9, 0.8)
            .with_petitions(3);
        let b = EmployerRecord::new("Acme", "MA", "2025")
            .with_scores(0.9, 0.8)
            .with_petitions(10);
        let c = EmployerRecord::new("Acme", "MA", "2023").with_scores(0.9, 0.85);

        let kept = best_per_employer(vec![&a, &b, &c]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].data_year, "2023");

        let kept = best_per_employer(vec![&a, &b]);
        assert_eq!(kept[0].data_year, "2025");
    }

    #[test]
    fn test_unscored_records_rank_last() {
        let unscored = EmployerRecord::new("Acme", "MA", "2024");
        let scored = EmployerRecord::new("Acme", "MA", "2025").with_scores(0.1, 0.1);

        let kept = best_per_employer(vec![&unscored, &scored]);
        assert_eq!(kept[0].data_year, "2025");
    }

    #[test]
    fn test_equal_records_keep_first_seen() {
        let first = EmployerRecord::new("Acme", "MA", "2024");
        let second = EmployerRecord::new("acme", "NY", "2024");

        let kept = best_per_employer(vec![&first, &second]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].state, "MA");
    }
}
