//! Listing order of persisted findings.
//!
//! Severity, then state, then category, then element path. Consumers
//! depend on this order for stable display.

use std::cmp::Ordering;

use super::PersistedFinding;

pub fn compare_for_listing(a: &PersistedFinding, b: &PersistedFinding) -> Ordering {
    a.finding
        .severity
        .cmp(&b.finding.severity)
        .then_with(|| a.state.cmp(&b.state))
        .then_with(|| a.finding.category.cmp(&b.finding.category))
        .then_with(|| a.finding.element_path.cmp(&b.finding.element_path))
}

pub fn sort_for_listing(findings: &mut [PersistedFinding]) {
    findings.sort_by(compare_for_listing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::finding::fixtures::persisted;
    use crate::domain::validation::{Category, FindingState, Severity};
    use proptest::prelude::*;

    fn row(severity: Severity, state: FindingState, category: Category) -> PersistedFinding {
        let mut row = persisted(state, None);
        row.finding.severity = severity;
        row.finding.category = category;
        row
    }

    #[test]
    fn errors_before_warnings_before_info() {
        let mut rows = vec![
            row(Severity::Info, FindingState::Open, Category::Syntax),
            row(Severity::Error, FindingState::Resolved, Category::AntiPattern),
            row(Severity::Warning, FindingState::Open, Category::Syntax),
        ];
        sort_for_listing(&mut rows);
        let severities: Vec<_> = rows.iter().map(|r| r.finding.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Error, Severity::Warning, Severity::Info]
        );
    }

    #[test]
    fn ties_broken_by_state_then_category() {
        let mut rows = vec![
            row(Severity::Error, FindingState::Ignored, Category::Syntax),
            row(Severity::Error, FindingState::Open, Category::Integrity),
            row(Severity::Error, FindingState::Open, Category::Syntax),
        ];
        sort_for_listing(&mut rows);
        let keys: Vec<_> = rows.iter().map(|r| (r.state, r.finding.category)).collect();
        assert_eq!(
            keys,
            vec![
                (FindingState::Open, Category::Syntax),
                (FindingState::Open, Category::Integrity),
                (FindingState::Ignored, Category::Syntax),
            ]
        );
    }

    fn severity() -> impl Strategy<Value = Severity> {
        prop_oneof![Just(Severity::Error), Just(Severity::Warning), Just(Severity::Info)]
    }

    fn state() -> impl Strategy<Value = FindingState> {
        prop_oneof![
            Just(FindingState::Open),
            Just(FindingState::Ignored),
            Just(FindingState::Resolved)
        ]
    }

    fn category() -> impl Strategy<Value = Category> {
        prop_oneof![
            Just(Category::Syntax),
            Just(Category::Integrity),
            Just(Category::Normalization),
            Just(Category::AntiPattern)
        ]
    }

    proptest! {
        #[test]
        fn sorted_output_is_non_decreasing(
            specs in prop::collection::vec((severity(), state(), category()), 0..40)
        ) {
            let mut rows: Vec<_> = specs
                .into_iter()
                .map(|(sev, st, cat)| row(sev, st, cat))
                .collect();
            sort_for_listing(&mut rows);
            for pair in rows.windows(2) {
                prop_assert_ne!(compare_for_listing(&pair[0], &pair[1]), Ordering::Greater);
            }
        }

        #[test]
        fn sort_is_independent_of_input_order(
            specs in prop::collection::vec((severity(), state(), category()), 0..20)
        ) {
            let rows: Vec<_> = specs
                .into_iter()
                .map(|(sev, st, cat)| row(sev, st, cat))
                .collect();
            let mut forward = rows.clone();
            let mut backward: Vec<_> = rows.into_iter().rev().collect();
            sort_for_listing(&mut forward);
            sort_for_listing(&mut backward);
            let key = |r: &PersistedFinding| {
                (r.finding.severity, r.state, r.finding.category, r.finding.element_path.clone())
            };
            prop_assert_eq!(
                forward.iter().map(key).collect::<Vec<_>>(),
                backward.iter().map(key).collect::<Vec<_>>()
            );
        }
    }
}
