//! Hierarchy reconstructor: flat case records back to a suite tree.
//!
//! Records are grouped by their `suite` label into top-level suites, in order of first
//! appearance. Each case name is then split into segments with
//! [`convention::case_segments`]; leading segments become nested sub-suites (reused when
//! a sibling with the same name exists), and the last segment names the case.
//!
//! The flat form is lossy, so this is not an exact inverse of flattening: a case name
//! that happens to contain a separator character is split into sub-suites even if it was
//! a single leaf name in the original tree. The output is deterministic for a given
//! input order.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    convention::{self, choose_separator},
    model::{Case, CaseRecord, Suite},
};

/// Rebuild a suite tree from flat records, wrapped in one root suite named `root_name`.
pub fn reconstruct(records: &[CaseRecord], root_name: &str) -> Vec<Suite> {
    let mut top_level: Vec<Suite> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *by_name.entry(record.suite.as_str()).or_insert_with(|| {
            debug!(suite = %record.suite, "new top-level suite");
            top_level.push(Suite::new(record.suite.as_str()));
            top_level.len() - 1
        });
        let suite = &mut top_level[slot];

        let mut segments = convention::case_segments(&record.name, &suite.name);
        debug!(
            name = %record.name,
            separator = ?choose_separator(&record.name),
            ?segments,
            "split case name"
        );
        let case_name = segments.pop().unwrap_or_default();

        let mut current = suite;
        for part in &segments {
            current = current.sub_suite_mut(part);
        }
        current
            .testcase_list
            .push(Case::from_record(record, case_name));
    }

    let mut root = Suite::new(root_name);
    root.sub_suites = top_level;
    vec![root]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        convention::UNNAMED_CASE,
        model::{ExecutionType, StepRecord},
    };

    fn record(suite: &str, name: &str) -> CaseRecord {
        serde_json::from_value(serde_json::json!({ "suite": suite, "name": name })).unwrap()
    }

    fn case_names(suite: &Suite) -> Vec<&str> {
        suite.testcase_list.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn suite_name_prefix_is_stripped() {
        let roots = reconstruct(&[record("Login", "Login - Valid password")], "X");
        let login = &roots[0].sub_suites[0];
        assert_eq!(login.name, "Login");
        assert!(login.sub_suites.is_empty());
        assert_eq!(case_names(login), vec!["Valid password"]);
    }

    #[test]
    fn empty_name_becomes_unnamed_case() {
        let roots = reconstruct(&[record("Login", "")], "X");
        assert_eq!(case_names(&roots[0].sub_suites[0]), vec![UNNAMED_CASE]);
    }

    #[test]
    fn name_equal_to_suite_stays_a_case() {
        let roots = reconstruct(&[record("Login", "Login")], "X");
        let login = &roots[0].sub_suites[0];
        assert!(login.sub_suites.is_empty());
        assert_eq!(case_names(login), vec!["Login"]);
    }

    #[test]
    fn nested_segments_create_and_reuse_sub_suites() {
        let roots = reconstruct(
            &[
                record("Shop", "Cart > Add > One item"),
                record("Shop", "Cart > Remove > Last item"),
                record("Shop", "Cart > Add > Two items"),
                record("Shop", "Direct"),
            ],
            "Root",
        );
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name, "Root");
        let shop = &roots[0].sub_suites[0];
        assert_eq!(case_names(shop), vec!["Direct"]);
        let cart = &shop.sub_suites[0];
        assert_eq!(cart.name, "Cart");
        assert_eq!(
            cart.sub_suites
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Add", "Remove"]
        );
        assert_eq!(case_names(&cart.sub_suites[0]), vec!["One item", "Two items"]);
        assert_eq!(case_names(&cart.sub_suites[1]), vec!["Last item"]);
    }

    #[test]
    fn top_level_suites_keep_first_appearance_order() {
        let roots = reconstruct(
            &[
                record("B", "one"),
                record("A", "two"),
                record("B", "three"),
            ],
            "X",
        );
        let names: Vec<_> = roots[0].sub_suites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(case_names(&roots[0].sub_suites[0]), vec!["one", "three"]);
    }

    #[test]
    fn sub_suite_match_is_case_sensitive() {
        let roots = reconstruct(
            &[record("S", "Auth > a"), record("S", "auth > b")],
            "X",
        );
        assert_eq!(roots[0].sub_suites[0].sub_suites.len(), 2);
    }

    #[test]
    fn mixed_separators_follow_most_segments_rule() {
        let roots = reconstruct(&[record("S", "A > B - C")], "X");
        let s = &roots[0].sub_suites[0];
        assert_eq!(s.sub_suites[0].name, "A");
        assert_eq!(case_names(&s.sub_suites[0]), vec!["B - C"]);

        let roots = reconstruct(&[record("S", "A-B-C > D")], "X");
        let s = &roots[0].sub_suites[0];
        assert_eq!(s.sub_suites[0].name, "A");
        assert_eq!(s.sub_suites[0].sub_suites[0].name, "B");
        assert_eq!(case_names(&s.sub_suites[0].sub_suites[0]), vec!["C > D"]);
    }

    #[test]
    fn attributes_and_steps_are_carried() {
        let mut rec = record("S", "S > Pay");
        rec.importance = 1;
        rec.execution_type = ExecutionType::Automated;
        rec.tc_id = Some("TC-9".into());
        rec.preconditions = "logged in".into();
        rec.result = Some(serde_json::json!("pass"));
        rec.steps = vec![
            StepRecord {
                step_number: 3,
                actions: "pay".into(),
                expectedresults: "paid".into(),
            },
            StepRecord {
                step_number: 3,
                actions: "check".into(),
                expectedresults: String::new(),
            },
        ];
        let roots = reconstruct(&[rec], "X");
        let case = &roots[0].sub_suites[0].testcase_list[0];
        assert_eq!(case.name, "Pay");
        assert_eq!(case.importance, 1);
        assert_eq!(case.execution_type, ExecutionType::Automated);
        assert_eq!(case.tc_id.as_deref(), Some("TC-9"));
        assert_eq!(case.preconditions, "logged in");
        assert_eq!(case.result, Some(serde_json::json!("pass")));
        assert_eq!(
            case.steps.iter().map(|s| s.step_number).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn no_records_gives_empty_root() {
        let roots = reconstruct(&[], "Empty");
        assert_eq!(roots, vec![Suite::new("Empty")]);
    }

    #[test]
    fn output_is_deterministic() {
        let records = vec![
            record("S", "a / b / c"),
            record("T", "x & y"),
            record("S", "a / d"),
        ];
        assert_eq!(reconstruct(&records, "R"), reconstruct(&records, "R"));
    }
}
