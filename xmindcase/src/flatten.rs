//! Flattener: suite tree to flat case records.
//!
//! The input is a list of root suites (one per sheet, or the synthetic root produced by
//! [`crate::reconstruct::reconstruct`]). Each record is tagged with the name of the
//! top-level suite it sits under, i.e. the root's direct child; cases owned by a root
//! itself are tagged with the root's name. Within a suite, sub-suites are visited before
//! the suite's own cases, each in order.

use crate::model::{CaseRecord, Suite};

/// Flatten with each record named by the case's own name only.
pub fn flatten(suites: &[Suite]) -> Vec<CaseRecord> {
    flatten_impl(suites, None)
}

/// Flatten with the names of the sub-suites between the top-level suite and the case
/// joined onto the case name with `separator`.
pub fn flatten_with_path(suites: &[Suite], separator: &str) -> Vec<CaseRecord> {
    flatten_impl(suites, Some(separator))
}

fn flatten_impl(suites: &[Suite], separator: Option<&str>) -> Vec<CaseRecord> {
    let mut out = Vec::new();
    for root in suites {
        let mut walker = Walker {
            product: &root.name,
            separator,
            out: &mut out,
        };
        for top in &root.sub_suites {
            walker.walk(top, &top.name, &mut Vec::new());
        }
        walker.emit(root, &root.name, &[]);
    }
    out
}

struct Walker<'a> {
    product: &'a str,
    separator: Option<&'a str>,
    out: &'a mut Vec<CaseRecord>,
}

impl<'a> Walker<'a> {
    fn walk(&mut self, suite: &'a Suite, top: &str, path: &mut Vec<&'a str>) {
        for sub in &suite.sub_suites {
            path.push(&sub.name);
            self.walk(sub, top, path);
            path.pop();
        }
        self.emit(suite, top, path);
    }

    fn emit(&mut self, suite: &Suite, top: &str, path: &[&str]) {
        for case in &suite.testcase_list {
            let name = match self.separator {
                Some(sep) if !path.is_empty() => {
                    let mut name = path.join(sep);
                    name.push_str(sep);
                    name.push_str(&case.name);
                    name
                }
                _ => case.name.clone(),
            };
            let mut record = case.to_record(top, name);
            record.product = Some(self.product.to_string());
            self.out.push(record);
        }
    }
}
