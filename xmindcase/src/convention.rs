//! Naming and labelling conventions of the outline format.
//!
//! Each decision point the outline format leaves fuzzy is one pure function here, so the
//! reader, reconstructor, and exporters share a single definition:
//!
//! - [`priority_from_marker`] - `priority-N` marker ids
//! - [`classify_label`] - execution-type labels vs. case-id labels
//! - [`is_ignored_title`] - topics the author has commented out
//! - [`choose_separator`], [`split_case_name`], [`case_segments`] - recovering nesting
//!   from a flat case name
//! - [`LabelTable`] - numeric code to display label lookups with a fallback

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ExecutionType;

/// Prefix of marker ids that carry a case priority.
pub const PRIORITY_MARKER_PREFIX: &str = "priority-";

/// Label that marks a case as automated.
pub const AUTOMATED_LABEL: &str = "自动";

/// Label that marks a case as manual.
pub const MANUAL_LABEL: &str = "手动";

/// Case name used when nothing usable is left of a flat record's name.
pub const UNNAMED_CASE: &str = "Unnamed Case";

/// Separator candidates in tie-break order. Each symbol is tried with surrounding spaces
/// first, then bare. Reordering this list changes reconstruction output.
pub const SEPARATOR_CANDIDATES: [&str; 10] = [
    " > ", ">", " - ", "-", " & ", "&", " + ", "+", " / ", "/",
];

/// Priority carried by a marker id such as `priority-1`.
pub fn priority_from_marker(marker_id: &str) -> Option<i64> {
    marker_id
        .trim()
        .strip_prefix(PRIORITY_MARKER_PREFIX)
        .and_then(|n| n.parse().ok())
}

/// Meaning of a topic label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelKind {
    ExecutionType(ExecutionType),
    CaseId(String),
}

/// Interpret a topic label. Execution-type words win; any other non-blank label is an
/// external case id.
pub fn classify_label(label: &str) -> Option<LabelKind> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    if label == AUTOMATED_LABEL || label.eq_ignore_ascii_case("automated") {
        return Some(LabelKind::ExecutionType(ExecutionType::Automated));
    }
    if label == MANUAL_LABEL || label.eq_ignore_ascii_case("manual") {
        return Some(LabelKind::ExecutionType(ExecutionType::Manual));
    }
    Some(LabelKind::CaseId(label.to_string()))
}

/// Label written back to an outline for an execution type.
pub fn execution_type_label(execution_type: ExecutionType) -> &'static str {
    match execution_type {
        ExecutionType::Manual => MANUAL_LABEL,
        ExecutionType::Automated => AUTOMATED_LABEL,
    }
}

/// True when a topic title starts with one of the ignore prefixes.
pub fn is_ignored_title(title: &str, prefixes: &[String]) -> bool {
    let title = title.trim_start();
    prefixes
        .iter()
        .any(|prefix| !prefix.is_empty() && title.starts_with(prefix.as_str()))
}

/// Pick the separator that splits `name` into the most segments.
///
/// Ties go to the earliest entry in [`SEPARATOR_CANDIDATES`]. Returns `None` when no
/// candidate occurs in the name.
pub fn choose_separator(name: &str) -> Option<&'static str> {
    let mut best = None;
    let mut most = 1;
    for sep in SEPARATOR_CANDIDATES {
        if !name.contains(sep) {
            continue;
        }
        let count = name.split(sep).count();
        if count > most {
            most = count;
            best = Some(sep);
        }
    }
    best
}

/// Split a flat case name on its chosen separator, trimming segments and dropping
/// empty ones. A name with no separator is one segment; a blank name yields none.
pub fn split_case_name(name: &str) -> Vec<String> {
    let parts: Vec<&str> = match choose_separator(name) {
        Some(sep) => name.split(sep).collect(),
        None => vec![name],
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Hierarchy segments of a flat case name inside its top-level suite.
///
/// All but the last segment name nested sub-suites; the last names the case. A leading
/// segment equal to the suite name is dropped. Never returns an empty list: when nothing
/// is left the trimmed literal name is used, or [`UNNAMED_CASE`] if that is blank too.
pub fn case_segments(name: &str, suite_name: &str) -> Vec<String> {
    let mut segments = split_case_name(name);
    if segments.first().is_some_and(|first| first == suite_name) {
        segments.remove(0);
    }
    if segments.is_empty() {
        let literal = name.trim();
        segments.push(if literal.is_empty() {
            UNNAMED_CASE.to_string()
        } else {
            literal.to_string()
        });
    }
    segments
}

/// Lookup table from a numeric code to a display label, with a fallback for codes
/// outside the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelTable {
    pub labels: BTreeMap<i64, String>,
    pub fallback: String,
}

impl LabelTable {
    pub fn new<'a>(
        entries: impl IntoIterator<Item = (i64, &'a str)>,
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            labels: entries
                .into_iter()
                .map(|(code, label)| (code, label.to_string()))
                .collect(),
            fallback: fallback.into(),
        }
    }

    pub fn label(&self, code: i64) -> &str {
        self.labels.get(&code).map_or(self.fallback.as_str(), String::as_str)
    }
}

/// Zentao priority labels: 1 高, 2 中, 3 低.
pub fn default_priority_labels() -> LabelTable {
    LabelTable::new([(1, "高"), (2, "中"), (3, "低")], "中")
}

/// Zentao case-type labels keyed by execution type code.
pub fn default_case_type_labels() -> LabelTable {
    LabelTable::new([(1, "功能测试"), (2, "接口测试")], "功能测试")
}

/// Zentao apply-phase labels keyed by importance.
pub fn default_apply_phase_labels() -> LabelTable {
    LabelTable::new(
        [
            (1, "冒烟测试阶段"),
            (2, "功能测试阶段"),
            (3, "功能测试阶段"),
            (4, "功能测试阶段"),
        ],
        "功能测试阶段",
    )
}
