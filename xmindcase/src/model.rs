//! # Test case model
//!
//! Two shapes of the same data:
//!
//! - the tree: [`Suite`] → sub-suites and [`Case`]s → [`Step`]s, built fresh for each
//!   read, reconstruction, or export and thrown away afterwards;
//! - the flat [`CaseRecord`], the persisted form, which keeps only the top-level suite
//!   label and folds any deeper nesting into the case name.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Importance used when a case carries no priority marker.
pub const DEFAULT_IMPORTANCE: i64 = 2;

/// Suite label used when a persisted record has no `suite` key.
pub const DEFAULT_SUITE: &str = "Default Suite";

/// How a case is executed.
///
/// Persisted as an integer (`1` manual, `2` automated). Deserialization also accepts the
/// string forms older records carry (`"2"`, `"Automated"`); anything unrecognized is manual.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(from = "RawExecutionType", into = "u8")]
#[strum(ascii_case_insensitive)]
pub enum ExecutionType {
    #[default]
    Manual,
    Automated,
}

impl ExecutionType {
    /// Numeric code used by the persisted records and the XML export.
    pub fn code(self) -> u8 {
        match self {
            Self::Manual => 1,
            Self::Automated => 2,
        }
    }
}

impl From<ExecutionType> for u8 {
    fn from(value: ExecutionType) -> Self {
        value.code()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExecutionType {
    Code(i64),
    Text(String),
    Other(Value),
}

impl From<RawExecutionType> for ExecutionType {
    fn from(raw: RawExecutionType) -> Self {
        let automated = match raw {
            RawExecutionType::Code(code) => code == 2,
            RawExecutionType::Text(text) => {
                let text = text.trim();
                text == "2" || text.eq_ignore_ascii_case("automated")
            }
            RawExecutionType::Other(_) => false,
        };
        if automated {
            Self::Automated
        } else {
            Self::Manual
        }
    }
}

/// A named grouping of cases and nested sub-suites.
///
/// Sub-suite names are unique among siblings when built by [`crate::reconstruct`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    pub name: String,
    /// Free text attached to the suite topic (its note).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
    #[serde(default)]
    pub sub_suites: Vec<Suite>,
    #[serde(default)]
    pub testcase_list: Vec<Case>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the sub-suite with exactly this name, creating it at the end of the
    /// sub-suite list if none exists. The first match wins.
    pub fn sub_suite_mut(&mut self, name: &str) -> &mut Self {
        let idx = if let Some(idx) = self.sub_suites.iter().position(|s| s.name == name) {
            idx
        } else {
            self.sub_suites.push(Self::new(name));
            self.sub_suites.len() - 1
        };
        &mut self.sub_suites[idx]
    }

    /// Number of cases in this suite and all of its descendants.
    pub fn case_count(&self) -> usize {
        self.testcase_list.len() + self.sub_suites.iter().map(Self::case_count).sum::<usize>()
    }
}

/// A single test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub name: String,
    /// 1 = high, 2 = medium, 3 = low. Other values are carried through.
    pub importance: i64,
    pub execution_type: ExecutionType,
    /// Opaque id binding the case to an automated test.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tc_id: Option<String>,
    #[serde(default)]
    pub preconditions: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Default for Case {
    fn default() -> Self {
        Self {
            name: String::new(),
            importance: DEFAULT_IMPORTANCE,
            execution_type: ExecutionType::Manual,
            tc_id: None,
            preconditions: String::new(),
            summary: String::new(),
            steps: Vec::new(),
            result: None,
            comment: None,
        }
    }
}

impl Case {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Project this case into its flat form under the given suite label.
    pub fn to_record(&self, suite: &str, name: String) -> CaseRecord {
        CaseRecord {
            suite: suite.to_string(),
            name,
            product: None,
            preconditions: self.preconditions.clone(),
            summary: self.summary.clone(),
            steps: self
                .steps
                .iter()
                .map(|step| StepRecord {
                    step_number: step.step_number,
                    actions: step.actions.clone(),
                    expectedresults: step.expectedresults.clone(),
                })
                .collect(),
            importance: self.importance,
            execution_type: self.execution_type,
            tc_id: self.tc_id.clone(),
            result: self.result.clone(),
            comment: self.comment.clone(),
        }
    }

    /// Build a case from a flat record, renaming it and renumbering its steps from 1.
    pub fn from_record(record: &CaseRecord, name: String) -> Self {
        Self {
            name,
            importance: record.importance,
            execution_type: record.execution_type,
            tc_id: record
                .tc_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(ToString::to_string),
            preconditions: record.preconditions.clone(),
            summary: record.summary.clone(),
            steps: record
                .steps
                .iter()
                .zip(1u32..)
                .map(|(step, step_number)| Step {
                    step_number,
                    actions: step.actions.clone(),
                    expectedresults: step.expectedresults.clone(),
                })
                .collect(),
            result: record.result.clone(),
            comment: record.comment.clone(),
        }
    }
}

/// One action / expected-result pair. `step_number` is 1-based and contiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step_number: u32,
    pub actions: String,
    #[serde(default)]
    pub expectedresults: String,
}

impl Step {
    pub fn new(step_number: u32, actions: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            step_number,
            actions: actions.into(),
            expectedresults: expected.into(),
        }
    }
}

/// Persisted form of a [`Case`].
///
/// `suite` is the top-level grouping label only; nesting below it lives in `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(default = "default_suite", deserialize_with = "suite_or_default")]
    pub suite: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Name of the outline root (sheet) the case was read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preconditions: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<StepRecord>,
    #[serde(default = "default_importance", deserialize_with = "importance_or_default")]
    pub importance: i64,
    #[serde(default)]
    pub execution_type: ExecutionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Persisted form of a [`Step`]. A zero `step_number` means "use the position".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub step_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expectedresults: String,
}

fn default_suite() -> String {
    DEFAULT_SUITE.to_string()
}

const fn default_importance() -> i64 {
    DEFAULT_IMPORTANCE
}

// Stored records may carry explicit nulls where a value is expected.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn suite_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_suite))
}

fn importance_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(DEFAULT_IMPORTANCE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_type_accepts_legacy_forms() {
        let parsed: Vec<ExecutionType> =
            serde_json::from_str(r#"[1, 2, "2", "Automated", "manual", 7, "x"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                ExecutionType::Manual,
                ExecutionType::Automated,
                ExecutionType::Automated,
                ExecutionType::Automated,
                ExecutionType::Manual,
                ExecutionType::Manual,
                ExecutionType::Manual,
            ]
        );
        assert_eq!(
            serde_json::to_string(&ExecutionType::Automated).unwrap(),
            "2"
        );
    }

    #[test]
    fn record_defaults_fill_missing_keys() {
        let record: CaseRecord = serde_json::from_str(r#"{"name": "only a name"}"#).unwrap();
        assert_eq!(record.suite, DEFAULT_SUITE);
        assert_eq!(record.importance, DEFAULT_IMPORTANCE);
        assert_eq!(record.execution_type, ExecutionType::Manual);
        assert!(record.steps.is_empty());
        assert!(record.tc_id.is_none());
    }

    #[test]
    fn record_nulls_fall_back_to_defaults() {
        let record: CaseRecord = serde_json::from_str(
            r#"{"suite": null, "name": "n", "preconditions": null, "summary": null,
                "importance": null, "execution_type": null, "tc_id": null,
                "steps": [{"step_number": null, "actions": "a", "expectedresults": null}]}"#,
        )
        .unwrap();
        assert_eq!(record.suite, DEFAULT_SUITE);
        assert_eq!(record.preconditions, "");
        assert_eq!(record.importance, DEFAULT_IMPORTANCE);
        assert_eq!(record.execution_type, ExecutionType::Manual);
        assert_eq!(record.steps[0].step_number, 0);
        assert_eq!(record.steps[0].expectedresults, "");

        let steps_null: CaseRecord =
            serde_json::from_str(r#"{"name": "n", "steps": null}"#).unwrap();
        assert!(steps_null.steps.is_empty());
    }

    #[test]
    fn record_carries_free_form_result() {
        let record: CaseRecord =
            serde_json::from_str(r#"{"suite": "s", "name": "n", "result": 0}"#).unwrap();
        assert_eq!(record.result, Some(Value::from(0)));
    }

    #[test]
    fn from_record_renumbers_steps_and_drops_blank_id() {
        let record = CaseRecord {
            suite: "S".into(),
            name: "S > case".into(),
            product: None,
            preconditions: "logged in".into(),
            summary: String::new(),
            steps: vec![
                StepRecord {
                    step_number: 4,
                    actions: "open".into(),
                    expectedresults: "opened".into(),
                },
                StepRecord {
                    step_number: 9,
                    actions: "close".into(),
                    expectedresults: String::new(),
                },
            ],
            importance: 1,
            execution_type: ExecutionType::Automated,
            tc_id: Some("  ".into()),
            result: None,
            comment: None,
        };
        let case = Case::from_record(&record, "case".into());
        assert_eq!(case.name, "case");
        assert_eq!(
            case.steps.iter().map(|s| s.step_number).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(case.tc_id, None);
        assert_eq!(case.importance, 1);
        assert_eq!(case.execution_type, ExecutionType::Automated);
    }

    #[test]
    fn sub_suite_mut_reuses_existing_sibling() {
        let mut suite = Suite::new("root");
        suite.sub_suite_mut("a").testcase_list.push(Case::new("one"));
        suite.sub_suite_mut("b");
        suite.sub_suite_mut("a").testcase_list.push(Case::new("two"));
        assert_eq!(suite.sub_suites.len(), 2);
        assert_eq!(suite.sub_suites[0].testcase_list.len(), 2);
        assert_eq!(suite.case_count(), 2);
    }
}
