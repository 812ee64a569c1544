//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object (or no config file at all) gives
//! the stock behavior. Partial documents override only the keys they name.
//!
//! ```json
//! {
//!   "reader": { "name_separator": " - " },
//!   "export": { "root_name": "Sprint 12", "case_type": "功能测试" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::{
    Result,
    convention::{
        LabelTable, default_apply_phase_labels, default_case_type_labels, default_priority_labels,
    },
    error::DeserializationSnafu,
};

/// Root name used for reconstructed trees when the caller has none.
pub const DEFAULT_ROOT_NAME: &str = "Exported from XMind2TestCase";

/// Default pattern for automation markers, e.g. `@pytest.mark.tc_id("TC-001")`.
pub const DEFAULT_MARKER_PATTERN: &str = r#"@pytest\.mark\.tc_id\(['"](.+?)['"]\)"#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub reader: ReaderConfig,
    pub export: ExportConfig,
    pub coverage: CoverageConfig,
}

impl EngineConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context(DeserializationSnafu {
            what: "engine config",
        })
    }
}

/// Settings for reading outline documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Joins sub-suite names and the case name into a flat record's `name`.
    /// Should be one of the reconstruction separator candidates.
    pub name_separator: String,
    /// Topics whose title starts with any of these are skipped with their subtree.
    pub ignore_prefixes: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            name_separator: " > ".to_string(),
            ignore_prefixes: vec!["#".to_string(), "!".to_string(), "！".to_string()],
        }
    }
}

/// Settings for the exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub root_name: String,
    /// Case-type label forced onto every columnar row.
    pub case_type: Option<String>,
    /// Apply-phase label forced onto every columnar row.
    pub apply_phase: Option<String>,
    pub priority_labels: LabelTable,
    pub case_type_labels: LabelTable,
    pub apply_phase_labels: LabelTable,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            case_type: None,
            apply_phase: None,
            priority_labels: default_priority_labels(),
            case_type_labels: default_case_type_labels(),
            apply_phase_labels: default_apply_phase_labels(),
        }
    }
}

impl ExportConfig {
    /// Copy of this config with the per-export overrides applied. Blank overrides are
    /// treated as absent.
    pub fn with_overrides(&self, case_type: Option<&str>, apply_phase: Option<&str>) -> Self {
        let keep = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };
        Self {
            case_type: keep(case_type).or_else(|| self.case_type.clone()),
            apply_phase: keep(apply_phase).or_else(|| self.apply_phase.clone()),
            ..self.clone()
        }
    }
}

/// Settings for the automation coverage scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Regex with one capture group holding the case id.
    pub marker_pattern: String,
    /// File extensions (without the dot) to scan.
    pub extensions: Vec<String>,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            marker_pattern: DEFAULT_MARKER_PATTERN.to_string(),
            extensions: vec!["py".to_string()],
        }
    }
}
