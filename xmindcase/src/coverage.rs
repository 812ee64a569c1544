//! Automation coverage: which cases are bound to automated tests.
//!
//! Test sources mark the case they cover with a decorator such as
//! `@pytest.mark.tc_id("TC-001")`. The scanner walks a source tree, collects every id it
//! finds, and [`coverage_report`] matches those ids against the `tc_id` of flat records.

use std::{
    collections::BTreeSet,
    fs,
    path::Path,
};

use regex::Regex;
use serde::Serialize;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    Result,
    config::CoverageConfig,
    error::{PatternSnafu, ScanSnafu},
    model::CaseRecord,
};

/// Extracts case ids from automation sources.
#[derive(Debug, Clone)]
pub struct AutomationScanner {
    pattern: Regex,
    extensions: Vec<String>,
}

impl AutomationScanner {
    /// Scanner for `@pytest.mark.tc_id(..)` markers in `.py` files.
    pub fn new() -> Result<Self> {
        Self::from_config(&CoverageConfig::default())
    }

    pub fn from_config(config: &CoverageConfig) -> Result<Self> {
        let pattern = Regex::new(&config.marker_pattern).context(PatternSnafu {
            pattern: config.marker_pattern.as_str(),
        })?;
        Ok(Self {
            pattern,
            extensions: config.extensions.clone(),
        })
    }

    /// Ids in a source text. Uses the first capture group, or the whole match when the
    /// pattern has none.
    pub fn scan_source(&self, source: &str) -> BTreeSet<String> {
        self.pattern
            .captures_iter(source)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Ids in one file. An unreadable file is logged and yields nothing.
    pub fn scan_file(&self, path: &Path) -> BTreeSet<String> {
        match fs::read_to_string(path) {
            Ok(source) => self.scan_source(&source),
            Err(err) => {
                warn!(path = %path.display(), "skipping unreadable source: {err}");
                BTreeSet::new()
            }
        }
    }

    /// Ids in every matching file under `root`. A missing root is logged and yields nothing.
    pub fn scan_directory(&self, root: &Path) -> Result<BTreeSet<String>> {
        if !root.exists() {
            warn!(path = %root.display(), "scan root does not exist");
            return Ok(BTreeSet::new());
        }
        let mut files = Vec::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir).context(ScanSnafu { path: dir.clone() })? {
                let path = entry.context(ScanSnafu { path: dir.clone() })?.path();
                if path.is_dir() {
                    stack.push(path);
                } else if self.wants(&path) {
                    files.push(path);
                }
            }
        }
        files.sort();

        let mut ids = BTreeSet::new();
        for path in &files {
            let found = self.scan_file(path);
            if !found.is_empty() {
                debug!(path = %path.display(), count = found.len(), "found case ids");
            }
            ids.extend(found);
        }
        info!(files = files.len(), ids = ids.len(), "scanned automation sources");
        Ok(ids)
    }

    fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }
}

/// A case that carries an external id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseBinding {
    pub tc_id: String,
    pub suite: String,
    pub name: String,
}

/// Result of matching scanned ids against case records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    /// Cases whose id appears in the automation sources.
    pub automated: Vec<CaseBinding>,
    /// Cases with an id that no automation source references.
    pub pending: Vec<CaseBinding>,
    /// Number of cases without an id.
    pub unbound_cases: usize,
    /// Scanned ids that match no case, sorted.
    pub orphan_ids: Vec<String>,
}

/// Match case records against scanned automation ids. Record order is kept.
pub fn coverage_report(records: &[CaseRecord], automated_ids: &BTreeSet<String>) -> CoverageReport {
    let mut report = CoverageReport::default();
    let mut seen = BTreeSet::new();
    for record in records {
        let Some(tc_id) = record.tc_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
        else {
            report.unbound_cases += 1;
            continue;
        };
        seen.insert(tc_id);
        let binding = CaseBinding {
            tc_id: tc_id.to_string(),
            suite: record.suite.clone(),
            name: record.name.clone(),
        };
        if automated_ids.contains(tc_id) {
            report.automated.push(binding);
        } else {
            report.pending.push(binding);
        }
    }
    report.orphan_ids = automated_ids
        .iter()
        .filter(|id| !seen.contains(id.as_str()))
        .cloned()
        .collect();
    report
}
