/*
 * xmindcase - outline to test case conversion engine
 * github.com/stevelr/anytype
 *
 * SPDX-FileCopyrightText: 2025-2026 Steve Schoettler
 * SPDX-License-Identifier: Apache-2.0
 */
//! # xmindcase
//!
//! Converts between mind-map outline documents (zipped `content.json` topic trees)
//! and flat test case records, and renders either form into the formats consumed by
//! test-management tools.
//!
//! ## Data flow
//!
//! ```text
//! outline bytes ──reader──▶ Suite tree ──flatten──▶ Vec<CaseRecord>   (persisted)
//! Vec<CaseRecord> ──reconstruct──▶ Suite tree ──export──▶ CSV / XML / outline bytes
//! ```
//!
//! The flat form only keeps the top-level suite label; deeper nesting is folded into
//! the case name and recovered by [`reconstruct::reconstruct`] with the separator
//! heuristics in [`convention`].
//!
//! ## Quick Start
//!
//! ```rust
//! use xmindcase::prelude::*;
//!
//! # fn example() -> Result<(), XmindCaseError> {
//! let config = EngineConfig::default();
//! let bytes = xmindcase::template::sample_outline()?;
//!
//! let parsed = parse_outline(&bytes, &config.reader);
//! let suites = reconstruct(&parsed.cases, "Release 1.0");
//!
//! let csv = export_columns(&parsed.cases, &config.export)?;
//! let xml = export_testlink_xml(&suites)?;
//! let outline = export_outline(&suites)?;
//! # let _ = (csv, xml, outline);
//! # Ok(())
//! # }
//! ```
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![warn(clippy::default_trait_access)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::implicit_clone)]
#![warn(clippy::match_same_arms)]
#![warn(clippy::option_if_let_else)]
#![warn(clippy::redundant_clone)]
#![warn(clippy::redundant_closure)]
#![warn(clippy::uninlined_format_args)]
#![warn(clippy::unnecessary_wraps)]

pub mod config;
pub mod convention;
pub mod coverage;
pub mod error;
pub mod export;
pub mod flatten;
pub mod model;
pub mod reader;
pub mod reconstruct;
pub mod records;
pub mod template;
pub mod topic;

/// Result type alias using `XmindCaseError` as the default error.
pub type Result<T, E = crate::error::XmindCaseError> = std::result::Result<T, E>;

/// Prelude module - import the engine entry points with `use xmindcase::prelude::*;`
pub mod prelude {
    pub use crate::error::*;
    pub use crate::{
        config::{CoverageConfig, EngineConfig, ExportConfig, ReaderConfig},
        coverage::{AutomationScanner, CoverageReport, coverage_report},
        export::{
            columns::export_columns, outline::export_outline, testlink::export_testlink_xml,
        },
        flatten::{flatten, flatten_with_path},
        model::{Case, CaseRecord, ExecutionType, Step, StepRecord, Suite},
        reader::{ParsedOutline, parse_outline, read_outline},
        reconstruct::reconstruct,
        records::{records_from_json, records_to_json, select_cases},
    };
}
