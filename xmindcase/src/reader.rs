//! Outline reader: outline document bytes to a suite tree and flat case records.
//!
//! Topic roles follow the editor conventions:
//!
//! - each sheet's root topic becomes a root [`Suite`];
//! - first-level topics under a root are always top-level suites;
//! - below that, a topic is a [`Case`] when it carries a `priority-N` marker or has no
//!   children, and a sub-suite otherwise;
//! - a case's children are its steps; a step's children are its expected results.
//!
//! [`read_outline`] reports every failure. [`parse_outline`] is the lenient boundary:
//! a malformed container yields an empty result and a warning.

use std::io::{Cursor, Read};

use snafu::prelude::*;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::{
    Result,
    config::ReaderConfig,
    convention::{LabelKind, classify_label, is_ignored_title, priority_from_marker},
    error::{DeserializationSnafu, IoSnafu, MissingEntrySnafu, ZipSnafu},
    model::{Case, CaseRecord, DEFAULT_IMPORTANCE, Step, Suite},
    topic::{CONTENT_ENTRY, Sheet, Topic},
};

/// Result of reading an outline document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedOutline {
    /// One root suite per sheet.
    pub suites: Vec<Suite>,
    /// Flat records in document order, with sub-suite names folded into each case name.
    pub cases: Vec<CaseRecord>,
}

impl ParsedOutline {
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty() && self.suites.iter().all(|s| s.sub_suites.is_empty())
    }
}

/// Read the sheets from an outline container.
pub fn read_sheets(bytes: &[u8]) -> Result<Vec<Sheet>> {
    let mut zip = ZipArchive::new(Cursor::new(bytes)).context(ZipSnafu)?;
    let mut entry = match zip.by_name(CONTENT_ENTRY) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return MissingEntrySnafu {
                entry: CONTENT_ENTRY,
            }
            .fail();
        }
        Err(source) => return Err(source).context(ZipSnafu),
    };
    let mut content = String::new();
    entry.read_to_string(&mut content).context(IoSnafu {
        action: format!("reading {CONTENT_ENTRY}"),
    })?;
    serde_json::from_str(&content).context(DeserializationSnafu {
        what: CONTENT_ENTRY,
    })
}

/// Read an outline document into suites and flat records.
pub fn read_outline(bytes: &[u8], config: &ReaderConfig) -> Result<ParsedOutline> {
    let sheets = read_sheets(bytes)?;
    let mut parsed = ParsedOutline::default();
    for sheet in &sheets {
        let mut walk = SheetWalk {
            config,
            product: sheet.root_topic.title.trim(),
            top: "",
            path: Vec::new(),
            cases: &mut parsed.cases,
        };
        parsed.suites.push(walk.root(&sheet.root_topic));
    }
    debug!(
        sheets = sheets.len(),
        cases = parsed.cases.len(),
        "read outline document"
    );
    Ok(parsed)
}

/// Lenient form of [`read_outline`]: errors are logged and produce an empty result.
pub fn parse_outline(bytes: &[u8], config: &ReaderConfig) -> ParsedOutline {
    read_outline(bytes, config).unwrap_or_else(|err| {
        warn!("outline document not parsed: {err}");
        ParsedOutline::default()
    })
}

/// Build the root suite for one sheet.
pub fn sheet_to_suite(sheet: &Sheet, config: &ReaderConfig) -> Suite {
    let mut cases = Vec::new();
    SheetWalk {
        config,
        product: sheet.root_topic.title.trim(),
        top: "",
        path: Vec::new(),
        cases: &mut cases,
    }
    .root(&sheet.root_topic)
}

/// Walks one sheet, building its suite tree and collecting flat records in document
/// order as cases are met.
struct SheetWalk<'a> {
    config: &'a ReaderConfig,
    product: &'a str,
    top: &'a str,
    /// Sub-suite names between the top-level suite and the current topic.
    path: Vec<&'a str>,
    cases: &'a mut Vec<CaseRecord>,
}

impl<'a> SheetWalk<'a> {
    fn root(&mut self, root: &'a Topic) -> Suite {
        let mut suite = Suite::new(root.title.trim());
        if let Some(note) = root.note_text() {
            suite.details = note.to_string();
        }
        for child in visible_children(root, self.config) {
            self.top = child.title.trim();
            suite.sub_suites.push(self.suite(child));
        }
        suite
    }

    fn suite(&mut self, topic: &'a Topic) -> Suite {
        let mut suite = Suite::new(topic.title.trim());
        if let Some(note) = topic.note_text() {
            suite.details = note.to_string();
        }
        for child in visible_children(topic, self.config) {
            if is_case_topic(child, self.config) {
                let case = topic_to_case(child, self.config);
                self.record(&case);
                suite.testcase_list.push(case);
            } else {
                self.path.push(child.title.trim());
                suite.sub_suites.push(self.suite(child));
                self.path.pop();
            }
        }
        suite
    }

    fn record(&mut self, case: &Case) {
        let separator = self.config.name_separator.as_str();
        let mut name = self.path.join(separator);
        if !name.is_empty() {
            name.push_str(separator);
        }
        name.push_str(&case.name);
        let mut record = case.to_record(self.top, name);
        record.product = Some(self.product.to_string());
        self.cases.push(record);
    }
}

fn visible_children<'a>(
    topic: &'a Topic,
    config: &'a ReaderConfig,
) -> impl Iterator<Item = &'a Topic> + 'a {
    topic
        .attached()
        .iter()
        .filter(|child| !is_ignored_title(&child.title, &config.ignore_prefixes))
}

fn topic_priority(topic: &Topic) -> Option<i64> {
    topic
        .markers
        .iter()
        .find_map(|marker| priority_from_marker(&marker.marker_id))
}

/// True when a topic below a top-level suite should be read as a case.
pub fn is_case_topic(topic: &Topic, config: &ReaderConfig) -> bool {
    topic_priority(topic).is_some() || visible_children(topic, config).next().is_none()
}

fn topic_to_case(topic: &Topic, config: &ReaderConfig) -> Case {
    let mut case = Case::new(topic.title.trim());
    case.importance = topic_priority(topic).unwrap_or(DEFAULT_IMPORTANCE);
    for label in &topic.labels {
        match classify_label(label) {
            Some(LabelKind::ExecutionType(execution_type)) => case.execution_type = execution_type,
            Some(LabelKind::CaseId(id)) => {
                if case.tc_id.is_none() {
                    case.tc_id = Some(id);
                } else {
                    debug!(case = %case.name, label = %id, "extra case id label ignored");
                }
            }
            None => {}
        }
    }
    if let Some(note) = topic.note_text() {
        case.preconditions = note.to_string();
    }
    case.steps = visible_children(topic, config)
        .zip(1u32..)
        .map(|(step_topic, step_number)| {
            let expected = visible_children(step_topic, config)
                .map(|t| t.title.trim())
                .filter(|title| !title.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            Step::new(step_number, step_topic.title.trim(), expected)
        })
        .collect();
    case
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use super::*;
    use crate::model::ExecutionType;

    fn container(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    const CONTENT: &str = r##"[{
        "id": "s1", "class": "sheet", "title": "Canvas 1",
        "rootTopic": {
            "id": "root", "title": "Shop",
            "children": {"attached": [
                {"id": "a", "title": "Checkout", "children": {"attached": [
                    {"id": "b", "title": "Payment", "children": {"attached": [
                        {"id": "c", "title": "Pay by card",
                         "markers": [{"markerId": "priority-1"}],
                         "labels": ["TC-7", "自动"],
                         "notes": {"plain": {"content": "cart has items"}},
                         "children": {"attached": [
                            {"id": "d", "title": "enter card", "children": {"attached": [
                                {"id": "e", "title": "card accepted"}]}},
                            {"id": "f", "title": "confirm"}
                         ]}}
                    ]}},
                    {"id": "g", "title": "Empty cart"},
                    {"id": "h", "title": "# Draft idea", "children": {"attached": [
                        {"id": "i", "title": "not a case"}]}}
                ]}}
            ]}
        }
    }]"##;

    #[test]
    fn reads_suites_cases_and_steps() {
        let bytes = container(&[(CONTENT_ENTRY, CONTENT)]);
        let parsed = read_outline(&bytes, &ReaderConfig::default()).unwrap();

        assert_eq!(parsed.suites.len(), 1);
        let root = &parsed.suites[0];
        assert_eq!(root.name, "Shop");
        let checkout = &root.sub_suites[0];
        assert_eq!(checkout.name, "Checkout");
        assert_eq!(checkout.testcase_list.len(), 1);
        assert_eq!(checkout.testcase_list[0].name, "Empty cart");
        assert!(checkout.testcase_list[0].steps.is_empty());

        let payment = &checkout.sub_suites[0];
        assert_eq!(payment.name, "Payment");
        let card = &payment.testcase_list[0];
        assert_eq!(card.name, "Pay by card");
        assert_eq!(card.importance, 1);
        assert_eq!(card.execution_type, ExecutionType::Automated);
        assert_eq!(card.tc_id.as_deref(), Some("TC-7"));
        assert_eq!(card.preconditions, "cart has items");
        assert_eq!(
            card.steps,
            vec![
                Step::new(1, "enter card", "card accepted"),
                Step::new(2, "confirm", ""),
            ]
        );
    }

    #[test]
    fn flat_records_fold_sub_suites_into_names() {
        let bytes = container(&[(CONTENT_ENTRY, CONTENT)]);
        let parsed = read_outline(&bytes, &ReaderConfig::default()).unwrap();
        let names: Vec<_> = parsed
            .cases
            .iter()
            .map(|c| (c.suite.as_str(), c.name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Checkout", "Payment > Pay by card"),
                ("Checkout", "Empty cart")
            ]
        );
        assert_eq!(parsed.cases[0].product.as_deref(), Some("Shop"));
    }

    #[test]
    fn flat_records_follow_document_order() {
        let content = r#"[{"rootTopic": {"title": "App", "children": {"attached": [
            {"title": "Login", "children": {"attached": [
                {"title": "First case", "markers": [{"markerId": "priority-1"}]},
                {"title": "Form", "children": {"attached": [{"title": "Second case"}]}},
                {"title": "Third case"}
            ]}},
            {"title": "Search", "children": {"attached": [{"title": "Fourth case"}]}}
        ]}}}]"#;
        let parsed =
            read_outline(&container(&[(CONTENT_ENTRY, content)]), &ReaderConfig::default())
                .unwrap();
        let names: Vec<_> = parsed
            .cases
            .iter()
            .map(|c| (c.suite.as_str(), c.name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Login", "First case"),
                ("Login", "Form > Second case"),
                ("Login", "Third case"),
                ("Search", "Fourth case"),
            ]
        );
        let login = &parsed.suites[0].sub_suites[0];
        assert_eq!(login.sub_suites[0].name, "Form");
        assert_eq!(login.testcase_list.len(), 2);
    }

    #[test]
    fn multiple_expected_results_are_joined() {
        let content = r#"[{"rootTopic": {"title": "R", "children": {"attached": [
            {"title": "S", "children": {"attached": [
                {"title": "C", "markers": [{"markerId": "priority-3"}], "children": {"attached": [
                    {"title": "do", "children": {"attached": [{"title": "one"}, {"title": "two"}]}}
                ]}}
            ]}}
        ]}}}]"#;
        let parsed =
            read_outline(&container(&[(CONTENT_ENTRY, content)]), &ReaderConfig::default())
                .unwrap();
        let case = &parsed.suites[0].sub_suites[0].testcase_list[0];
        assert_eq!(case.importance, 3);
        assert_eq!(case.steps[0].expectedresults, "one\ntwo");
    }

    #[test]
    fn missing_content_entry_is_reported() {
        let bytes = container(&[("content.xml", "<xmap-content/>")]);
        let err = read_outline(&bytes, &ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, crate::error::XmindCaseError::MissingEntry { .. }));
    }

    #[test]
    fn malformed_input_parses_to_empty() {
        let config = ReaderConfig::default();
        assert_eq!(parse_outline(b"not a zip", &config), ParsedOutline::default());
        let bad_json = container(&[(CONTENT_ENTRY, "{ nope")]);
        assert!(parse_outline(&bad_json, &config).is_empty());
        assert!(parse_outline(&[], &config).is_empty());
    }
}
