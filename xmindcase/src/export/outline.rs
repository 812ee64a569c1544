//! Outline re-serialization: suite tree back to an outline document container.
//!
//! The container holds `content.json` (one sheet), an empty `metadata.json`, and a
//! `manifest.json` listing both. Topic ids are fresh v4 UUIDs on every call.

use std::io::{Cursor, Write};

use snafu::prelude::*;
use tracing::info;
use uuid::Uuid;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    Result,
    convention::{PRIORITY_MARKER_PREFIX, execution_type_label},
    error::{IoSnafu, SerializationSnafu, ZipSnafu},
    model::{Case, Step, Suite},
    topic::{
        CONTENT_ENTRY, LOGIC_RIGHT_STRUCTURE, MANIFEST_ENTRY, METADATA_ENTRY, Manifest, Marker,
        Sheet, Topic,
    },
};

/// Title of the generated sheet.
pub const SHEET_TITLE: &str = "Canvas 1";

/// Title of the synthetic root topic used when there is not exactly one root suite.
pub const TEST_PLAN_TITLE: &str = "Test Plan";

/// Render a suite tree as outline document bytes.
pub fn export_outline(suites: &[Suite]) -> Result<Vec<u8>> {
    let sheets = suites_to_sheets(suites);
    let content = serde_json::to_vec(&sheets).context(SerializationSnafu)?;
    let manifest = serde_json::to_vec(&Manifest::for_entries([CONTENT_ENTRY, METADATA_ENTRY]))
        .context(SerializationSnafu)?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in [
        (CONTENT_ENTRY, content.as_slice()),
        (METADATA_ENTRY, b"{}".as_slice()),
        (MANIFEST_ENTRY, manifest.as_slice()),
    ] {
        zip.start_file(name, options).context(ZipSnafu)?;
        zip.write_all(body).context(IoSnafu {
            action: format!("writing {name}"),
        })?;
    }
    let bytes = zip.finish().context(ZipSnafu)?.into_inner();
    info!(
        cases = suites.iter().map(Suite::case_count).sum::<usize>(),
        bytes = bytes.len(),
        "wrote outline export"
    );
    Ok(bytes)
}

/// Build the sheet list for a suite tree.
pub fn suites_to_sheets(suites: &[Suite]) -> Vec<Sheet> {
    let mut root_topic = if let [single] = suites {
        suite_topic(single)
    } else {
        let mut plan = new_topic(TEST_PLAN_TITLE);
        plan.set_attached(suites.iter().map(suite_topic).collect());
        plan
    };
    root_topic.structure_class = Some(LOGIC_RIGHT_STRUCTURE.to_string());
    vec![Sheet {
        id: new_id(),
        class: Some("sheet".to_string()),
        title: SHEET_TITLE.to_string(),
        root_topic,
    }]
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn new_topic(title: &str) -> Topic {
    Topic {
        id: new_id(),
        title: title.to_string(),
        ..Topic::default()
    }
}

fn suite_topic(suite: &Suite) -> Topic {
    let mut topic = new_topic(&suite.name);
    topic.set_note(&suite.details);
    topic.set_attached(
        suite
            .sub_suites
            .iter()
            .map(suite_topic)
            .chain(suite.testcase_list.iter().map(case_topic))
            .collect(),
    );
    topic
}

fn case_topic(case: &Case) -> Topic {
    let mut topic = new_topic(&case.name);
    // children alone would read back as a sub-suite
    if case.importance != 0 || !case.steps.is_empty() {
        topic.markers.push(Marker {
            marker_id: format!("{PRIORITY_MARKER_PREFIX}{}", case.importance),
        });
    }
    if let Some(id) = case.tc_id.as_deref().filter(|id| !id.trim().is_empty()) {
        topic.labels.push(id.to_string());
    }
    topic
        .labels
        .push(execution_type_label(case.execution_type).to_string());
    topic.set_note(&case.preconditions);
    topic.set_attached(case.steps.iter().map(step_topic).collect());
    topic
}

fn step_topic(step: &Step) -> Topic {
    let mut topic = new_topic(&step.actions);
    if !step.expectedresults.is_empty() {
        topic.set_attached(vec![new_topic(&step.expectedresults)]);
    }
    topic
}
