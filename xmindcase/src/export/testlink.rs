//! TestLink XML export.
//!
//! An unnamed `<testsuite>` wraps one named `<testsuite>` per root suite. Each suite
//! writes its `<details>`, then its sub-suites, then its cases, mirroring the tree 1:1.
//! Free text goes in CDATA sections.

use quick_xml::{
    Writer,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use tracing::info;

use crate::{
    Result,
    error::XmindCaseError,
    model::{Case, Step, Suite},
};

/// Render a suite tree as TestLink XML.
pub fn export_testlink_xml(suites: &[Suite]) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    emit(&mut writer, Event::Start(BytesStart::new("testsuite")))?;
    for suite in suites {
        write_suite(&mut writer, suite)?;
    }
    emit(&mut writer, Event::End(BytesEnd::new("testsuite")))?;
    let cases: usize = suites.iter().map(Suite::case_count).sum();
    info!(cases, "wrote testlink export");
    Ok(writer.into_inner())
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|err| XmindCaseError::Xml {
            message: err.to_string(),
        })
}

fn open(writer: &mut Writer<Vec<u8>>, tag: &str, name: &str) -> Result<()> {
    emit(
        writer,
        Event::Start(BytesStart::new(tag).with_attributes([("name", name)])),
    )
}

fn close(writer: &mut Writer<Vec<u8>>, tag: &str) -> Result<()> {
    emit(writer, Event::End(BytesEnd::new(tag)))
}

fn write_text(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new(tag)))?;
    // CDATA cannot contain its own terminator
    if text.contains("]]>") {
        emit(writer, Event::Text(BytesText::new(text)))?;
    } else {
        emit(writer, Event::CData(BytesCData::new(text)))?;
    }
    close(writer, tag)
}

fn write_suite(writer: &mut Writer<Vec<u8>>, suite: &Suite) -> Result<()> {
    open(writer, "testsuite", &suite.name)?;
    write_text(writer, "details", &suite.details)?;
    for sub in &suite.sub_suites {
        write_suite(writer, sub)?;
    }
    for case in &suite.testcase_list {
        write_case(writer, case)?;
    }
    close(writer, "testsuite")
}

fn write_case(writer: &mut Writer<Vec<u8>>, case: &Case) -> Result<()> {
    open(writer, "testcase", &case.name)?;
    if let Some(id) = &case.tc_id {
        write_text(writer, "externalid", id)?;
    }
    write_text(writer, "summary", &case.summary)?;
    write_text(writer, "preconditions", &case.preconditions)?;
    write_text(
        writer,
        "execution_type",
        &case.execution_type.code().to_string(),
    )?;
    write_text(writer, "importance", &case.importance.to_string())?;
    emit(writer, Event::Start(BytesStart::new("steps")))?;
    for step in &case.steps {
        write_step(writer, step)?;
    }
    close(writer, "steps")?;
    close(writer, "testcase")
}

fn write_step(writer: &mut Writer<Vec<u8>>, step: &Step) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new("step")))?;
    write_text(writer, "step_number", &step.step_number.to_string())?;
    write_text(writer, "actions", &step.actions)?;
    write_text(writer, "expectedresults", &step.expectedresults)?;
    write_text(writer, "execution_type", "1")?;
    close(writer, "step")
}
