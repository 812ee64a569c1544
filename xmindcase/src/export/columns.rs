//! Columnar export for bulk import into Zentao.
//!
//! One header row, then one row per record in input order. Cells use minimal CSV
//! quoting and rows end with `\r\n`.

use std::io::Write;

use snafu::prelude::*;
use tracing::info;

use crate::{
    Result,
    config::ExportConfig,
    error::IoSnafu,
    model::{CaseRecord, StepRecord},
};

/// Header row, in column order.
pub const COLUMN_HEADERS: [&str; 9] = [
    "所属模块",
    "用例名称",
    "前置条件",
    "步骤",
    "预期",
    "关键词",
    "优先级",
    "用例类型",
    "适用阶段",
];

/// Module label used when a record has no suite.
pub const EMPTY_MODULE: &str = "/";

/// Render records as CSV bytes.
pub fn export_columns(records: &[CaseRecord], config: &ExportConfig) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_columns(records, config, &mut out)?;
    Ok(out)
}

/// Render records as CSV into a writer.
pub fn write_columns<W: Write>(
    records: &[CaseRecord],
    config: &ExportConfig,
    out: &mut W,
) -> Result<()> {
    write_row(out, &COLUMN_HEADERS)?;
    for record in records {
        let row = case_row(record, config);
        write_row(out, &row)?;
    }
    info!(rows = records.len(), "wrote columnar export");
    Ok(())
}

/// Cells of one case row, in [`COLUMN_HEADERS`] order.
pub fn case_row(record: &CaseRecord, config: &ExportConfig) -> [String; 9] {
    let (steps, expected) = steps_and_expected(&record.steps);
    let case_type = override_or(config.case_type.as_deref(), || {
        config
            .case_type_labels
            .label(i64::from(record.execution_type.code()))
    });
    let apply_phase = override_or(config.apply_phase.as_deref(), || {
        config.apply_phase_labels.label(record.importance)
    });
    [
        module_label(&record.suite),
        record.name.clone(),
        record.preconditions.clone(),
        steps,
        expected,
        String::new(),
        config.priority_labels.label(record.importance).to_string(),
        case_type,
        apply_phase,
    ]
}

/// Module column value: full-width parentheses normalized, blank suites shown as `/`.
pub fn module_label(suite: &str) -> String {
    if suite.trim().is_empty() {
        return EMPTY_MODULE.to_string();
    }
    suite.replace('（', "(").replace('）', ")")
}

/// Numbered step text and numbered expected-result text.
///
/// Each step contributes `"{n}. {actions}\n"`; only steps with an expected result
/// contribute `"{n}. {expected}\n"` to the second cell. Embedded newlines are removed.
pub fn steps_and_expected(steps: &[StepRecord]) -> (String, String) {
    let mut actions = String::new();
    let mut expected = String::new();
    for (step, position) in steps.iter().zip(1u32..) {
        let n = if step.step_number == 0 {
            position
        } else {
            step.step_number
        };
        actions.push_str(&format!("{n}. {}\n", single_line(&step.actions)));
        if !step.expectedresults.is_empty() {
            expected.push_str(&format!("{n}. {}\n", single_line(&step.expectedresults)));
        }
    }
    (actions, expected)
}

fn override_or<'a>(value: Option<&'a str>, mapped: impl FnOnce() -> &'a str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(mapped)
        .to_string()
}

fn single_line(text: &str) -> String {
    text.replace('\n', "").trim().to_string()
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

fn write_row<W: Write, S: AsRef<str>>(out: &mut W, cells: &[S]) -> Result<()> {
    let line = cells
        .iter()
        .map(|cell| csv_escape(cell.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    out.write_all(line.as_bytes())
        .and_then(|()| out.write_all(b"\r\n"))
        .context(IoSnafu {
            action: "writing csv row",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::ExecutionType, records::records_from_json};

    fn sample() -> Vec<CaseRecord> {
        records_from_json(
            r#"[
            {"suite": "登录（Web）", "name": "Login - ok", "preconditions": "has account",
             "steps": [
                {"step_number": 1, "actions": "open\npage", "expectedresults": " shown "},
                {"step_number": 2, "actions": "submit", "expectedresults": ""}
             ],
             "importance": 1, "execution_type": 2},
            {"suite": "", "name": "orphan, \"quoted\"", "preconditions": "", "steps": [],
             "importance": 99, "execution_type": 1}
        ]"#,
        )
    }

    #[test]
    fn header_only_for_no_records() {
        let bytes = export_columns(&[], &ExportConfig::default()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "所属模块,用例名称,前置条件,步骤,预期,关键词,优先级,用例类型,适用阶段\r\n"
        );
    }

    #[test]
    fn row_cells_follow_lookup_tables() {
        let records = sample();
        let row = case_row(&records[0], &ExportConfig::default());
        assert_eq!(row[0], "登录(Web)");
        assert_eq!(row[1], "Login - ok");
        assert_eq!(row[2], "has account");
        assert_eq!(row[3], "1. openpage\n2. submit\n");
        assert_eq!(row[4], "1. shown\n");
        assert_eq!(row[5], "");
        assert_eq!(row[6], "高");
        assert_eq!(row[7], "接口测试");
        assert_eq!(row[8], "冒烟测试阶段");
    }

    #[test]
    fn unknown_codes_fall_back() {
        let records = sample();
        let row = case_row(&records[1], &ExportConfig::default());
        assert_eq!(row[0], EMPTY_MODULE);
        assert_eq!(row[6], "中");
        assert_eq!(row[7], "功能测试");
        assert_eq!(row[8], "功能测试阶段");
    }

    #[test]
    fn overrides_replace_mapped_labels() {
        let config = ExportConfig::default().with_overrides(Some("安全测试"), Some("系统测试阶段"));
        let row = case_row(&sample()[0], &config);
        assert_eq!(row[7], "安全测试");
        assert_eq!(row[8], "系统测试阶段");
    }

    #[test]
    fn cells_are_quoted_when_needed() {
        let text = String::from_utf8(export_columns(&sample(), &ExportConfig::default()).unwrap())
            .unwrap();
        let lines: Vec<_> = text.split("\r\n").collect();
        assert!(lines[1].starts_with("登录(Web),Login - ok,has account,\"1. openpage\n2. submit\n\","));
        assert!(text.contains("\"orphan, \"\"quoted\"\"\""));
    }

    #[test]
    fn export_is_byte_stable() {
        let mut records = sample();
        records[1].execution_type = ExecutionType::Automated;
        let config = ExportConfig::default();
        assert_eq!(
            export_columns(&records, &config).unwrap(),
            export_columns(&records, &config).unwrap()
        );
    }

    #[test]
    fn zero_step_numbers_use_position() {
        let steps = vec![
            StepRecord {
                step_number: 0,
                actions: "a".into(),
                expectedresults: "x".into(),
            },
            StepRecord {
                step_number: 0,
                actions: "b".into(),
                expectedresults: "y".into(),
            },
        ];
        assert_eq!(
            steps_and_expected(&steps),
            ("1. a\n2. b\n".to_string(), "1. x\n2. y\n".to_string())
        );
    }
}
