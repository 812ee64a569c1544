use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use xmindcase::{
    config::EngineConfig,
    coverage::{AutomationScanner, coverage_report},
    export::{columns::export_columns, outline::export_outline, testlink::export_testlink_xml},
    model::CaseRecord,
    reader::read_outline,
    reconstruct::reconstruct,
    records::{records_from_json, records_to_json, select_cases},
    template::sample_outline,
};

#[derive(Parser, Debug)]
#[command(name = "xmindcase")]
#[command(author, version, about = "Convert outline documents to and from test cases", long_about = None)]
pub struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, env = "XMINDCASE_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose mode (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Color mode for log output
    #[arg(long, value_enum, default_value_t = ColorArg::Auto, global = true)]
    pub color: ColorArg,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read an outline document and print its flat case records
    Parse(ParseArgs),

    /// Read an outline document and print its suite tree
    Tree(TreeArgs),

    /// Export stored case records to another format
    Export(ExportArgs),

    /// Write a sample outline document
    Template(TemplateArgs),

    /// Report which cases are bound to automated tests
    Coverage(CoverageArgs),
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write records here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Stored case records (JSON array)
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,

    #[arg(long, value_enum)]
    pub format: ExportFormatArg,

    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    /// Comma-separated record indices to export, e.g. "0,2,5"
    #[arg(long, value_name = "INDICES")]
    pub cases: Option<String>,

    /// Root suite name for testlink and xmind output
    #[arg(long, value_name = "NAME")]
    pub root_name: Option<String>,

    /// Case type label for every csv row
    #[arg(long, value_name = "LABEL")]
    pub case_type: Option<String>,

    /// Apply phase label for every csv row
    #[arg(long, value_name = "LABEL")]
    pub apply_phase: Option<String>,
}

#[derive(Args, Debug)]
pub struct TemplateArgs {
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// Stored case records (JSON array)
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,

    /// Root of the automation source tree
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    /// Zentao columnar import
    Csv,
    /// TestLink XML
    Testlink,
    /// Outline document
    Xmind,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Parse(args) => handle_parse(&config, &args),
        Commands::Tree(args) => handle_tree(&config, &args),
        Commands::Export(args) => handle_export(&config, &args),
        Commands::Template(args) => handle_template(&args),
        Commands::Coverage(args) => handle_coverage(&config, &args),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    EngineConfig::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    println!("{text}");
    Ok(())
}

fn read_document(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_records(path: &Path) -> Result<Vec<CaseRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read records {}", path.display()))?;
    Ok(records_from_json(&text))
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}

fn handle_parse(config: &EngineConfig, args: &ParseArgs) -> Result<()> {
    let bytes = read_document(&args.file)?;
    let parsed = read_outline(&bytes, &config.reader)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    match &args.out {
        Some(out) => write_output(out, records_to_json(&parsed.cases)?.as_bytes()),
        None => emit_json(&parsed.cases),
    }
}

fn handle_tree(config: &EngineConfig, args: &TreeArgs) -> Result<()> {
    let bytes = read_document(&args.file)?;
    let parsed = read_outline(&bytes, &config.reader)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    emit_json(&parsed.suites)
}

fn handle_export(config: &EngineConfig, args: &ExportArgs) -> Result<()> {
    let mut records = read_records(&args.records)?;
    if let Some(selection) = &args.cases {
        records = select_cases(&records, selection);
    }
    let root_name = args
        .root_name
        .as_deref()
        .unwrap_or(config.export.root_name.as_str());
    let bytes = match args.format {
        ExportFormatArg::Csv => {
            let export = config
                .export
                .with_overrides(args.case_type.as_deref(), args.apply_phase.as_deref());
            export_columns(&records, &export)?
        }
        ExportFormatArg::Testlink => export_testlink_xml(&reconstruct(&records, root_name))?,
        ExportFormatArg::Xmind => export_outline(&reconstruct(&records, root_name))?,
    };
    write_output(&args.out, &bytes)
}

fn handle_template(args: &TemplateArgs) -> Result<()> {
    write_output(&args.out, &sample_outline()?)
}

fn handle_coverage(config: &EngineConfig, args: &CoverageArgs) -> Result<()> {
    let records = read_records(&args.records)?;
    let scanner = AutomationScanner::from_config(&config.coverage)?;
    let ids = scanner
        .scan_directory(&args.dir)
        .with_context(|| format!("failed to scan {}", args.dir.display()))?;
    emit_json(&coverage_report(&records, &ids))
}
