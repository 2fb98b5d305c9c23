use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Value};
use tracing::debug;

use jcr_ai::{
    changes_tables, flat_changes, merge_with_tables, HttpSummaryService, LocalSummaryService,
    MergedReport, OutputMode, SummaryService, AiRequest,
};
use jcr_diff::{diff_documents, diff_text, flatten, parse_delta, try_flatten_with, DecodeOptions};
use jcr_report::{build_tables, render_document, stringify_value, RenderMode, Report, TableMode};
use jcr_server::{AppConfig, JcrServer};
use jcr_source::{analyze, GitCliProvider};
use jcr_types::{ChangeKind, ChangeRecord, FileDelta, Table};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let format = cli.format;
    debug!(command = cli.command.name(), ?format, "running command");
    match cli.command {
        Command::Flatten(args) => cmd_flatten(args, &config, format),
        Command::Diff(args) => cmd_diff(args, format),
        Command::Report(args) => cmd_report(args, format),
        Command::Render(args) => cmd_render(args, &config, format),
        Command::Analyze(args) => cmd_analyze(args, &config, format),
        Command::Serve(args) => cmd_serve(args, config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// A blank file is an absent document.
fn parse_document(text: &str, path: &Path) -> anyhow::Result<Option<Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(Some(value))
}

fn read_files(path: &Path) -> anyhow::Result<Vec<FileDelta>> {
    serde_json::from_str(&read_text(path)?)
        .with_context(|| format!("{} must be a JSON array of {{file, diff}} objects", path.display()))
}

fn table_mode(added: bool) -> TableMode {
    if added {
        TableMode::Added
    } else {
        TableMode::Full
    }
}

fn output_mode(mode: SummaryMode) -> OutputMode {
    match mode {
        SummaryMode::Summary => OutputMode::Summary,
        SummaryMode::MultiTables => OutputMode::MultiTables,
        SummaryMode::Table => OutputMode::Table,
        SummaryMode::Files => OutputMode::Files,
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_records(records: &[ChangeRecord]) {
    if records.is_empty() {
        println!("No changes.");
        return;
    }
    for record in records {
        let before = stringify_value(record.before.as_ref());
        let after = stringify_value(record.after.as_ref());
        match record.kind() {
            ChangeKind::Added => println!("{} {}: {}", "+".green().bold(), record.path.bold(), after.green()),
            ChangeKind::Removed => println!("{} {}: {}", "-".red().bold(), record.path.bold(), before.red()),
            ChangeKind::Modified => println!(
                "{} {}: {} → {}",
                "~".yellow().bold(),
                record.path.bold(),
                before.red(),
                after.green()
            ),
        }
    }
}

fn print_tables(tables: &[Table]) {
    if tables.is_empty() {
        println!("No tables.");
    }
    for table in tables {
        println!("{}", table.name.cyan().bold());
        println!("  {}", table.columns.join(" | ").bold());
        if table.is_empty() {
            println!("  {}", "(no rows)".dimmed());
        }
        for row in &table.rows {
            println!("  {}", row.join(" | "));
        }
        println!();
    }
}

fn cmd_flatten(args: FlattenArgs, config: &AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    let delta = parse_delta(&read_text(&args.delta)?)
        .with_context(|| format!("failed to parse {}", args.delta.display()))?;
    let options = if args.strict { DecodeOptions::strict() } else { config.decode };
    let records = try_flatten_with(&delta, options)?;
    match format {
        OutputFormat::Json => print_json(&records),
        OutputFormat::Text => {
            print_records(&records);
            Ok(())
        }
    }
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let before_text = read_text(&args.before)?;
    let after_text = read_text(&args.after)?;
    let before = parse_document(&before_text, &args.before)?;
    let after = parse_document(&after_text, &args.after)?;

    let delta = diff_documents(before.as_ref(), after.as_ref());
    let records = flatten(delta.as_ref());
    let unified = if args.lines {
        let name = args.after.display().to_string();
        Some(diff_text(&before_text, &after_text).to_unified(&args.before.display().to_string(), &name))
    } else {
        None
    };

    match format {
        OutputFormat::Json => {
            let mut out = json!({ "delta": delta, "changes": records });
            if let Some(unified) = unified {
                out["text_diff"] = Value::String(unified);
            }
            print_json(&out)
        }
        OutputFormat::Text => {
            if args.delta {
                print_json(&delta)?;
            } else {
                print_records(&records);
            }
            if let Some(unified) = unified {
                print!("{unified}");
            }
            Ok(())
        }
    }
}

fn cmd_report(args: ReportArgs, format: OutputFormat) -> anyhow::Result<()> {
    let files = read_files(&args.files)?;
    let tables = build_tables(&files, table_mode(args.added));
    match format {
        OutputFormat::Json => print_json(&tables),
        OutputFormat::Text => {
            print_tables(&tables);
            Ok(())
        }
    }
}

fn cmd_render(args: RenderArgs, config: &AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    let files = read_files(&args.files)?;
    let mut render = config.render.clone();
    if args.compact {
        render.mode = RenderMode::Compact;
    }
    if let Some(len) = args.max_len {
        render.max_cell_len = Some(len);
    }
    if let Some(rows) = args.rows_per_page {
        render.rows_per_page = rows;
    }
    if let Some(title) = args.title {
        render.title = title;
    }

    let document = render_document(&build_tables(&files, table_mode(args.added)), &render)?;
    match format {
        OutputFormat::Json => print_json(&document),
        OutputFormat::Text => {
            print!("{}", document.to_text());
            Ok(())
        }
    }
}

fn summarize(files: &[FileDelta], mode: OutputMode, config: &AppConfig) -> anyhow::Result<MergedReport> {
    let changes = flat_changes(files);
    let tables = changes_tables(&changes);
    let request = AiRequest::changes(changes, mode);

    let service: Box<dyn SummaryService> = if config.ai.enabled {
        Box::new(HttpSummaryService::new(&config.ai)?)
    } else {
        Box::new(LocalSummaryService)
    };
    let runtime = tokio::runtime::Runtime::new()?;
    let output = runtime.block_on(service.generate(&request))?;
    Ok(merge_with_tables(&config.render.title, tables, Some(output)))
}

fn cmd_analyze(args: AnalyzeArgs, config: &AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    let provider = if Path::new(&args.repo).is_dir() {
        GitCliProvider::open(&args.repo)
    } else {
        GitCliProvider::clone_url(&args.repo)?
    };
    let analysis = analyze(&provider)?;
    debug!(files = analysis.files.len(), "analysis complete");
    let report = Report::from_files(config.render.title.clone(), &analysis.files, table_mode(args.added))
        .with_commits(analysis.commits.clone());
    let summary = args
        .summary
        .map(|mode| summarize(&analysis.files, output_mode(mode), config))
        .transpose()?;

    match format {
        OutputFormat::Json => {
            let mut out = json!({ "report": report, "summary": summary });
            if args.lines {
                out["text_diff"] = Value::String(analysis.text_diff);
            }
            print_json(&out)
        }
        OutputFormat::Text => {
            println!("{} {}", report.title.bold(), analysis.commits.short().dimmed());
            if analysis.is_empty() {
                println!("No JSON changes.");
            } else {
                println!("{} changes in {} files\n", report.change_count(), report.tables.len());
                print_tables(&report.tables);
            }
            if let Some(summary) = summary {
                if !summary.description.is_empty() {
                    println!("{}\n{}\n", "Summary".bold(), summary.description);
                }
                print_tables(&summary.render_tables()[summary.tables.len()..]);
            }
            if args.lines {
                print!("{}", analysis.text_diff);
            }
            Ok(())
        }
    }
}

fn cmd_serve(args: ServeArgs, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind}"))?;
    }
    println!("{} JCR server on {}", "✓".green().bold(), config.server.bind_addr.to_string().bold());
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(JcrServer::new(config)?.serve())?;
    Ok(())
}
