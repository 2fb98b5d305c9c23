use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "jcr",
    about = "JSON Change Report: structural diffs of JSON files as tables",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Flatten a delta file into change records
    Flatten(FlattenArgs),
    /// Compare two JSON documents
    Diff(DiffArgs),
    /// Build tables from a list of per-file deltas
    Report(ReportArgs),
    /// Render per-file deltas as a paginated document with footnotes
    Render(RenderArgs),
    /// Diff the last two commits of a git repository
    Analyze(AnalyzeArgs),
    /// Start the HTTP server
    Serve(ServeArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flatten(_) => "flatten",
            Self::Diff(_) => "diff",
            Self::Report(_) => "report",
            Self::Render(_) => "render",
            Self::Analyze(_) => "analyze",
            Self::Serve(_) => "serve",
        }
    }
}

#[derive(Args)]
pub struct FlattenArgs {
    pub delta: PathBuf,
    /// Fail on malformed delta nodes instead of skipping them
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    pub before: PathBuf,
    pub after: PathBuf,
    /// Print the raw delta instead of change records
    #[arg(long)]
    pub delta: bool,
    /// Also print a unified line diff
    #[arg(long)]
    pub lines: bool,
}

#[derive(Args)]
pub struct ReportArgs {
    /// JSON array of `{file, diff}` objects
    pub files: PathBuf,
    /// Only list additions
    #[arg(long)]
    pub added: bool,
}

#[derive(Args)]
pub struct RenderArgs {
    pub files: PathBuf,
    #[arg(long)]
    pub added: bool,
    #[arg(long)]
    pub max_len: Option<usize>,
    #[arg(long)]
    pub compact: bool,
    #[arg(long)]
    pub rows_per_page: Option<usize>,
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Remote URL, or a path to a local repository
    pub repo: String,
    #[arg(long)]
    pub added: bool,
    /// Ask the summary service for this output mode
    #[arg(long)]
    pub summary: Option<SummaryMode>,
    /// Print the unified line diff as well
    #[arg(long)]
    pub lines: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SummaryMode {
    Summary,
    MultiTables,
    Table,
    Files,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Overrides `server.bind_addr` from the config file
    #[arg(long)]
    pub bind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flatten() {
        let cli = Cli::try_parse_from(["jcr", "flatten", "delta.json"]).unwrap();
        if let Command::Flatten(args) = cli.command {
            assert_eq!(args.delta, PathBuf::from("delta.json"));
            assert!(!args.strict);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn command_names() {
        let cli = Cli::try_parse_from(["jcr", "serve"]).unwrap();
        assert_eq!(cli.command.name(), "serve");
        let cli = Cli::try_parse_from(["jcr", "diff", "a.json", "b.json"]).unwrap();
        assert_eq!(cli.command.name(), "diff");
    }

    #[test]
    fn parse_flatten_strict() {
        let cli = Cli::try_parse_from(["jcr", "flatten", "--strict", "d.json"]).unwrap();
        assert!(matches!(cli.command, Command::Flatten(FlattenArgs { strict: true, .. })));
    }

    #[test]
    fn parse_diff() {
        let cli = Cli::try_parse_from(["jcr", "diff", "a.json", "b.json", "--lines"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.before, PathBuf::from("a.json"));
            assert_eq!(args.after, PathBuf::from("b.json"));
            assert!(args.lines);
            assert!(!args.delta);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff_requires_two_files() {
        assert!(Cli::try_parse_from(["jcr", "diff", "a.json"]).is_err());
    }

    #[test]
    fn parse_report_added() {
        let cli = Cli::try_parse_from(["jcr", "report", "files.json", "--added"]).unwrap();
        if let Command::Report(args) = cli.command {
            assert!(args.added);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_render() {
        let cli = Cli::try_parse_from(["jcr", "render", "f.json", "--max-len", "20", "--compact"]).unwrap();
        if let Command::Render(args) = cli.command {
            assert_eq!(args.max_len, Some(20));
            assert!(args.compact);
            assert_eq!(args.rows_per_page, None);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_analyze_with_summary() {
        let cli = Cli::try_parse_from([
            "jcr", "analyze", "https://example.com/repo.git", "--summary", "multi-tables",
        ])
        .unwrap();
        if let Command::Analyze(args) = cli.command {
            assert_eq!(args.repo, "https://example.com/repo.git");
            assert!(matches!(args.summary, Some(SummaryMode::MultiTables)));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["jcr", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind.as_deref(), Some("0.0.0.0:8080"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "jcr", "--verbose", "--format", "json", "--config", "jcr.toml", "flatten", "d.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("jcr.toml")));
    }
}
