//! CLI argument structs for all subcommands.

use clap::{Args, Parser};

use gitscope::{AnalyzeOptions, DEFAULT_REFLOG_CAP, EventFilter, LoadLimits};

/// Options shared by every subcommand: where the repository is and how to load it.
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// Working tree or `.git` directory to analyze
    #[arg(default_value = ".")]
    pub path: String,

    /// Display label for the repository (default: the path)
    #[arg(long)]
    pub label: Option<String>,

    /// Maximum reflog entries kept per ref (clamped to 100..=200000)
    #[arg(long, default_value_t = DEFAULT_REFLOG_CAP)]
    pub max_reflog_entries: usize,

    /// Maximum number of control files to load
    #[arg(long, default_value = "20000")]
    pub max_files: usize,

    /// Maximum total bytes to load
    #[arg(long, default_value = "268435456")]
    pub max_bytes: u64,

    /// Fail instead of truncating when a load limit is hit
    #[arg(long)]
    pub strict_limits: bool,

    /// Log level: error, warn, info, debug, trace (RUST_LOG overrides)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl RepoArgs {
    pub fn load_limits(&self) -> LoadLimits {
        LoadLimits {
            max_files: self.max_files,
            max_bytes: self.max_bytes,
            strict: self.strict_limits,
        }
    }

    pub fn analyze_options(&self, include_raw_config: bool) -> AnalyzeOptions {
        AnalyzeOptions {
            include_raw_config,
            max_reflog_entries_per_ref: self.max_reflog_entries,
        }
    }
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Print the full snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// Include the verbatim config text in JSON output
    #[arg(long)]
    pub include_raw_config: bool,
}

#[derive(Parser, Debug)]
pub struct RefsArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Print the ref table as JSON
    #[arg(long)]
    pub json: bool,

    /// Only refs whose name starts with this prefix (e.g. refs/tags/)
    #[arg(long)]
    pub prefix: Option<String>,
}

#[derive(Parser, Debug)]
pub struct EventsArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Print events as JSON
    #[arg(long)]
    pub json: bool,

    /// Only events of this action (commit, checkout, merge, cherry-pick, ...)
    #[arg(short, long)]
    pub action: Option<String>,

    /// Author name or email substring (case-insensitive)
    #[arg(long)]
    pub author: Option<String>,

    /// Only events from this ref's log (e.g. HEAD, refs/heads/main)
    #[arg(long = "ref")]
    pub source_ref: Option<String>,

    /// Inclusive lower bound, epoch seconds
    #[arg(long)]
    pub since: Option<i64>,

    /// Inclusive upper bound, epoch seconds
    #[arg(long)]
    pub until: Option<i64>,

    /// Maximum number of events to show (0 = unlimited)
    #[arg(short = 'n', long, default_value = "50")]
    pub limit: usize,
}

impl EventsArgs {
    pub fn filter(&self) -> EventFilter {
        EventFilter {
            action: self.action.clone(),
            author: self.author.clone(),
            source_ref: self.source_ref.clone(),
            since_ms: self.since.map(|s| s.saturating_mul(1000)),
            until_ms: self.until.map(|s| s.saturating_mul(1000)),
            limit: self.limit,
        }
    }
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Print stats as JSON
    #[arg(long)]
    pub json: bool,
}
