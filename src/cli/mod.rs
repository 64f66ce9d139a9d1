//! CLI layer: argument parsing, command dispatch, and text rendering.

pub mod args;

pub use args::*;

use std::fmt::Write as _;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use gitscope::{
    Head, RefTable, ReflogEntry, RepoIdentity, RepoStats, Snapshot, SnapshotError, SourceKind,
    analyze, classify_message, filter_events, format_event_date, load_git_dir,
};

// ─── CLI ─────────────────────────────────────────────────────────────

/// Snapshot analyzer for .git control files: HEAD, refs, remotes, and reflog activity
#[derive(Parser, Debug)]
#[command(
    name = "gitscope",
    version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATETIME"), ")"),
    about,
    after_help = "\
Run 'gitscope <COMMAND> --help' for detailed options.\n\
Common options: [PATH] (repository, default '.'), --json (machine-readable output)"
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Summarize HEAD, refs, remotes, and activity (or dump the snapshot with --json)
    Analyze(AnalyzeArgs),

    /// List the ref table
    Refs(RefsArgs),

    /// List reflog events, newest first
    Events(EventsArgs),

    /// Show aggregate statistics
    Stats(StatsArgs),
}

impl Commands {
    fn repo(&self) -> &RepoArgs {
        match self {
            Commands::Analyze(args) => &args.repo,
            Commands::Refs(args) => &args.repo,
            Commands::Events(args) => &args.repo,
            Commands::Stats(args) => &args.repo,
        }
    }
}

// ─── Main entry point ───────────────────────────────────────────────

pub fn run() {
    let cli = Cli::parse();
    init_logging(&cli.command.repo().log_level);

    let result = match cli.command {
        Commands::Analyze(args) => cmd_analyze(args),
        Commands::Refs(args) => cmd_refs(args),
        Commands::Events(args) => cmd_events(args),
        Commands::Stats(args) => cmd_stats(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

pub(crate) fn parse_log_level(name: &str) -> tracing::Level {
    match name {
        "error" => tracing::Level::ERROR,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::WARN,
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(parse_log_level(level)).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Load the control files under `repo.path` and analyze them.
fn load_snapshot(repo: &RepoArgs, include_raw_config: bool) -> Result<Snapshot, SnapshotError> {
    let path = Path::new(&repo.path);
    if !path.exists() {
        return Err(SnapshotError::InvalidArgs(format!(
            "Path does not exist: {}",
            repo.path
        )));
    }
    let index = load_git_dir(path, &repo.load_limits())?;
    let label = repo.label.clone().unwrap_or_else(|| repo.path.clone());
    let identity = RepoIdentity::new(label, SourceKind::Directory, now_ms());
    analyze(&index, identity, &repo.analyze_options(include_raw_config))
}

// ─── Commands ───────────────────────────────────────────────────────

fn cmd_analyze(args: AnalyzeArgs) -> Result<(), SnapshotError> {
    let snapshot = load_snapshot(&args.repo, args.include_raw_config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_summary(&snapshot));
    }
    Ok(())
}

fn cmd_refs(args: RefsArgs) -> Result<(), SnapshotError> {
    let snapshot = load_snapshot(&args.repo, false)?;
    let prefix = args.prefix.as_deref().unwrap_or("");
    if args.json {
        let selected: RefTable = snapshot
            .refs
            .into_iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .collect();
        println!("{}", serde_json::to_string_pretty(&selected)?);
    } else {
        print!("{}", render_refs(&snapshot.refs, prefix));
    }
    Ok(())
}

fn cmd_events(args: EventsArgs) -> Result<(), SnapshotError> {
    let snapshot = load_snapshot(&args.repo, false)?;
    let filter = args.filter();
    let events = filter_events(&snapshot.events, &filter);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
    } else {
        for event in &events {
            println!("{}", render_event_line(event));
        }
        eprintln!("{} of {} events shown", events.len(), snapshot.events.len());
    }
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> Result<(), SnapshotError> {
    let snapshot = load_snapshot(&args.repo, false)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot.stats)?);
    } else {
        print!("{}", render_stats(&snapshot.stats));
    }
    Ok(())
}

// ─── Rendering ──────────────────────────────────────────────────────

fn short_id(id: &str) -> &str {
    &id[..8.min(id.len())]
}

fn format_ms(ts_ms: i64) -> String {
    format_event_date(ts_ms.div_euclid(1000), "+0000")
}

pub(crate) fn render_head(head: Option<&Head>) -> String {
    match head {
        Some(Head::Symbolic { target }) => format!("{} (symbolic)", target),
        Some(Head::Detached { id }) => format!("detached at {}", short_id(id)),
        None => "(none)".to_string(),
    }
}

pub(crate) fn render_summary(snapshot: &Snapshot) -> String {
    let stats = &snapshot.stats;
    let mut out = String::new();
    let _ = writeln!(out, "Repository: {}", snapshot.identity.label);
    let _ = writeln!(out, "HEAD:       {}", render_head(snapshot.head.as_ref()));
    let _ = writeln!(
        out,
        "Refs:       {} total ({} branches, {} tags, {} remote-tracking)",
        stats.total_refs, stats.branches, stats.tags, stats.remotes
    );

    if snapshot.remote_config.remotes.is_empty() {
        let _ = writeln!(out, "Remotes:    (none)");
    } else {
        let _ = writeln!(out, "Remotes:");
        for remote in &snapshot.remote_config.remotes {
            let _ = write!(out, "  {:<12} {}", remote.name, remote.fetch_url.as_deref().unwrap_or("-"));
            if let Some(ref push) = remote.push_url {
                let _ = write!(out, " (push: {})", push);
            }
            out.push('\n');
        }
    }

    let _ = write!(out, "Events:     {}", stats.events);
    if let (Some(days), Some(avg)) = (stats.active_days, stats.avg_events_per_day) {
        let _ = write!(out, " over {} active days ({:.2}/day)", days, avg);
    }
    out.push('\n');
    if let (Some(first), Some(last)) = (stats.first_activity_ts, stats.last_activity_ts) {
        let _ = writeln!(out, "First:      {}", format_ms(first));
        let _ = writeln!(out, "Last:       {}", format_ms(last));
    }
    out
}

pub(crate) fn render_refs(refs: &RefTable, prefix: &str) -> String {
    let mut out = String::new();
    for (name, id) in refs.iter().filter(|(name, _)| name.starts_with(prefix)) {
        let _ = writeln!(out, "{} {}", id, name);
    }
    out
}

pub(crate) fn render_event_line(event: &ReflogEntry) -> String {
    let author = if event.author_name.is_empty() {
        &event.author_email
    } else {
        &event.author_name
    };
    format!(
        "{}  {}  {:<12} {:<20} {}",
        format_event_date(event.timestamp_ms.div_euclid(1000), &event.timezone),
        short_id(&event.new_id),
        classify_message(&event.message),
        author,
        event.message
    )
}

/// Histogram entries sorted by count (descending), then key.
fn ranked(histogram: &std::collections::BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut entries: Vec<(&str, usize)> = histogram.iter().map(|(k, &v)| (k.as_str(), v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

pub(crate) fn render_stats(stats: &RepoStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Files:          {} ({} bytes)", stats.total_files, stats.total_bytes);
    let _ = writeln!(out, "Refs:           {}", stats.total_refs);
    let _ = writeln!(out, "  branches:     {}", stats.branches);
    let _ = writeln!(out, "  tags:         {}", stats.tags);
    let _ = writeln!(out, "  remotes:      {}", stats.remotes);
    let _ = writeln!(out, "Events:         {}", stats.events);
    if let Some(days) = stats.active_days {
        let _ = writeln!(out, "Active days:    {}", days);
    }
    if let Some(avg) = stats.avg_events_per_day {
        let _ = writeln!(out, "Events/day:     {:.2}", avg);
    }
    if let (Some(first), Some(last)) = (stats.first_activity_ts, stats.last_activity_ts) {
        let _ = writeln!(out, "First activity: {}", format_ms(first));
        let _ = writeln!(out, "Last activity:  {}", format_ms(last));
    }

    if !stats.event_types.is_empty() {
        let _ = writeln!(out, "\nActions:");
        for (action, count) in ranked(&stats.event_types) {
            let _ = writeln!(out, "  {:>6}  {}", count, action);
        }
    }
    if !stats.authors.is_empty() {
        let _ = writeln!(out, "\nAuthors:");
        for (author, count) in ranked(&stats.authors) {
            let _ = writeln!(out, "  {:>6}  {}", count, author);
        }
    }
    out
}
