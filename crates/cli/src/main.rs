//! mergelens command-line review viewer.
//!
//! Fetches (or loads from a file) the analysis record for a pull request
//! and prints the ordered conflict list or an attributed diff pane, with
//! conflict highlighting.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Table};
use console::style;
use tracing_subscriber::EnvFilter;

use mergelens_core::analysis::{AnalysisApi, AnalysisClient};
use mergelens_core::conflict::ConflictLocationResolver;
use mergelens_core::config::AppConfig;
use mergelens_core::models::{AnalysisRecord, Side};
use mergelens_core::render::LineKind;
use mergelens_core::view::{Pane, ReviewView, ViewState};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Inspect a pull request's three-way diff and semantic conflicts.
#[derive(Parser, Debug)]
#[command(
    name = "mergelens",
    version,
    about = "View semantic conflicts overlaid on a pull request's three-way diff"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the detected conflicts in display order.
    Conflicts {
        #[command(flatten)]
        source: RecordSource,

        /// Emit the conflict list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print one diff pane with side attribution and highlighting.
    Diff {
        #[command(flatten)]
        source: RecordSource,

        /// Which pane to print.
        #[arg(long, value_enum, default_value = "merge")]
        pane: PaneArg,

        /// Highlight the conflict at this index (display order).
        #[arg(long)]
        conflict: Option<usize>,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./mergelens.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,
}

/// Where the analysis record comes from: the backend, or a JSON file.
#[derive(clap::Args, Debug)]
struct RecordSource {
    /// Repository owner.
    #[arg(long, required_unless_present = "input")]
    owner: Option<String>,

    /// Repository name.
    #[arg(long, required_unless_present = "input")]
    repo: Option<String>,

    /// Pull request number.
    #[arg(long, required_unless_present = "input")]
    pull: Option<u64>,

    /// Read the analysis record from a JSON file instead of the backend.
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PaneArg {
    A,
    B,
    Merge,
}

impl From<PaneArg> for Pane {
    fn from(value: PaneArg) -> Self {
        match value {
            PaneArg::A => Pane::BaseA,
            PaneArg::B => Pane::BaseB,
            PaneArg::Merge => Pane::Merge,
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => cmd_validate(&config_path(cli.config.as_ref())),
        Commands::Conflicts { source, json } => {
            let record = load_record(&source, cli.config.as_ref()).await?;
            cmd_conflicts(record, json)
        }
        Commands::Diff {
            source,
            pane,
            conflict,
        } => {
            let record = load_record(&source, cli.config.as_ref()).await?;
            cmd_diff(record, pane.into(), conflict)
        }
    }
}

// ---------------------------------------------------------------------------
// Config & record loading
// ---------------------------------------------------------------------------

fn config_path(explicit: Option<&PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path.clone();
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mergelens")
        .join("config.toml")
}

fn load_config(explicit: Option<&PathBuf>) -> Result<AppConfig> {
    let path = config_path(explicit);
    if !path.exists() && explicit.is_none() {
        // No config is fine for defaults; only an explicit path must exist.
        return Ok(AppConfig::default());
    }
    let mut config =
        AppConfig::load_from_file(&path).context("failed to load configuration file")?;
    config
        .resolve_env_vars()
        .context("failed to resolve environment variables")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn load_record(
    source: &RecordSource,
    config: Option<&PathBuf>,
) -> Result<Option<AnalysisRecord>> {
    if let Some(path) = &source.input {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let record: AnalysisRecord =
            serde_json::from_str(&contents).context("failed to parse analysis record JSON")?;
        return Ok(Some(record));
    }

    // clap enforces these via required_unless_present = "input".
    let owner = source.owner.as_deref().context("--owner is required")?;
    let repo = source.repo.as_deref().context("--repo is required")?;
    let pull = source.pull.context("--pull is required")?;

    let config = load_config(config)?;
    let client = AnalysisClient::new(&config.analysis.api_url, config.analysis.token.clone());
    match client.get_analysis_output(owner, repo, pull).await {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            // A failed or absent analysis degrades to the empty view.
            tracing::warn!(error = %e, "analysis fetch failed");
            Ok(None)
        }
    }
}

fn build_view(record: Option<AnalysisRecord>) -> Result<ReviewView> {
    match record {
        Some(record) => {
            ReviewView::from_record(record).context("failed to render diffs from analysis record")
        }
        None => Ok(ReviewView::empty()),
    }
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_conflicts(record: Option<AnalysisRecord>, json: bool) -> Result<()> {
    let view = build_view(record)?;

    match view.state() {
        ViewState::NotAnalyzed => {
            println!("No analysis run yet for this pull request.");
            return Ok(());
        }
        ViewState::NoConflicts => {
            println!("No conflicts found.");
            return Ok(());
        }
        ViewState::Ready => {}
    }

    if json {
        let entries: Vec<serde_json::Value> = view
            .conflicts()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let span = ConflictLocationResolver::resolve(c).ok();
                serde_json::json!({
                    "index": i,
                    "kind": c.kind,
                    "label": c.label,
                    "file": span.as_ref().map(|s| s.file.clone()),
                    "from_line": span.as_ref().map(|s| s.from_line),
                    "to_line": span.as_ref().map(|s| s.to_line),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if let Some((a, b)) = view.branch_names() {
        println!(
            "Conflicts between {} and {}:",
            style(a).cyan(),
            style(b).magenta()
        );
        println!();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Kind", "Location", "Lines", "Description"]);
    for (i, conflict) in view.conflicts().iter().enumerate() {
        let (location, lines) = match ConflictLocationResolver::resolve(conflict) {
            Ok(span) => (span.file, format!("{}-{}", span.from_line, span.to_line)),
            Err(_) => ("location unavailable".to_string(), "-".to_string()),
        };
        table.add_row(vec![
            i.to_string(),
            conflict.kind.clone().unwrap_or_default(),
            location,
            lines,
            conflict.label.clone().unwrap_or_default(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn cmd_diff(record: Option<AnalysisRecord>, pane: Pane, conflict: Option<usize>) -> Result<()> {
    let mut view = build_view(record)?;

    if view.state() == ViewState::NotAnalyzed {
        println!("No analysis run yet for this pull request.");
        return Ok(());
    }

    if let Some(index) = conflict {
        if let Err(e) = view.select_conflict(index) {
            eprintln!("conflict {index}: location unavailable ({e})");
        }
    }

    let diff = view.pane(pane);
    if diff.is_empty() {
        println!("(empty diff)");
        return Ok(());
    }

    for file in &diff.files {
        println!("{}", style(&file.path).bold().underlined());
        for line in &file.lines {
            let (marker, styled) = match line.kind {
                LineKind::HunkHeader => (' ', style(line.content.clone()).dim()),
                LineKind::Insertion => ('+', style(line.content.clone()).green()),
                LineKind::Deletion => ('-', style(line.content.clone()).red()),
                LineKind::Context => (' ', style(line.content.clone())),
            };
            // Left-attributed lines get a side marker; branch B keeps
            // default styling (only the left side is recorded).
            let side = match line.side {
                Some(Side::Left) => style("A").cyan().to_string(),
                Some(Side::Right) => style("B").magenta().to_string(),
                None => " ".to_string(),
            };
            let body = if line.highlighted {
                styled.reverse().to_string()
            } else {
                styled.to_string()
            };
            println!("{side}{marker}{body}");
        }
        println!();
    }
    Ok(())
}

fn cmd_init(output: &PathBuf) -> Result<()> {
    let default_config = r#"# mergelens configuration

[analysis]
# Base URL of the semantic-conflict analysis backend.
api_url = "http://localhost:4000"
# Uncomment if the backend requires a bearer token:
# token_env = "MERGELENS_TOKEN"

[log]
level = "info"
"#;

    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, default_config).context("failed to write config file")?;

    println!("Default configuration written to {}", output.display());
    println!();
    println!("Next steps:");
    println!("  1. Point analysis.api_url at your analysis backend");
    println!(
        "  2. Validate with: mergelens validate --config {}",
        output.display()
    );
    Ok(())
}

fn cmd_validate(config_path: &PathBuf) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let mut config =
        AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    let _ = config.resolve_env_vars();
    println!("  [OK] Environment variable references processed");

    match config.validate() {
        Ok(()) => println!("  [OK] All required fields are valid"),
        Err(e) => {
            println!("  [FAIL] Validation error: {}", e);
            anyhow::bail!("configuration validation failed");
        }
    }

    println!();
    println!("Configuration summary:");
    println!("  Analysis API : {}", config.analysis.api_url);
    println!(
        "  Bearer token : {}",
        if config.analysis.token.is_some() {
            "set"
        } else {
            "not set"
        }
    );
    println!("  Log level    : {}", config.log.level);
    println!();
    println!("Configuration is valid.");
    Ok(())
}
