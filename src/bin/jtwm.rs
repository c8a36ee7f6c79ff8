//! jtwm - JSON three-way merge CLI tool
//!
//! A command line tool for diffing, patching and merging JSON documents.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use json_three_way_merge::{
    apply, diff, from_json, to_json_pretty, ApplyMode, ConflictRule, Conflicts, DiffSummary, Detector,
    MergeOptions, MergeSession, PatchSet, Strategy, Value,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "jtwm", about = "JSON three-way merge CLI tool", version)]
struct Cli {
    /// Output location. Use '-' for stdout
    #[arg(short, long, global = true, default_value = "-")]
    output: String,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the patch that turns FROM into TO
    Diff {
        from: PathBuf,
        to: PathBuf,
        /// Print a summary of changed paths instead of the patch
        #[arg(long)]
        summary: bool,
    },
    /// Apply a JSON Patch file to a document
    Apply {
        doc: PathBuf,
        patch: PathBuf,
        /// Fail on the first operation that cannot be applied
        #[arg(long)]
        strict: bool,
    },
    /// Merge LEFT and RIGHT against their common ancestor BASE
    Merge {
        base: PathBuf,
        left: PathBuf,
        right: PathBuf,
        #[arg(long, value_enum)]
        rule: Option<RuleArg>,
        /// Resolve every conflict in favor of one side
        #[arg(long, value_enum)]
        prefer: Option<PreferArg>,
        /// YAML or JSON merge options
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Report which edits of LEFT and RIGHT conflict
    Conflicts {
        base: PathBuf,
        left: PathBuf,
        right: PathBuf,
        #[arg(long, value_enum, default_value = "overlap")]
        rule: RuleArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RuleArg {
    ExactPath,
    Overlap,
}

impl From<RuleArg> for ConflictRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::ExactPath => ConflictRule::ExactPath,
            RuleArg::Overlap => ConflictRule::Overlap,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PreferArg {
    Left,
    Right,
    Skip,
}

impl From<PreferArg> for Strategy {
    fn from(prefer: PreferArg) -> Self {
        match prefer {
            PreferArg::Left => Strategy::PreferLeft,
            PreferArg::Right => Strategy::PreferRight,
            PreferArg::Skip => Strategy::Skip,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    match cli.command {
        Command::Diff { from, to, summary } => {
            diff_files(&from, &to, summary, &mut output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Apply { doc, patch, strict } => {
            apply_file(&doc, &patch, strict, &mut output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Merge {
            base,
            left,
            right,
            rule,
            prefer,
            config,
        } => {
            let mut options = match config {
                Some(path) => MergeOptions::from_file(&path)?,
                None => MergeOptions::default(),
            };
            if let Some(rule) = rule {
                options = options.with_rule(rule.into());
            }
            if let Some(prefer) = prefer {
                options = options.with_strategy(prefer.into());
            }
            merge_files(&base, &left, &right, options, &mut output)
        }
        Command::Conflicts { base, left, right, rule } => {
            conflicts(&base, &left, &right, rule.into(), &mut output)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_document(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read file {:?}: {}", path, e))?;
    let value = from_json(&content).map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;
    Ok(value)
}

fn diff_files(
    from: &Path,
    to: &Path,
    summary: bool,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let patches = diff(&read_document(from)?, &read_document(to)?);

    if summary {
        let summary = DiffSummary::of(&patches);
        if summary.is_same() {
            writeln!(output, "Documents are identical")?;
        } else {
            writeln!(output, "{}", summary)?;
        }
    } else {
        writeln!(output, "{}", patches.to_json_pretty()?)?;
    }
    Ok(())
}

fn apply_file(
    doc: &Path,
    patch: &Path,
    strict: bool,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_document(doc)?;
    let content = fs::read_to_string(patch).map_err(|e| format!("Failed to read patch {:?}: {}", patch, e))?;
    let patches = PatchSet::from_json(&content).map_err(|e| format!("Failed to parse patch {:?}: {}", patch, e))?;

    let applied = apply(&value, &patches, ApplyMode::from(strict))?;
    for skipped in &applied.skipped {
        eprintln!("skipped: {}", skipped);
    }
    writeln!(output, "{}", to_json_pretty(&applied.value)?)?;
    Ok(())
}

fn merge_files(
    base: &Path,
    left: &Path,
    right: &Path,
    options: MergeOptions,
    output: &mut dyn Write,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    debug!(?options, "merging");
    let mut session = MergeSession::builder()
        .options(options)
        .build(read_document(base)?, read_document(left)?, read_document(right)?);
    for skipped in session.auto_skipped() {
        eprintln!("skipped: {}", skipped);
    }
    session.auto_resolve()?;

    writeln!(output, "{}", to_json_pretty(session.target())?)?;

    let pending = session.pending();
    if pending.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    let unresolved: Conflicts = pending
        .into_iter()
        .filter_map(|id| session.conflict(id).ok().cloned())
        .collect();
    eprintln!("{} unresolved conflict(s):", unresolved.len());
    eprintln!("{}", serde_json::to_string_pretty(&unresolved)?);
    Ok(ExitCode::FAILURE)
}

fn conflicts(
    base: &Path,
    left: &Path,
    right: &Path,
    rule: ConflictRule,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let base = read_document(base)?;
    let left = diff(&base, &read_document(left)?);
    let right = diff(&base, &read_document(right)?);

    let detection = Detector::new(rule).detect(&left, &right);
    writeln!(output, "{}", serde_json::to_string_pretty(&detection)?)?;
    Ok(())
}
