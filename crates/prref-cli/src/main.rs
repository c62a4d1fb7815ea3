#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use prref_core::output::{format_json, format_text, Annotation, GithubOutputWriter};
use prref_core::refs::classify;
use prref_core::source::{PullRequestEvent, PullRequestText, SourceConfig};
use prref_core::{
    Error, ErrorKind, ResolvedRefSet, TargetRegistry, TextSource, ValidationOutcome,
};
use std::borrow::Cow;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "prref",
    version,
    about = "Resolve git references declared in pull request descriptions"
)]
struct Cli {
    /// Emit log lines as JSON on stderr
    #[arg(long, env = "PRREF_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Extract, validate, and publish references for every target
    Resolve(ResolveArgs),
    /// Classify candidate references without publishing anything
    Classify(ClassifyArgs),
    /// Show the effective target registry
    Targets(TargetsArgs),
}

#[derive(clap::Args)]
struct ResolveArgs {
    /// Text to scan instead of the pull request description
    #[arg(long, env = "PRREF_TEXT")]
    text: Option<String>,

    /// File holding the text to scan
    #[arg(long, env = "PRREF_TEXT_FILE")]
    text_file: Option<String>,

    #[command(flatten)]
    targets: TargetsArgs,

    /// GitHub token for API access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Repository in owner/repo form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Pull request number (default: from the event payload or GITHUB_REF)
    #[arg(long, env = "PRREF_PR_NUMBER")]
    pr_number: Option<String>,

    /// Git ref of the triggering event (refs/pull/<n>/merge)
    #[arg(long, env = "GITHUB_REF")]
    github_ref: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Read the description from the event payload instead of the API
    #[arg(long, env = "PRREF_NO_API")]
    no_api: bool,

    /// Output format: gha, json, text (default: auto-detect)
    #[arg(long, env = "PRREF_OUTPUT_FORMAT")]
    output_format: Option<String>,
}

#[derive(clap::Args)]
struct ClassifyArgs {
    /// Candidate references
    #[arg(required = true)]
    candidates: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct TargetsArgs {
    /// YAML file defining targets (default: built-in core, solana, sdk)
    #[arg(long, env = "PRREF_TARGETS_FILE")]
    targets_file: Option<String>,
}

/// Output format for the CLI
#[derive(Clone, Copy)]
enum OutputFormat {
    /// GitHub Actions: write to $GITHUB_OUTPUT + summary to stdout
    Gha,
    /// JSON object to stdout
    Json,
    /// Human-readable text to stdout
    Text,
}

impl OutputFormat {
    fn detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("gha") => OutputFormat::Gha,
            Some("json") => OutputFormat::Json,
            Some("text") => OutputFormat::Text,
            _ => {
                if std::env::var("GITHUB_ACTIONS").is_ok() {
                    OutputFormat::Gha
                } else {
                    OutputFormat::Text
                }
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    let code = match cli.command {
        Commands::Resolve(args) => run_resolve(args),
        Commands::Classify(args) => run_classify(args),
        Commands::Targets(args) => run_targets(args),
    };
    std::process::exit(code);
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }
}

/// Filter empty string from Option (env vars may produce "" for empty values)
fn clean_opt(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.trim().is_empty())
}

fn load_registry(args: &TargetsArgs) -> prref_core::Result<TargetRegistry> {
    match clean_opt(&args.targets_file) {
        Some(path) => TargetRegistry::from_file(path),
        None => Ok(TargetRegistry::builtin()),
    }
}

fn run_resolve(args: ResolveArgs) -> i32 {
    let output_format = OutputFormat::detect(clean_opt(&args.output_format));

    let result = resolve_refs(&args, output_format)
        .and_then(|set| write_outputs(output_format, &set));
    match result {
        Ok(()) => 0,
        Err(e) => {
            report_failure(output_format, &e);
            1
        }
    }
}

fn resolve_refs(args: &ResolveArgs, format: OutputFormat) -> prref_core::Result<ResolvedRefSet> {
    let registry = load_registry(&args.targets)?;

    let pr_number = clean_opt(&args.pr_number)
        .map(|n| {
            n.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("Invalid pull request number: {}", n))
            })
        })
        .transpose()?;

    // The event payload is only needed when no text was given directly
    let explicit = clean_opt(&args.text).is_some() || clean_opt(&args.text_file).is_some();
    let event = if explicit {
        None
    } else {
        PullRequestEvent::from_env()?
    };

    let config = SourceConfig {
        text: clean_opt(&args.text).map(Cow::Borrowed),
        text_file: clean_opt(&args.text_file).map(PathBuf::from),
        repository: clean_opt(&args.repository).map(Cow::Borrowed),
        pr_number,
        github_ref: clean_opt(&args.github_ref).map(Cow::Borrowed),
        event,
        api_url: clean_opt(&args.api_url).map(Cow::Borrowed),
        token: clean_opt(&args.token).map(Cow::Borrowed),
        no_api: args.no_api,
    };

    let source = PullRequestText::select(config)?;
    tracing::info!(source = %source.describe(), "reading pull request text");
    if matches!(source, PullRequestText::NotAPullRequest) && matches!(format, OutputFormat::Gha) {
        println!(
            "{}",
            Annotation::notice("not a pull request, using default references")
        );
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(format!("failed to create runtime: {e}")))?;
    let text = rt.block_on(source.fetch_text())?;

    prref_core::resolve(&text, &registry)
}

fn write_outputs(format: OutputFormat, set: &ResolvedRefSet) -> prref_core::Result<()> {
    match format {
        OutputFormat::Gha => write_gha_output(set)?,
        OutputFormat::Json => write_json_output(set),
        OutputFormat::Text => write_text_output(set),
    }
    Ok(())
}

/// Write `key=value` outputs to $GITHUB_OUTPUT plus a summary on stdout.
/// Unpublished outputs fail the run.
fn write_gha_output(set: &ResolvedRefSet) -> prref_core::Result<()> {
    let Some(writer) = GithubOutputWriter::from_env() else {
        tracing::warn!("GITHUB_OUTPUT not set, falling back to stdout");
        println!(
            "{}",
            Annotation::warning("GITHUB_OUTPUT not set, references printed to stdout only")
        );
        write_json_output(set);
        return Ok(());
    };

    writer.write_refs(set).map_err(|e| {
        tracing::error!(path = %writer.path().display(), error = %e, "cannot write GITHUB_OUTPUT");
        e
    })?;

    write_text_output(set);
    Ok(())
}

fn write_json_output(set: &ResolvedRefSet) {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let _ = writeln!(lock, "{}", format_json(set));
}

fn write_text_output(set: &ResolvedRefSet) {
    let stdout = std::io::stdout();
    let mut w = stdout.lock();
    let _ = writeln!(w, "Resolved References");
    let _ = writeln!(w, "===================");
    let _ = write!(w, "{}", format_text(set));
}

/// One failure message per run, naming the target when there is one
fn report_failure(format: OutputFormat, err: &Error) {
    tracing::error!(kind = ?err.kind(), target_name = err.target(), "{}", err);

    match format {
        OutputFormat::Gha => {
            let title = match (err.target(), err.kind()) {
                (Some(target), _) => format!("Invalid reference for {target}"),
                (None, ErrorKind::Io) => "Cannot write GITHUB_OUTPUT".to_string(),
                (None, _) => "Reference resolution failed".to_string(),
            };
            let msg = err.to_string();
            println!("{}", Annotation::error(&msg).with_title(&title));
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "error": {
                    "kind": format!("{:?}", err.kind()),
                    "target": err.target(),
                    "message": err.to_string(),
                }
            });
            println!("{output}");
        }
        OutputFormat::Text => eprintln!("Error: {err}"),
    }
}

fn run_classify(args: ClassifyArgs) -> i32 {
    let mut rejected = false;
    let mut results = Vec::with_capacity(args.candidates.len());

    for candidate in &args.candidates {
        let outcome = classify(candidate);
        rejected |= !outcome.is_accepted();
        results.push((candidate.as_str(), outcome));
    }

    let stdout = std::io::stdout();
    let mut w = stdout.lock();

    if args.json {
        let values: Vec<serde_json::Value> = results
            .iter()
            .map(|(candidate, outcome)| match outcome {
                ValidationOutcome::Accepted { kind, .. } => serde_json::json!({
                    "candidate": candidate,
                    "accepted": true,
                    "kind": kind.as_str(),
                }),
                ValidationOutcome::Rejected(reason) => serde_json::json!({
                    "candidate": candidate,
                    "accepted": false,
                    "reason": reason.as_str(),
                }),
            })
            .collect();
        let _ = writeln!(w, "{}", serde_json::Value::Array(values));
    } else {
        for (candidate, outcome) in &results {
            let _ = match outcome {
                ValidationOutcome::Accepted { kind, .. } => {
                    writeln!(w, "{candidate:?}\t{}", kind.as_str())
                }
                ValidationOutcome::Rejected(reason) => {
                    writeln!(w, "{candidate:?}\trejected: {} ({reason})", reason.as_str())
                }
            };
        }
    }

    if rejected {
        1
    } else {
        0
    }
}

fn run_targets(args: TargetsArgs) -> i32 {
    let registry = match load_registry(&args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    let stdout = std::io::stdout();
    let mut w = stdout.lock();
    for spec in &registry {
        let _ = writeln!(
            w,
            "{}\toutput={}\tdefault={}\tpattern={}",
            spec.name(),
            spec.output_key(),
            spec.default_ref(),
            spec.pattern().as_str()
        );
    }
    0
}
