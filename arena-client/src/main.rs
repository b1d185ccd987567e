mod client;
mod config;
mod output;
mod recommend;
mod types;

use clap::Parser;
use std::path::PathBuf;

use arena_core::DEFAULT_NUM_OPPONENTS;

use crate::client::ArenaClient;
use crate::types::EvalSessionInput;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "policy-arena", version, about = "Client for the Policy Arena evaluation backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Recommend opponents for the next evaluation round
    Opponents(OpponentsArgs),
    /// Show the current leaderboard
    Leaderboard(LeaderboardArgs),
    /// List registered dataset repo ids
    Datasets(DatasetsArgs),
    /// Submit an eval session from a JSON file
    Submit(SubmitArgs),
    /// Create a default config file at ~/.config/policy-arena/config.toml
    Init,
}

#[derive(Parser)]
struct OpponentsArgs {
    /// Environment to recommend opponents in
    #[arg(long)]
    environment: Option<String>,

    /// Number of opponents to recommend
    #[arg(long)]
    num: Option<usize>,

    /// Artifact treated as already selected for weighting, e.g. the policy
    /// under evaluation (repeatable). Never appears in the output.
    #[arg(long = "seed")]
    seeds: Vec<String>,

    /// Artifact to exclude from the pool (repeatable)
    #[arg(long = "exclude")]
    excluded: Vec<String>,

    /// Arena backend deployment URL
    #[arg(long)]
    arena_url: Option<String>,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Show pool sizes and per-pick candidate weights
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/policy-arena/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct LeaderboardArgs {
    /// Arena backend deployment URL
    #[arg(long)]
    arena_url: Option<String>,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/policy-arena/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct DatasetsArgs {
    /// Filter by task name
    #[arg(long)]
    task: Option<String>,

    /// Filter by source type(s), e.g. teleop rollout dagger
    #[arg(long = "source", num_args = 1..)]
    sources: Vec<String>,

    /// Arena backend deployment URL
    #[arg(long)]
    arena_url: Option<String>,

    /// Output full dataset records as JSON instead of repo ids
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/policy-arena/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct SubmitArgs {
    /// Session JSON file: {dataset_repo, policies, rounds, notes?}
    session_file: PathBuf,

    /// Override the session notes
    #[arg(long)]
    notes: Option<String>,

    /// Arena backend deployment URL
    #[arg(long)]
    arena_url: Option<String>,

    /// Path to config file (default: ~/.config/policy-arena/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Resolve the backend URL: CLI flag > config file.
fn resolve_arena_url(flag: Option<String>, config_flag: Option<PathBuf>) -> (String, config::ArenaConfig) {
    let config_path = config_flag.unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);
    let url = flag.or_else(|| cfg.arena_url.clone()).unwrap_or_else(|| {
        bail(format!(
            "No arena URL specified. Pass --arena-url or set it in {}",
            config_path.display()
        ));
    });
    (url, cfg)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Opponents(args) => run_opponents(args).await,
        Commands::Leaderboard(args) => run_leaderboard(args).await,
        Commands::Datasets(args) => run_datasets(args).await,
        Commands::Submit(args) => run_submit(args).await,
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your arena URL and defaults.");
        }
    }
}

async fn run_opponents(args: OpponentsArgs) {
    let (arena_url, cfg) = resolve_arena_url(args.arena_url.clone(), args.config.clone());

    let environment = args
        .environment
        .clone()
        .or(cfg.environment)
        .unwrap_or_else(|| bail("No environment specified. Pass --environment or set it in the config."));
    let num_opponents = args.num.or(cfg.num_opponents).unwrap_or(DEFAULT_NUM_OPPONENTS);

    let client = ArenaClient::new(arena_url);
    let opponents = recommend::recommend_opponents(
        &client,
        &environment,
        num_opponents,
        &args.seeds,
        &args.excluded,
        args.verbose,
    )
    .await
    .unwrap_or_else(|e| bail(e));

    if args.json {
        output::print_opponents_json(&opponents);
    } else {
        output::print_opponents_table(&opponents);
    }
}

async fn run_leaderboard(args: LeaderboardArgs) {
    let (arena_url, _) = resolve_arena_url(args.arena_url, args.config);

    let client = ArenaClient::new(arena_url);
    let entries = client.get_leaderboard().await.unwrap_or_else(|e| bail(e));

    if args.json {
        output::print_leaderboard_json(&entries);
    } else {
        output::print_leaderboard_table(&entries);
    }
}

async fn run_datasets(args: DatasetsArgs) {
    let (arena_url, _) = resolve_arena_url(args.arena_url, args.config);

    let client = ArenaClient::new(arena_url);
    let sources = if args.sources.is_empty() { None } else { Some(args.sources.as_slice()) };
    let datasets = client
        .list_datasets(args.task.as_deref(), sources)
        .await
        .unwrap_or_else(|e| bail(e));

    if args.json {
        output::print_datasets_json(&datasets);
    } else {
        output::print_dataset_repos(&datasets);
    }
}

async fn run_submit(args: SubmitArgs) {
    let (arena_url, _) = resolve_arena_url(args.arena_url, args.config);

    let content = std::fs::read_to_string(&args.session_file).unwrap_or_else(|e| {
        bail(format!("Failed to read session file {}: {e}", args.session_file.display()))
    });
    let mut session: EvalSessionInput = serde_json::from_str(&content).unwrap_or_else(|e| {
        bail(format!("Failed to parse session file {}: {e}", args.session_file.display()))
    });
    if args.notes.is_some() {
        session.notes = args.notes;
    }

    if session.policies.is_empty() {
        bail("Session file contains no policies");
    }
    if session.rounds.is_empty() {
        bail("Session file contains no rounds");
    }

    let client = ArenaClient::new(arena_url);
    let session_id = client
        .submit_eval_session(&session)
        .await
        .unwrap_or_else(|e| bail(e));

    println!("Submitted {} rounds for {} policies", session.rounds.len(), session.policies.len());
    println!("Session ID: {session_id}");
}
