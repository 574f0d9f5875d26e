mod logging;
mod replay;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use homebase::{
    conditions::{
        linear_backward_table, linear_forward_table, rotation_table, triangle_table,
        ConditionSet, ShufflePolicy, TriangleVariant,
    },
    config::DEFAULT_CONFIG_PATH,
    recording::TrackedPose,
    scene::SceneState,
    tasks::TaskKind,
    HostFrame, Session, SessionConfig, SessionStatus,
};
use logging::Logger;
use rand::{rngs::StdRng, SeedableRng as _};

#[derive(Debug, Parser)]
#[command(name = "homebase")]
#[command(about = "Self-motion perception experiment runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a controller script through a full session.
    Run(RunArgs),
    /// Print the shuffled condition table of a task as JSON.
    Conditions(ConditionsArgs),
    /// Load and validate a session config.
    CheckConfig(CheckConfigArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    script: PathBuf,
    /// Start this task directly instead of going through the menu.
    #[arg(long)]
    task: Option<TaskKind>,
    #[arg(long = "tick-ms", default_value_t = 11)]
    tick_ms: u64,
    #[arg(long = "output-dir")]
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ConditionsArgs {
    #[arg(long)]
    task: TaskKind,
    #[arg(long)]
    seed: u64,
    #[arg(long, default_value = "legacy-swap")]
    shuffle: String,
    #[arg(long, default_value = "standard")]
    variant: String,
}

#[derive(Debug, Args)]
struct CheckConfigArgs {
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_shuffle(raw: &str) -> Result<ShufflePolicy> {
    match raw {
        "legacy-swap" => Ok(ShufflePolicy::LegacySwap),
        "uniform" => Ok(ShufflePolicy::Uniform),
        _ => Err(anyhow::anyhow!(
            "Invalid shuffle `{raw}` (use legacy-swap|uniform)"
        )),
    }
}

fn parse_variant(raw: &str) -> Result<TriangleVariant> {
    match raw {
        "standard" => Ok(TriangleVariant::Standard),
        "extended" => Ok(TriangleVariant::Extended),
        _ => Err(anyhow::anyhow!(
            "Invalid variant `{raw}` (use standard|extended)"
        )),
    }
}

/// An explicit path must exist; the default path is optional.
fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                SessionConfig::from_path(default)
                    .with_context(|| format!("loading {}", default.display()))
            } else {
                log::info!("no {DEFAULT_CONFIG_PATH}, using defaults");
                Ok(SessionConfig::default())
            }
        }
    }
}

fn run_session(args: RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    let script = replay::load_script(&args.script)?;
    let frames = replay::frames(&script, args.tick_ms);

    let started_at_ms = chrono::Utc::now().timestamp_millis();
    let mut session = Session::new(config, SceneState::default(), started_at_ms)
        .context("starting session")?;
    if let Some(kind) = args.task {
        session.start_task(kind);
    }

    let mut ticks = 0usize;
    for (now_ms, controls) in frames {
        ticks += 1;
        let frame = HostFrame {
            now_ms,
            controls,
            head: TrackedPose::from(session.observer()),
        };
        if session.tick(frame) == SessionStatus::Terminated {
            break;
        }
    }
    session.flush();

    log::info!(
        "replayed {ticks} ticks, session {:?}, last task {}",
        session.status(),
        session
            .active_kind()
            .map_or_else(|| "none".to_owned(), |kind| kind.to_string())
    );
    Ok(())
}

fn print_conditions(args: ConditionsArgs) -> Result<()> {
    let policy = parse_shuffle(&args.shuffle)?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let json = match args.task {
        TaskKind::LinearForward => {
            let set = ConditionSet::shuffled(linear_forward_table(), policy, &mut rng);
            serde_json::to_string_pretty(set.as_slice())?
        }
        TaskKind::LinearBackward => {
            let set = ConditionSet::shuffled(linear_backward_table(), policy, &mut rng);
            serde_json::to_string_pretty(set.as_slice())?
        }
        TaskKind::Rotation => {
            let set = ConditionSet::shuffled(rotation_table(), policy, &mut rng);
            serde_json::to_string_pretty(set.as_slice())?
        }
        TaskKind::TriangleCompletion => {
            let variant = parse_variant(&args.variant)?;
            let set = ConditionSet::shuffled(triangle_table(variant), policy, &mut rng);
            serde_json::to_string_pretty(set.as_slice())?
        }
    };
    println!("{json}");
    Ok(())
}

fn check_config(args: CheckConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    println!("{config:#?}");
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    Logger::from_env()?.install()?;

    match cli.command {
        Commands::Run(args) => run_session(args),
        Commands::Conditions(args) => print_conditions(args),
        Commands::CheckConfig(args) => check_config(args),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}
