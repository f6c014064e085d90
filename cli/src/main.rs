mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use cs3split_core::context::{AppConfig, default_log_dir};
use cs3split_types::BattleTag;

#[derive(Parser)]
#[command(version, about = "Autosplitter for Trails of Cold Steel III")]
struct Cli {
    /// Also write logs to a daily rolled file in DIR (default data directory
    /// when DIR is omitted). Falls back to CS3SPLIT_LOG_DIR.
    #[arg(long, global = true, value_name = "DIR", num_args = 0..=1)]
    log_dir: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tail the game's console log and time the run
    Run {
        /// Console log to tail (defaults to log_path from the config)
        #[arg(short, long)]
        log: Option<PathBuf>,
        #[arg(long)]
        tick_ms: Option<u64>,
        #[arg(long)]
        segments: Option<usize>,
    },
    /// Play a recorded JSON-lines script and print the final timer state
    Replay {
        #[arg(short, long)]
        script: PathBuf,
        #[arg(long)]
        segments: Option<usize>,
    },
    /// List battles and whether they split
    Battles,
    Enable {
        #[arg(required = true)]
        tags: Vec<BattleTag>,
    },
    Disable {
        #[arg(required = true)]
        tags: Vec<BattleTag>,
    },
    SkipAnimations {
        state: Toggle,
    },
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();

    let log_dir = match cli.log_dir {
        Some(Some(dir)) => Some(dir),
        Some(None) => default_log_dir(),
        None => std::env::var_os("CS3SPLIT_LOG_DIR").map(PathBuf::from),
    };
    let _log_guard = logging::init_logging(log_dir.as_deref());

    let mut config = AppConfig::load();

    match cli.command {
        Commands::Run {
            log,
            tick_ms,
            segments,
        } => commands::run(&config, log, tick_ms, segments).await,
        Commands::Replay { script, segments } => commands::replay(&config, &script, segments),
        Commands::Battles => commands::list_battles(&config),
        Commands::Enable { tags } => commands::set_battles(&mut config, &tags, true),
        Commands::Disable { tags } => commands::set_battles(&mut config, &tags, false),
        Commands::SkipAnimations { state } => {
            commands::set_skip_animations(&mut config, matches!(state, Toggle::On))
        }
        Commands::Config => commands::show_config(&config),
    }
}
