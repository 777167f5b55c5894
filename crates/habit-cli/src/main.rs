mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, habit::HabitSubcommand, strategy::StrategySubcommand,
    workspace::WorkspaceSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "habits",
    about = "Track recurring habits and their daily and weekly progress",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .habits/)
    #[arg(long, global = true, env = "HABITS_ROOT")]
    root: Option<PathBuf>,

    /// Owner identity every command acts on behalf of
    #[arg(long, global = true, env = "HABITS_OWNER")]
    owner: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log at info level
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file and database
    Init,

    /// Manage workspaces
    Workspace {
        #[command(subcommand)]
        subcommand: WorkspaceSubcommand,
    },

    /// Manage strategies inside a workspace
    Strategy {
        #[command(subcommand)]
        subcommand: StrategySubcommand,
    },

    /// Manage habits and record check-ins
    Habit {
        #[command(subcommand)]
        subcommand: HabitSubcommand,
    },

    /// Validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let owner = cli.owner.as_deref();

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Workspace { subcommand } => cmd::workspace::run(&root, owner, subcommand, cli.json),
        Commands::Strategy { subcommand } => cmd::strategy::run(&root, owner, subcommand, cli.json),
        Commands::Habit { subcommand } => cmd::habit::run(&root, owner, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
