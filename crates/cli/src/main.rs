mod bot_commands;
mod config_commands;
mod queue_commands;
mod settings;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use settings::Settings;

#[derive(Parser)]
#[command(name = "study-together", about = "Study Together - Discord study partner matching bot", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Deployment mode; selects `<mode>_config.*` and `<mode>.env`.
    #[arg(long, global = true, env = "STUDY_TOGETHER_MODE")]
    mode: Option<String>,

    /// Explicit config file (overrides discovery).
    #[arg(long, global = true, env = "STUDY_TOGETHER_CONFIG")]
    config: Option<PathBuf>,

    /// Discord bot token (overrides config and env files).
    #[arg(short = 't', long, global = true, env = "DISCORD_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and start matching (default when no subcommand is given).
    Run,
    /// Configuration inspection.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
    /// Inspect or reset queue state in Redis.
    Queues {
        #[command(subcommand)]
        action: queue_commands::QueueAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The mode comes from the flag or the process environment, never from
    // an env file, so it can pick which env file is loaded.
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "study-together starting");

    let mut settings = Settings {
        mode: cli.mode,
        config: cli.config,
        token: cli.token,
    };
    settings.load_env_file()?;
    if settings.config.is_none() {
        settings.config = std::env::var_os("STUDY_TOGETHER_CONFIG").map(PathBuf::from);
    }

    match cli.command {
        None | Some(Commands::Run) => bot_commands::run_bot(&settings).await,
        Some(Commands::Config { action }) => config_commands::handle_config(action, &settings),
        Some(Commands::Queues { action }) => queue_commands::handle_queues(action, &settings).await,
    }
}
