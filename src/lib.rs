pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod domain;
pub mod models;
pub mod services;

use clap::{CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;

pub async fn run(config: Config) -> anyhow::Result<()> {
    init_tracing(&config);
    config.validate()?;

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search(args)) => cli::cmd_search(&config, args).await,
        Some(Commands::Show { id }) => cli::cmd_show(&config, &id).await,
        Some(Commands::Ingredients) => cli::cmd_ingredients(&config).await,
        Some(Commands::Chat { message }) => cli::cmd_chat(&config, &message).await,
        Some(Commands::Browse) => cli::cmd_browse(&config).await,
        Some(Commands::Init) => {
            if Config::create_default_if_missing()? {
                println!("Created config.toml with default settings");
            } else {
                println!("config.toml already exists");
            }
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.observability.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match Config::locate() {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    info!(
        base_url = %config.backend.base_url,
        "Recetario v{} starting",
        env!("CARGO_PKG_VERSION")
    );
}
