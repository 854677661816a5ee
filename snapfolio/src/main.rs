use std::process::ExitCode;

use clap::Parser;
use snapfolio::{Error, Snapfolio, SnapfolioConfig, SqliteRepositoryProvider};
use tracing_subscriber::EnvFilter;

/// Command line interface for snapfolio
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database connection string
    #[arg(long, env = "DATABASE_URL")]
    db_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(clap::Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Delete expired password reset tokens
    Cleanup,
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let mut config = SnapfolioConfig::from_env()?;
    if let Some(db_url) = cli.db_url {
        config.database_url = db_url;
    }

    match cli.command {
        Commands::Migrate => {
            tracing::info!(database_url = %config.database_url, "Running migrations");
            let snapfolio = Snapfolio::<SqliteRepositoryProvider>::connect(&config).await?;
            snapfolio.migrate().await?;
            tracing::info!("Migrations complete");
        }
        Commands::Cleanup => {
            let snapfolio = Snapfolio::<SqliteRepositoryProvider>::connect(&config).await?;
            let removed = snapfolio.cleanup_expired_password_resets().await?;
            println!("Removed {removed} expired password resets");
        }
        Commands::Version => {
            println!("snapfolio v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
