use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod app;

#[derive(Parser)]
#[command(version, about = "Restaurants, pizzas and what restaurants charge for them")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Insert sample restaurants, pizzas and prices
    Seed {
        /// Remove existing rows first
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Serve => app::serve::main().await,
        Commands::Migrate => app::migrate::main(),
        Commands::Seed { reset } => app::seed::main(*reset),
    }
}
