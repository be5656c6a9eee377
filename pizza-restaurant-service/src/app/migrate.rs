use pizza_restaurant_service::{establish_pool, run_migrations, Config};
use tracing::info;

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let pool = establish_pool(&config)?;
    run_migrations(&pool)?;
    info!("Database {} is up to date", config.database_url);
    Ok(())
}
