use anyhow::Context;
use tokio::io::BufReader;

use movie_vault::{
    config::Config,
    db::{create_pool, run_migrations, PgStore},
    logging::init_logging,
    repl::Repl,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = Config::from_env()?;

    // The only fatal failure: without a connection there is nothing to serve
    let pool = create_pool(config.connect_options()?)
        .await
        .context("Failed to connect to the database")?;

    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    tracing::info!("Connected to the database");

    let mut repl = Repl::new(PgStore::new(pool.clone()), std::io::stdout());
    repl.run(BufReader::new(tokio::io::stdin())).await?;

    pool.close().await;
    Ok(())
}
