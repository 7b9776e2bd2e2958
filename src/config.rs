use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Full PostgreSQL connection URL, takes precedence over the parts below
    #[serde(default)]
    pub database_url: Option<String>,

    /// Database server host
    #[serde(default = "default_db_host")]
    pub db_host: String,

    /// Database server port
    #[serde(default = "default_db_port")]
    pub db_port: u16,

    /// Database name
    #[serde(default = "default_db_name")]
    pub db_name: String,

    /// Database user
    #[serde(default = "default_db_user")]
    pub db_user: String,

    /// Database password
    #[serde(default = "default_db_password")]
    pub db_password: String,

    /// Create the schema on startup if it is missing
    #[serde(default)]
    pub run_migrations: bool,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "movievault".to_string()
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_password() -> String {
    "postgres".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Connection options for the configured database
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        match &self.database_url {
            Some(url) => url
                .parse::<PgConnectOptions>()
                .map_err(|e| anyhow::anyhow!("Invalid DATABASE_URL: {}", e)),
            None => Ok(PgConnectOptions::new()
                .host(&self.db_host)
                .port(self.db_port)
                .database(&self.db_name)
                .username(&self.db_user)
                .password(&self.db_password)),
        }
    }
}
