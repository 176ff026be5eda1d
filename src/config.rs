use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use knockout_services::SimulationConfig;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Register the eight demo squads when the directory is empty.
    pub seed_demo_teams: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
    pub json: bool,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::builder(&run_mode)?.build()?.try_deserialize()
    }

    fn builder(run_mode: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = SimulationConfig::default();
        Ok(Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("database.url", "postgresql://localhost:5432/knockout_dev")?
            .set_default("database.max_connections", 10)?
            .set_default("storage.backend", "memory")?
            .set_default("storage.seed_demo_teams", true)?
            .set_default("simulation.goal_multiplier", defaults.goal_multiplier)?
            .set_default("simulation.max_minute", i64::from(defaults.max_minute))?
            .set_default("simulation.shootout_kicks", i64::from(defaults.shootout_kicks))?
            .set_default("simulation.kick_conversion", defaults.kick_conversion)?
            .set_default("simulation.max_shootout_goals", i64::from(defaults.max_shootout_goals))?
            .set_default("logging.filter", "knockout_rs=info,knockout_services=info,tower_http=debug")?
            .set_default("logging.json", false)?
            // Add in settings from configuration file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // KNOCKOUT__SERVER__PORT=8080 overrides server.port
            .add_source(Environment::with_prefix("KNOCKOUT").separator("__")))
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
