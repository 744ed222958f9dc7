use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use clap::{Parser, ValueEnum};
use std::fs;
use tracing::{info, warn};

/// Default port of the API server
pub const DEFAULT_PORT: u16 = 3000;

/// Output format of the server logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Human,
    /// One JSON object per event
    Json,
}

/// Configuration for the Feedboard server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address the HTTP listener binds to
    pub bind_address: String,
    /// Port the HTTP listener binds to
    pub port: u16,
    /// Format of log output
    pub log_format: LogFormat,
    /// Directory for daily-rolling log files; stdout only when unset
    pub log_dir: Option<PathBuf>,
    /// Origins allowed by CORS; any origin when empty
    pub cors_origins: Vec<String>,
    /// URL the CLI uses to reach the server
    pub server_url: String,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub bind_address: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub log_format: Option<LogFormat>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub cors_origins: Option<Vec<String>>,
    /// Only read from the config file; the CLI has its own flag for it
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug, Default)]
#[clap(name = "feedboard", about = "Multi-tenant feedback board server")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to bind to
    #[clap(long, env = "FEEDBOARD_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Port to listen on
    #[clap(long, env = "FEEDBOARD_PORT")]
    pub port: Option<u16>,

    /// Log output format
    #[clap(long, value_enum, env = "FEEDBOARD_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Directory for rolling log files
    #[clap(long, env = "FEEDBOARD_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Comma-separated list of allowed CORS origins
    #[clap(long, env = "FEEDBOARD_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// Debug mode
    #[clap(long, env = "FEEDBOARD_DEBUG", default_value_t = false)]
    pub debug: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            bind_address: update.bind_address.unwrap_or(self.bind_address),
            port: update.port.unwrap_or(self.port),
            log_format: update.log_format.unwrap_or(self.log_format),
            log_dir: update.log_dir.or(self.log_dir),
            cors_origins: update.cors_origins.unwrap_or(self.cors_origins),
            server_url: update.server_url.unwrap_or(self.server_url),
        }
    }

    /// The `address:port` string the listener binds to
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Returns the base (default) configuration
///
/// With a config directory the SQLite file lives next to `config.toml`,
/// otherwise in the working directory.
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let database_url = config_path.map_or("feedboard.db".to_string(), |path| {
        path.join("feedboard.db").to_string_lossy().to_string()
    });

    Config {
        database_url,
        bind_address: "127.0.0.1".to_string(),
        port: DEFAULT_PORT,
        log_format: LogFormat::Human,
        log_dir: None,
        cors_origins: Vec::new(),
        server_url: format!("http://localhost:{}", DEFAULT_PORT),
    }
}

/// Loads configuration from a TOML file
///
/// A missing file is not an error and yields an empty update.
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        bind_address: args.bind_address,
        port: args.port,
        log_format: args.log_format,
        log_dir: args.log_dir,
        cors_origins: args.cors_origins,
        server_url: None,
    }
}

/// The XDG config directory, if it can be determined and exists
pub fn get_config_dir_path() -> Option<PathBuf> {
    let Some(proj_dirs) = ProjectDirs::from("com", "feedboard", "feedboard") else {
        warn!("Could not determine XDG config directory, skipping config file");
        return None;
    };

    let path = proj_dirs.config_dir().to_path_buf();
    if !path.exists() {
        info!("Config path not found at {:?}, using defaults", path);
        return None;
    }
    Some(path)
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: CliArgs) -> Config {
    let config_dir = get_config_dir_path();

    let base = base_config(config_dir.clone());
    let file = config_from_file(config_dir.map(|dir| dir.join("config.toml"))).unwrap_or_default();

    let config = base.apply_update(file).apply_update(config_from_args(args));

    info!(
        "Final configuration: database_url={}, listen={}, log_format={:?}, cors_origins={:?}",
        config.database_url,
        config.listen_address(),
        config.log_format,
        config.cors_origins
    );

    config
}
