use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const DISCORD_TOKEN: &str = "DISCORD_TOKEN";
    pub const AI_API_KEY: &str = "AI_API_KEY";
    pub const AI_ENDPOINT_URL: &str = "AI_ENDPOINT_URL";
    pub const AI_MODEL: &str = "AI_MODEL";
    /// Explicit override for where goals.json and its backups live.
    pub const GOALS_DATA_DIR: &str = "GOALS_DATA_DIR";
    pub const COMMAND_PREFIX: &str = "COMMAND_PREFIX";
}

/// Default values
pub mod defaults {
    pub const DATA_DIR: &str = "data";
    pub const GOALS_FILE: &str = "goals.json";
    pub const PAGE_SIZE: usize = 3;
    /// Discord caps a single message at 2000 characters.
    pub const TRANSPORT_LIMIT: usize = 2000;
    pub const COMMAND_PREFIX: char = '!';
    pub const AI_ENDPOINT_URL: &str = "https://api.openai.com/v1/chat/completions";
    pub const AI_MODEL: &str = "gpt-4o-mini";
    pub const AI_TIMEOUT_SECS: u64 = 30;
    pub const AI_MAX_TOKENS: u32 = 1024;
    pub const AI_TEMPERATURE: f32 = 0.7;
}

/// Returns the absolute path to the goalbot-backend directory.
/// Uses CARGO_MANIFEST_DIR at compile time, so it resolves the same way
/// regardless of the working directory at runtime.
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Get the data directory, overridable via GOALS_DATA_DIR.
pub fn data_dir() -> PathBuf {
    match env::var(env_vars::GOALS_DATA_DIR) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => backend_dir().join(defaults::DATA_DIR),
    }
}

#[derive(Clone)]
pub struct Config {
    pub discord_token: Option<String>,
    pub command_prefix: char,
}

impl Config {
    pub fn from_env() -> Self {
        let command_prefix = env::var(env_vars::COMMAND_PREFIX)
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(defaults::COMMAND_PREFIX);

        Self {
            discord_token: env::var(env_vars::DISCORD_TOKEN).ok().filter(|t| !t.is_empty()),
            command_prefix,
        }
    }
}

/// Configuration for the goals store.
#[derive(Clone, Debug)]
pub struct GoalsConfig {
    /// Directory holding goals.json and its backups (default: ./data)
    pub data_dir: PathBuf,
    /// Objectives per page in `!list`
    pub page_size: usize,
    /// Hard cap on one outgoing chat message, in characters
    pub transport_limit: usize,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            data_dir: data_dir(),
            page_size: defaults::PAGE_SIZE,
            transport_limit: defaults::TRANSPORT_LIMIT,
        }
    }
}

impl GoalsConfig {
    /// Path of the persisted goals collection file.
    pub fn goals_file_path(&self) -> PathBuf {
        self.data_dir.join(defaults::GOALS_FILE)
    }
}

/// Configuration for the AI completion client.
#[derive(Clone, Debug)]
pub struct AiConfig {
    /// Full URL of an OpenAI-compatible chat completions endpoint.
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl AiConfig {
    pub fn from_env() -> Self {
        Self {
            endpoint: env::var(env_vars::AI_ENDPOINT_URL)
                .unwrap_or_else(|_| defaults::AI_ENDPOINT_URL.to_string()),
            api_key: env::var(env_vars::AI_API_KEY).ok().filter(|k| !k.trim().is_empty()),
            model: env::var(env_vars::AI_MODEL).unwrap_or_else(|_| defaults::AI_MODEL.to_string()),
            timeout_secs: defaults::AI_TIMEOUT_SECS,
        }
    }
}

/// Initialize the data directory. Called at startup before the store opens.
pub fn initialize_data_dir(config: &GoalsConfig) -> std::io::Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;
    log::info!("Goals data directory: {:?}", config.data_dir);
    Ok(())
}
