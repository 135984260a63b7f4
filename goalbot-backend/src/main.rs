use dotenv::dotenv;
use std::sync::Arc;

mod ai;
mod commands;
mod config;
mod error;
mod formatter;
mod goals;
mod integrations;
mod models;

use ai::AiClient;
use commands::CommandDispatcher;
use config::{AiConfig, Config, GoalsConfig};
use goals::GoalStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let goals_config = GoalsConfig::default();
    let ai_config = AiConfig::from_env();

    if let Err(e) = config::initialize_data_dir(&goals_config) {
        log::error!("Failed to initialize data directory: {}", e);
        std::process::exit(1);
    }

    // A corrupt goals file is fatal on purpose: recovering automatically
    // would silently discard team data.
    let store = match GoalStore::open(&goals_config) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("Failed to open goal store: {}", e);
            std::process::exit(1);
        }
    };

    if ai_config.api_key.is_none() {
        log::warn!(
            "[AI] {} not set; SMART rewriting will only work if the endpoint accepts unauthenticated requests",
            config::env_vars::AI_API_KEY
        );
    }
    let rewriter = match AiClient::new(&ai_config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            log::error!("Failed to build AI client: {}", e);
            std::process::exit(1);
        }
    };

    let dispatcher = Arc::new(CommandDispatcher::new(store, rewriter, &goals_config));

    let Some(token) = config.discord_token else {
        log::error!(
            "{} not found in environment variables",
            config::env_vars::DISCORD_TOKEN
        );
        std::process::exit(1);
    };

    log::info!("Starting goalbot (prefix '{}')", config.command_prefix);
    if let Err(e) = integrations::discord::run(&token, dispatcher, config.command_prefix).await {
        log::error!("Discord client error: {}", e);
        std::process::exit(1);
    }
}
