//! tokengate - demo gateway
//!
//! Serves the token issuance routes plus a few demo endpoints, all behind
//! the authorization middleware:
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌──────────────┐
//! │  Client  │───▶│  Authorizer  │───▶│  Handlers    │
//! │          │    │ (path policy)│    │ /auth, /ws.. │
//! └──────────┘    └──────┬───────┘    └──────────────┘
//!                        │
//!                 ┌──────▼───────┐
//!                 │ Credential   │
//!                 │ store        │
//!                 └──────────────┘
//! ```

use anyhow::Context;

use tokengate::config::AppConfig;
use tokengate::gateway::{self, state::AppState};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config =
        AppConfig::load(&env).with_context(|| format!("Failed to load config for env {}", env))?;
    let _log_guard = tokengate::logging::init_logging(&app_config);

    tracing::info!("Starting tokengate in {} mode", env);

    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }

    let state = AppState::from_config(&app_config.auth)
        .context("Failed to initialize credential store")?;

    tracing::info!(
        master_paths = ?app_config.auth.effective_master_paths(),
        access_paths = ?app_config.auth.access_token_paths,
        "Path policy loaded"
    );

    let app = gateway::build_router(
        &state,
        gateway::demo_routes(),
        gateway::demo_ws_routes(state.clone()),
    );
    gateway::run_server(&app_config.gateway, app).await
}
