//! HTTP chat gateway for sportbot.
//!
//! Thin transport in front of the core router: one POST endpoint taking
//! an inbound message and returning the reply text.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use clap::Parser;
use log::info;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use sportbot_core::generate::MistralClient;
use sportbot_core::models::UserProfile;
use sportbot_core::progression::Progression;
use sportbot_core::{ChatRouter, Config, Database, seed};

fn main() {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "{err:?}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn try_main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Config::default_config_path);
    let config = Config::ensure_at(&config_path)?;

    let db = Database::open(&config.database).await?;
    seed::seed_if_empty(&db).await?;

    let generator = MistralClient::new(config.generation.clone())?;
    let progression = Progression::new(
        config.progression.xp_per_visit,
        config.progression.level_up_factor,
    );
    let chat_router = ChatRouter::new(
        db,
        generator,
        progression,
        Duration::from_secs(config.session.idle_ttl_secs),
        config.session.min_query_chars,
    );

    let state = AppState {
        chat: Arc::new(chat_router),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], cli.port));
    info!("Starting chat gateway on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, Parser)]
#[command(author, version, about = "HTTP chat gateway for sportbot")]
struct Cli {
    /// Override the config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

#[derive(Clone)]
struct AppState {
    chat: Arc<ChatRouter<MistralClient>>,
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "sportbot-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    user_id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    text: String,
}

#[derive(Debug, Serialize)]
struct ChatReply {
    reply: String,
}

async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<ChatReply> {
    let profile = UserProfile {
        user_id: request.user_id,
        username: request.username,
        first_name: request.first_name,
        last_name: request.last_name,
    };
    let reply = state.chat.handle(&profile, &request.text).await;
    Json(ChatReply { reply })
}
