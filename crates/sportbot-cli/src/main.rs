//! sportbot CLI - city sports assistant

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sportbot_core::generate::MistralClient;
use sportbot_core::models::UserProfile;
use sportbot_core::progression::Progression;
use sportbot_core::{ChatRouter, Config, Database, seed};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Parser)]
#[command(
    name = "sportbot",
    author,
    version,
    about = "City sports assistant",
    propagate_version = true
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Chat with the assistant from the terminal
    Chat {
        /// User id to chat as
        #[arg(long, default_value_t = 1)]
        user_id: i64,

        /// Display name reported to the assistant
        #[arg(long)]
        name: Option<String>,
    },

    /// Seed demo facilities and events
    Seed,

    /// Show database statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    // Load config
    let config_path = cli.config.unwrap_or_else(Config::default_config_path);
    let config = Config::ensure_at(&config_path)?;

    // Open database
    let db = Database::open(&config.database).await?;

    match cli.command {
        Command::Chat { user_id, name } => cmd_chat(db, &config, user_id, name).await,
        Command::Seed => cmd_seed(&db).await,
        Command::Stats => cmd_stats(&db).await,
    }
}

async fn cmd_chat(db: Database, config: &Config, user_id: i64, name: Option<String>) -> Result<()> {
    seed::seed_if_empty(&db).await?;

    let generator = MistralClient::new(config.generation.clone())?;
    let progression = Progression::new(
        config.progression.xp_per_visit,
        config.progression.level_up_factor,
    );
    let router = ChatRouter::new(
        db,
        generator,
        progression,
        Duration::from_secs(config.session.idle_ttl_secs),
        config.session.min_query_chars,
    );

    let profile = UserProfile {
        user_id,
        username: None,
        first_name: name,
        last_name: None,
    };

    println!("sportbot: напишите сообщение или команду (/help). Ctrl-D для выхода.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        let reply = router.handle(&profile, message).await;
        println!("{reply}\n");
    }
    Ok(())
}

async fn cmd_seed(db: &Database) -> Result<()> {
    if seed::seed_if_empty(db).await? {
        println!(
            "Seeded {} facilities and {} events",
            db.count_facilities().await?,
            db.count_events().await?
        );
    } else {
        println!("Facilities already present, nothing to do");
    }
    Ok(())
}

async fn cmd_stats(db: &Database) -> Result<()> {
    println!("Database statistics:");
    println!("  Users:        {}", db.count_users().await?);
    println!("  Facilities:   {}", db.count_facilities().await?);
    println!("  Visits:       {}", db.count_visits().await?);
    println!("  Achievements: {}", db.count_achievements().await?);
    println!("  Events:       {}", db.count_events().await?);
    Ok(())
}
