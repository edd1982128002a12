use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use chanbot_core::platforms::TwitchHelixClient;
use chanbot_core::repositories::PostgresChannelConfigRepository;
use chanbot_core::tasks::spawn_eviction_task;
use chanbot_core::templates::TemplateResolver;
use chanbot_core::{ChannelRegistry, ChatService, Database, EngineConfig};

mod simulate;
mod transport;

use transport::StdoutTransport;

#[derive(Parser, Debug, Clone)]
#[command(name = "chanbot")]
#[command(author, version, about = "ChanBot - per-channel commands, events and timers for Twitch chat")]
struct Args {
    /// Postgres connection URL.
    #[arg(long, env = "DATABASE_URL", default_value = "postgres://chanbot@localhost:5432/chanbot")]
    database_url: String,

    /// Twitch application client id.
    #[arg(long, env = "TWITCH_CLIENT_ID")]
    client_id: String,

    /// Helix user token (needs moderator:read:followers, channel:read:subscriptions).
    #[arg(long, env = "TWITCH_BEARER_TOKEN", hide_env_values = true)]
    bearer_token: String,

    /// JSON file with engine settings; flags below override it.
    #[arg(long, env = "CHANBOT_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "CHANBOT_CHANNEL_TTL")]
    channel_ttl_seconds: Option<u64>,

    #[arg(long, env = "CHANBOT_EVICTION_SWEEP")]
    eviction_sweep_seconds: Option<u64>,

    #[arg(long, env = "CHANBOT_COMMAND_PREFIX")]
    command_prefix: Option<String>,

    /// Our own login; chat lines from it are ignored.
    #[arg(long, env = "CHANBOT_BOT_USERNAME")]
    bot_username: Option<String>,

    #[arg(long, default_value = "false")]
    skip_migrations: bool,
}

impl Args {
    fn engine_config(&self) -> Result<EngineConfig, chanbot_core::Error> {
        let mut cfg = match &self.config {
            Some(path) => EngineConfig::from_json_file(path)?,
            None => EngineConfig::default(),
        };
        if let Some(ttl) = self.channel_ttl_seconds {
            cfg.channel_ttl_seconds = ttl;
        }
        if let Some(sweep) = self.eviction_sweep_seconds {
            cfg.eviction_sweep_seconds = sweep;
        }
        if let Some(prefix) = &self.command_prefix {
            cfg.command_prefix = prefix.clone();
        }
        if self.bot_username.is_some() {
            cfg.bot_username = self.bot_username.clone();
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("chanbot=info".parse()?);
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing()?;
    let args = Args::parse();
    let config = args.engine_config().context("invalid engine configuration")?;
    info!(
        "ChanBot starting. ttl={}s sweep={}s prefix='{}'",
        config.channel_ttl_seconds, config.eviction_sweep_seconds, config.command_prefix
    );

    let db = Database::new(&args.database_url).await?;
    if !args.skip_migrations {
        db.migrate().await?;
    }

    let helix = Arc::new(TwitchHelixClient::new(&args.bearer_token, &args.client_id));
    let registry = ChannelRegistry::new(
        Arc::new(PostgresChannelConfigRepository::new(db.pool().clone())),
        helix.clone(),
        Arc::new(StdoutTransport),
        TemplateResolver::with_twitch_tags(helix),
        config.clone(),
    );
    let eviction = spawn_eviction_task(registry.clone(), config.eviction_sweep_interval());
    let chat = ChatService::new(registry.clone());

    let input = BufReader::new(tokio::io::stdin());
    tokio::select! {
        res = simulate::run(&chat, input) => {
            if let Err(e) = res {
                error!("Input loop error: {:?}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received");
        }
    }

    eviction.abort();
    registry.shutdown();
    info!("Main finished. Goodbye!");
    Ok(())
}
