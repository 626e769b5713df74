use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hiscore_roles::bot::Bot;
use hiscore_roles::config::{EnvConfig, Settings};
use hiscore_roles::discord::DiscordClient;
use hiscore_roles::hiscores::HttpFeed;
use hiscore_roles::links::JsonFileLinkStore;
use hiscore_roles::server::{AppState, build_router};
use hiscore_roles::webhooks::InteractionVerifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hiscore_roles=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let env = EnvConfig::from_env().context("reading environment")?;
    tracing::debug!(config = ?env, "Loaded environment");
    let settings = Settings::load(&env.settings_path).context("loading bot settings")?;
    let verifier =
        InteractionVerifier::from_hex(&env.public_key).context("parsing DISCORD_PUBLIC_KEY")?;

    let http = reqwest::Client::builder()
        .user_agent(concat!("hiscore-roles/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")?;
    let discord = DiscordClient::new(
        http.clone(),
        env.api_base.as_str(),
        env.token.as_str(),
        settings.guild,
        env.application_id,
    );
    let feed = HttpFeed::new(http, env.hiscores_endpoint.as_str());
    let store = JsonFileLinkStore::open(env.links_path.clone())
        .with_context(|| format!("opening link store {}", env.links_path.display()))?;

    let bot = Bot::new(
        Arc::new(discord),
        feed,
        store,
        settings,
        env.new_record_webhook_token.clone(),
    );
    let app = build_router(AppState::new(bot, verifier));

    tracing::info!("listening on {}", env.bind_addr);
    let listener = tokio::net::TcpListener::bind(env.bind_addr)
        .await
        .with_context(|| format!("binding {}", env.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
