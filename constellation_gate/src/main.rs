//! constellation_gate: the password wall and content API in front of the
//! "Horizons Suspendus" web documentary.
//!
//! Serves the constellation map and chapter payloads over JSON, every route
//! gated behind HTTP basic auth. Progression itself runs in the visitor's
//! client; the gate holds no per-visitor state.

mod auth;
mod config;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use config::GateConfig;
use routes::{create_router, GateState};
use story_atlas::StoryAtlas;

#[derive(Parser)]
#[command(name = "constellation_gate")]
#[command(about = "Gated HTTP front for the Horizons Suspendus web documentary")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "gate.toml")]
    config: PathBuf,

    /// Listen address (overrides config file)
    #[arg(long, env = "GATE_BIND")]
    bind: Option<SocketAddr>,

    /// Atlas TOML file (overrides config file; bundled content otherwise)
    #[arg(long, env = "GATE_ATLAS")]
    atlas: Option<PathBuf>,

    /// Basic-auth username (overrides config file)
    #[arg(long, env = "GATE_USERNAME")]
    username: Option<String>,

    /// Basic-auth password (overrides config file)
    #[arg(long, env = "GATE_PASSWORD")]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = GateConfig::load(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(atlas) = cli.atlas {
        config.atlas = Some(atlas);
    }
    if let Some(username) = cli.username {
        config.auth.username = username;
    }
    if let Some(password) = cli.password {
        config.auth.password = password;
    }

    let atlas = match &config.atlas {
        Some(path) => {
            info!(path = %path.display(), "loading atlas");
            StoryAtlas::from_toml_file(path)?
        }
        None => StoryAtlas::bundled(),
    };
    info!(
        nodes = atlas.constellation().nodes().len(),
        chapters = atlas.chapters().len(),
        start = %atlas.start(),
        "atlas ready"
    );

    let state = Arc::new(GateState {
        atlas,
        auth: config.auth.clone(),
    });
    let app = create_router(state);

    info!("gate listening on http://{}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
