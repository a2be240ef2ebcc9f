// ABOUTME: Binary entry point: boot intro, HTTP server, and demo mode.
// ABOUTME: Wires config, client state, store seed, and the accept loop.

mod boot;
mod demo;
mod server;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mpl_audio::AudioEngine;
use mpl_core::{ClientState, Config};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "multipass-labs", about = "Locale-aware content site for the entity collective")]
struct Cli {
    /// Skip the boot intro even on a first run
    #[arg(long)]
    no_intro: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the site server (the default)
    Serve,
    /// Render a background animation to the terminal
    Demo {
        /// Variant label, e.g. "circuit", "hex-waterfall", or "all"
        variant: String,
        /// Frames to render before exiting (0 = config default)
        #[arg(long, default_value_t = 0)]
        frames: u64,
        /// Fixed animation seed; omit for a random one
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Forget the intro-seen flag so the boot sequence plays again
    ResetIntro,
}

fn init_tracing() {
    // MPL_ENV=development raises the default level; RUST_LOG still wins
    let default_level = match std::env::var("MPL_ENV").as_deref() {
        Ok("development") => "debug",
        _ => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load_or_default();

    match cli.command {
        Some(Command::Demo {
            variant,
            frames,
            seed,
        }) => demo::run(&variant, frames, seed, &config),
        Some(Command::ResetIntro) => {
            ClientState::clear_default()?;
            tracing::info!("intro state cleared; the boot sequence will play next run");
            Ok(())
        }
        Some(Command::Serve) | None => serve(config, cli.no_intro).await,
    }
}

async fn serve(config: Config, no_intro: bool) -> Result<()> {
    let mut state = ClientState::load_or_new();
    if !no_intro && boot::should_play(&config.boot, &state) {
        let mut audio = AudioEngine::new(&config.audio);
        let mut stdout = std::io::stdout().lock();
        boot::play(&mut stdout, &config.boot, &mut state, &mut audio)?;
        match state.save_to_default() {
            Ok(path) => tracing::debug!(path = %path.display(), "client state saved"),
            Err(err) => tracing::warn!(%err, "could not persist intro state"),
        }
    }

    let store = Arc::new(mpl_site::seed::store());
    let port = config.effective_port();
    // tiny_http blocks on accept, so the loop lives on a blocking thread
    tokio::task::spawn_blocking(move || server::run(port, store)).await?
}
