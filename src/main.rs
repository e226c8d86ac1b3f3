//! Binary entrypoint for the Turnlink CLI.
//!
//! Commands:
//! - `start [--host <addr>] [--port <n>]` - serve the game to a browser client
//! - `play` - play the same game on the terminal
//! - `init` - create a starter `config.toml`
//! - `verbs` - list the registered verbs with their object slots
//!
//! See the library crate docs for module-level details: `turnlink::`.
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use turnlink::bridge::{BridgeError, TurnBridge};
use turnlink::config::{Config, Verbosity};
use turnlink::game::{play, run_console, Game};
use turnlink::wire;

#[derive(Parser)]
#[command(name = "turnlink")]
#[command(about = "Play a turn-based text adventure through a browser, with live affordances")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP turn bridge
    Start {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides server.port; 0 picks a free port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Play on the console instead of the browser
    Play,
    /// Write a default configuration file
    Init,
    /// List the verbs the game understands
    Verbs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start { host, port } => {
            let mut config = load_config(&cli.config).await?;
            init_logging(Some(&config), cli.verbose);
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting Turnlink v{}", env!("CARGO_PKG_VERSION"));

            let mut game = Game::load(config.clone())?;
            let mut bridge = TurnBridge::from_config(&config);
            bridge.start().await?;
            game.intro(&mut bridge);

            let outcome = tokio::select! {
                result = play(&mut bridge, &mut game) => result,
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, shutting down");
                    Ok(())
                }
            };
            bridge.shutdown();
            bridge.closed().await;

            match outcome {
                Ok(()) => info!("Session finished"),
                Err(BridgeError::InactivityTimeout(limit)) => {
                    info!("Session closed after {:?} without a request", limit)
                }
                Err(e) => {
                    error!("Session failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Play => {
            let config = load_config(&cli.config).await?;
            init_logging(Some(&config), cli.verbose);
            let mut game = Game::load(config)?.with_markup(false);
            let stdin = std::io::stdin();
            run_console(&mut game, stdin.lock(), std::io::stdout())?;
        }
        Commands::Init => {
            init_logging(None, cli.verbose);
            if Path::new(&cli.config).exists() {
                warn!("{} already exists; leaving it untouched", cli.config);
                return Ok(());
            }
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Verbs => {
            let config = load_config(&cli.config).await?;
            init_logging(Some(&config), cli.verbose);
            let registry = turnlink::afford::VerbRegistry::from_config(&config);
            print!("{}", wire::verb_listing(&registry));
        }
    }

    Ok(())
}

/// A missing file means "run with defaults"; a broken one is an error.
async fn load_config(path: &str) -> Result<Config> {
    if Path::new(path).exists() {
        Config::load(path).await
    } else {
        Ok(Config::default())
    }
}

fn init_logging(config: Option<&Config>, verbose: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    let configured = config.map(|c| c.server.verbosity).unwrap_or_default();
    let base_level = match (configured, verbose) {
        (_, 1) => log::LevelFilter::Debug,
        (_, v) if v > 1 => log::LevelFilter::Trace,
        (Verbosity::None, _) => log::LevelFilter::Off,
        (Verbosity::Debug, _) => log::LevelFilter::Debug,
        _ => log::LevelFilter::Info,
    };
    builder.filter_level(base_level);

    let log_file = config
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    if let Some(f) = log_file {
        let file = std::sync::Mutex::new(f);
        // Mirror to the console only when someone is watching it
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = file.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
