//! # Turnlink - affordance-driven play over HTTP
//!
//! Turnlink lets a turn-based text adventure run behind a browser client.
//! After every turn it works out which actions are currently valid and ships
//! them, with the turn's output, in a single HTTP reply.
//!
//! ## Features
//!
//! - **Affordance Engine**: enumerates verb/object combinations the world's
//!   rules currently accept, split into strong and weak suggestions.
//! - **Turn Bridge**: one blocking suspension point between stateless HTTP
//!   requests and the game loop, with resume, inactivity timeout and a
//!   single terminal reply on game over.
//! - **Wire format**: rendered output framed by header and footer scripts,
//!   the footer carrying affordances and in-scope objects as JSON.
//! - **Reference world**: a JSON-seeded simulation with a small command
//!   interpreter, used by the binary and the tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use turnlink::bridge::TurnBridge;
//! use turnlink::config::Config;
//! use turnlink::game::{play, Game};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let mut game = Game::load(config.clone())?;
//!     let mut bridge = TurnBridge::from_config(&config);
//!     bridge.start().await?;
//!     game.intro(&mut bridge);
//!     play(&mut bridge, &mut game).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`afford`] - verb registry, verdicts, collaborator traits and enumeration
//! - [`bridge`] - session state machine, HTTP front end and static assets
//! - [`wire`] - reply composition, output rendering and console listings
//! - [`world`] - the reference simulation and its interpreter
//! - [`game`] - web and console play loops
//! - [`config`] - configuration management and validation
//! - [`validation`] - input sanitization and path guards
//!
//! ```text
//! ┌──────────────┐   NetEvent    ┌──────────────┐
//! │ axum front   │ ────────────> │ Turn Bridge  │ <── Game (TurnView)
//! └──────────────┘  <── Reply    └──────────────┘         │
//!                                                 Affordance Engine
//!                                                         │
//!                                      World (Scope, Oracle, Topics)
//! ```

pub mod afford;
pub mod bridge;
pub mod config;
pub mod game;
pub mod logutil;
pub mod metrics;
pub mod validation;
pub mod wire;
pub mod world;
