//! # Configuration Management Module
//!
//! All runtime settings for turnlink live in one TOML file, loaded once at
//! startup into a [`Config`] value that is then passed by reference to the
//! pieces that need it. Nothing reads configuration through globals.
//!
//! ## Configuration Structure
//!
//! - [`ServerConfig`] - listener address, module prefix, asset root, timeout, verbosity
//! - [`LoggingConfig`] - optional log file and session transcript
//! - [`GameConfig`] - world seed, acting entity, game-over message
//! - [`AffordanceConfig`] - scope exclusions and verdict knobs
//! - `verbs` - the verb registry, one `[[verbs]]` table per verb
//!
//! ## Usage
//!
//! ```rust,no_run
//! use turnlink::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Serving {} on {}:{}", config.server.module, config.server.host, config.server.port);
//!
//!     Config::create_default("config.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 49000
//! module = "/game/"
//! asset_root = "htdocs"
//! inactivity_timeout_secs = 1800
//! verbosity = 3
//!
//! [affordances]
//! excluded = ["floor", "walls", "ceiling"]
//!
//! [[verbs]]
//! id = "look"
//! name = "Look"
//! order = 1010
//! kind = "intransitive"
//! ```

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::afford::{VerbDescriptor, VerbKind};

/// Five ordered logging levels for the bridge, its asset resolver and the
/// game loops. Library internals (engine, world) log at `debug` under the
/// `env_logger` level only.
///
/// Serialized as the integers 0 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Verbosity {
    /// Nothing is logged.
    None = 0,
    /// Start, stop, timeouts and errors.
    Essential = 1,
    /// Plus every init and command request.
    Commands = 2,
    /// Plus every asset request.
    Assets = 3,
    /// Plus debug detail.
    Debug = 4,
}

impl Verbosity {
    /// Whether messages meant for `level` should be emitted.
    pub fn allows(self, level: Verbosity) -> bool {
        level != Verbosity::None && self >= level
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Assets
    }
}

impl TryFrom<u8> for Verbosity {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Verbosity::None),
            1 => Ok(Verbosity::Essential),
            2 => Ok(Verbosity::Commands),
            3 => Ok(Verbosity::Assets),
            4 => Ok(Verbosity::Debug),
            other => Err(format!("verbosity must be between 0 and 4, got {}", other)),
        }
    }
}

impl From<Verbosity> for u8 {
    fn from(v: Verbosity) -> Self {
        v as u8
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path prefix for the protocol endpoints; begins and ends with `/`.
    #[serde(default = "default_module")]
    pub module: String,
    #[serde(default = "default_asset_root")]
    pub asset_root: String,
    /// Absent: never time out. Zero: time out on the first idle wait.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactivity_timeout_secs: Option<u64>,
    #[serde(default)]
    pub verbosity: Verbosity,
    /// Command synthesised when a client initialises on an empty buffer.
    #[serde(default = "default_look_command")]
    pub look_command: String,
    #[serde(default = "default_max_command_bytes")]
    pub max_command_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    49000
}

fn default_module() -> String {
    "/game/".to_string()
}

fn default_asset_root() -> String {
    "htdocs".to_string()
}

fn default_look_command() -> String {
    "Look".to_string()
}

fn default_max_command_bytes() -> usize {
    1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            module: default_module(),
            asset_root: default_asset_root(),
            inactivity_timeout_secs: None,
            verbosity: Verbosity::default(),
            look_command: default_look_command(),
            max_command_bytes: default_max_command_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn inactivity_timeout(&self) -> Option<Duration> {
        self.inactivity_timeout_secs.map(Duration::from_secs)
    }

    pub fn init_path(&self) -> String {
        format!("{}init", self.module)
    }

    pub fn cmd_path(&self) -> String {
        format!("{}cmd", self.module)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Append-mode log file. Console output is kept when stdout is a TTY.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Append-mode transcript of every accepted command and turn output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// JSON seed describing rooms, items and characters.
    #[serde(default = "default_world")]
    pub world: String,
    /// Entity id of the acting player.
    #[serde(default = "default_actor")]
    pub actor: String,
    /// Markup sent ahead of the terminal footer.
    #[serde(default = "default_game_over_message")]
    pub game_over_message: String,
}

fn default_world() -> String {
    "data/world.json".to_string()
}

fn default_actor() -> String {
    "player".to_string()
}

fn default_game_over_message() -> String {
    "<p><b>*** The game has ended ***</b></p>".to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: default_world(),
            actor: default_actor(),
            game_over_message: default_game_over_message(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordanceConfig {
    /// Generic scenery never offered as an object.
    #[serde(default)]
    pub excluded: Vec<String>,
    /// Leave the actor's own location out of the scope.
    #[serde(default = "default_true")]
    pub ignore_location: bool,
    /// Count non-obvious actions as strong affordances.
    #[serde(default)]
    pub non_obvious_is_obvious: bool,
    /// Offer only the first subject of a topic that covers several.
    #[serde(default = "default_true")]
    pub single_subject_per_topic: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AffordanceConfig {
    fn default() -> Self {
        Self {
            excluded: vec![
                "floor".to_string(),
                "walls".to_string(),
                "ceiling".to_string(),
                "sky".to_string(),
            ],
            ignore_location: true,
            non_obvious_is_obvious: false,
            single_subject_per_topic: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub affordances: AffordanceConfig,
    #[serde(default = "default_verbs")]
    pub verbs: Vec<VerbDescriptor>,
}

/// Verbs understood by the bundled reference world.
pub fn default_verbs() -> Vec<VerbDescriptor> {
    use VerbKind::*;
    vec![
        VerbDescriptor::new("look", "Look", 1010, Intransitive),
        VerbDescriptor::new("inventory", "Inventory", 1020, Intransitive),
        VerbDescriptor::new("wait", "Wait", 1030, Intransitive),
        VerbDescriptor::new("go", "Go", 1040, Travel),
        VerbDescriptor::new("examine", "Examine", 2010, Transitive),
        VerbDescriptor::new("take", "Get", 2020, Transitive),
        VerbDescriptor::new("drop", "Drop", 2030, Transitive),
        VerbDescriptor::new("open", "Open", 2040, Transitive),
        VerbDescriptor::new("close", "Close", 2050, Transitive),
        VerbDescriptor::new("eat", "Eat", 2060, Transitive),
        VerbDescriptor::new("attack", "Attack", 2070, Transitive),
        VerbDescriptor::new("ask_about", "Ask", 3010, Topic).with_preposition("about"),
        VerbDescriptor::new("tell_about", "Tell", 3020, Topic).with_preposition("about"),
        VerbDescriptor::new("ask_for", "Ask", 3030, Topic).with_preposition("for"),
        VerbDescriptor::new("show_to", "Show", 3040, Ditransitive).with_preposition("to"),
        VerbDescriptor::new("give_to", "Give", 3050, Ditransitive).with_preposition("to"),
        VerbDescriptor::new("put_in", "Put", 3060, Ditransitive).with_preposition("in"),
        VerbDescriptor::new("unlock_with", "Unlock", 3070, Ditransitive)
            .with_preposition("with"),
    ]
}

impl Config {
    /// Load configuration from a file and validate it.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config
            .validate()
            .map_err(|e| anyhow!("Invalid config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let module = &self.server.module;
        if !module.starts_with('/') || !module.ends_with('/') {
            bail!("server.module must begin and end with '/', got '{}'", module);
        }
        if self.server.look_command.trim().is_empty() {
            bail!("server.look_command must not be empty");
        }
        if self.server.max_command_bytes == 0 {
            bail!("server.max_command_bytes must be positive");
        }
        if self.game.actor.trim().is_empty() {
            bail!("game.actor must not be empty");
        }

        let mut ids = HashSet::new();
        for verb in &self.verbs {
            if verb.id.trim().is_empty() || verb.name.trim().is_empty() {
                bail!("every verb needs a non-empty id and name");
            }
            if !ids.insert(verb.id.as_str()) {
                bail!("duplicate verb id '{}'", verb.id);
            }
        }
        let travel = self
            .verbs
            .iter()
            .filter(|v| v.kind == VerbKind::Travel)
            .count();
        if travel > 1 {
            bail!("at most one travel verb may be registered, found {}", travel);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            game: GameConfig::default(),
            affordances: AffordanceConfig::default(),
            verbs: default_verbs(),
        }
    }
}
