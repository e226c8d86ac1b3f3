//! Glue between the reference world, the affordance engine and the two play
//! surfaces (web bridge and console).
use std::io::{self, BufRead, Write};

use log::{debug, info, warn};

use crate::afford::{AffordanceEngine, AffordanceError, AffordanceRecord, Collaborators, VerbRegistry};
use crate::bridge::{BridgeError, Prompt, Transcript, TurnBridge, TurnView};
use crate::config::{Config, Verbosity};
use crate::logutil::quoted;
use crate::wire;
use crate::world::{execute, Outcome, World, WorldError};

pub struct Game {
    config: Config,
    registry: VerbRegistry,
    world: World,
    markup: bool,
}

impl Game {
    pub fn new(config: Config, world: World) -> Self {
        let registry = VerbRegistry::from_config(&config);
        Self {
            config,
            registry,
            world,
            markup: true,
        }
    }

    /// Load the world seed named in `config.game.world`.
    pub fn load(config: Config) -> Result<Self, WorldError> {
        let world = World::load(&config.game.world, &config.game.actor)?;
        Ok(Self::new(config, world))
    }

    /// Log lines from the game follow `server.verbosity`, like the bridge's.
    pub fn logs(&self, level: Verbosity) -> bool {
        self.config.server.verbosity.allows(level)
    }

    /// Plain text for terminals, link markup for the browser client.
    pub fn with_markup(mut self, markup: bool) -> Self {
        self.markup = markup;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &VerbRegistry {
        &self.registry
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn engine(&self) -> AffordanceEngine<'_> {
        AffordanceEngine::new(&self.registry, &self.config.affordances)
    }

    /// Title, introduction and the starting room.
    pub fn intro(&self, out: &mut dyn Transcript) {
        if self.markup {
            out.say(&format!("<b>{}</b>\n", self.world.title));
        } else {
            out.say(&format!("{}\n", self.world.title));
        }
        if !self.world.intro.is_empty() {
            out.say(&format!("{}\n", self.world.intro));
        }
        out.say("\n");
        out.say(&self.world.describe_room(self.markup));
    }

    /// Run one command. The meta commands `affordances`, `objects` (`objs`)
    /// and `verbs` print what the web footer would carry.
    pub fn handle(&mut self, command: &str, out: &mut dyn Transcript) -> Outcome {
        match command.trim().to_lowercase().as_str() {
            "affordances" => {
                match self.affordances().map(|records| wire::affordances_listing(&records)) {
                    Ok(Ok(listing)) => out.say(&listing),
                    Ok(Err(e)) => out.say(&format!("Could not encode affordances: {}\n", e)),
                    Err(e) => out.say(&format!("{}\n", e)),
                }
                Outcome::Continue
            }
            "objects" | "objs" => {
                match self.object_names() {
                    Ok(names) => match wire::objects_listing(&names) {
                        Ok(listing) => out.say(&listing),
                        Err(e) => out.say(&format!("Could not encode objects: {}\n", e)),
                    },
                    Err(e) => out.say(&format!("{}\n", e)),
                }
                Outcome::Continue
            }
            "verbs" => {
                out.say(&wire::verb_listing(&self.registry));
                Outcome::Continue
            }
            _ => execute(&mut self.world, &self.registry, command, self.markup, out),
        }
    }
}

impl TurnView for Game {
    fn affordances(&self) -> Result<Vec<AffordanceRecord>, AffordanceError> {
        let records = self
            .engine()
            .compute(&self.config.game.actor, Collaborators::of(&self.world))?;
        if self.logs(Verbosity::Debug) {
            debug!("{} affordances in {}", records.len(), self.world.here());
        }
        Ok(records)
    }

    fn object_names(&self) -> Result<Vec<String>, AffordanceError> {
        self.engine()
            .object_names(&self.config.game.actor, Collaborators::of(&self.world))
    }

    fn game_over_message(&self) -> String {
        self.config.game.game_over_message.clone()
    }
}

/// Drive the game from the bridge until the terminal reply has gone out.
pub async fn play(bridge: &mut TurnBridge, game: &mut Game) -> Result<(), BridgeError> {
    loop {
        match bridge.await_next_command(&*game).await? {
            Prompt::Command(command) => {
                if game.handle(&command, &mut *bridge) == Outcome::GameOver {
                    if game.logs(Verbosity::Essential) {
                        info!("Game over after {}", quoted(&command));
                    }
                    bridge.request_termination();
                }
            }
            Prompt::GameOver => return Ok(()),
        }
    }
}

/// Console fallback: one command per line until quit, victory or EOF.
pub fn run_console<R: BufRead, W: Write>(game: &mut Game, input: R, mut output: W) -> io::Result<()> {
    let mut text = String::new();
    game.intro(&mut text);
    write!(output, "{}", text)?;

    let mut lines = input.lines();
    loop {
        write!(output, "\n> ")?;
        output.flush()?;
        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                if game.logs(Verbosity::Essential) {
                    warn!("Console input error: {}", e);
                }
                break;
            }
        };
        let mut text = String::new();
        let outcome = game.handle(&line, &mut text);
        write!(output, "{}", text)?;
        if outcome == Outcome::GameOver {
            writeln!(output, "*** The game has ended ***")?;
            break;
        }
    }
    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldSeed;

    fn game() -> Game {
        let seed = WorldSeed::from_json(
            r#"{
                "title": "Tiny",
                "intro": "Hello.",
                "start": "hall",
                "rooms": [{"id": "hall", "name": "Hall", "description": "A hall.",
                           "exits": [{"direction": "north", "to": "hall"}]}],
                "items": [{"id": "apple", "name": "apple", "description": "Red.",
                           "location": {"room": "hall"}}]
            }"#,
            "inline",
        )
        .unwrap();
        Game::new(Config::default(), World::from_seed(seed, "player").unwrap()).with_markup(false)
    }

    #[test]
    fn meta_commands_print_footer_data() {
        let mut g = game();
        let mut out = String::new();
        g.handle("objs", &mut out);
        assert_eq!(out, "[\"apple\"]\n");

        let mut out = String::new();
        g.handle("affordances", &mut out);
        assert!(out.contains(r#"{"affordance":["Get",["apple"]],"order":2020}"#), "{}", out);

        let mut out = String::new();
        g.handle("verbs", &mut out);
        assert!(out.contains("* Put [x] in [y]"));
    }

    #[test]
    fn log_gate_follows_server_verbosity() {
        let mut g = game();
        assert!(g.logs(Verbosity::Assets));
        assert!(!g.logs(Verbosity::Debug));
        g.config.server.verbosity = Verbosity::Essential;
        assert!(g.logs(Verbosity::Essential));
        assert!(!g.logs(Verbosity::Commands));
        g.config.server.verbosity = Verbosity::None;
        assert!(!g.logs(Verbosity::Essential));
    }

    #[test]
    fn console_session_runs_to_quit() {
        let mut g = game();
        let mut buf = Vec::new();
        run_console(&mut g, "get apple\ninventory\nquit\nlook\n".as_bytes(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Tiny\nHello.\n\nHall\n"), "{}", text);
        assert!(text.contains("You are carrying an apple."));
        assert!(text.ends_with("*** The game has ended ***\n"));
    }
}
