//! # Turn Bridge
//!
//! Synchronizes stateless HTTP request/reply cycles with a turn-based game
//! loop. The game asks for its next command with
//! [`TurnBridge::await_next_command`], the only suspension point; the bridge
//! first answers the request that produced the previous turn, then waits for
//! the next one.
//!
//! ```text
//! Idle --start/attach--> Listening --shutdown/timeout/game over--> ShuttingDown
//! ```
//!
//! Requests under the module prefix `P`:
//!
//! - `P + "init"`: on an empty buffer a look command is synthesised and the
//!   request answered after that turn; otherwise the buffered output is
//!   returned at once (resume) without consuming a turn
//! - `P + "cmd"`: the body is the next command; an empty body is ignored and
//!   gets no reply (at most [`MAX_UNANSWERED`] such requests are held open)
//! - anything else goes to the [`StaticResolver`]
//!
//! Only one accepted request is ever outstanding. Requests that arrive while
//! a turn runs wait in the event queue.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut bridge = TurnBridge::from_config(&config);
//! bridge.start().await?;
//! loop {
//!     match bridge.await_next_command(&game).await? {
//!         Prompt::Command(text) => game.handle(&text, &mut bridge),
//!         Prompt::GameOver => break,
//!     }
//! }
//! ```

pub mod assets;
pub mod errors;
pub mod http;
mod server;
mod session;
mod transcript;

pub use assets::{AssetLookup, FileAssets, NoAssets, StaticResolver};
pub use errors::BridgeError;
pub use http::{NetEvent, NetRequest, Reply, Responder};
pub use session::BridgeState;

use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::Method;
use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::afford::{AffordanceError, AffordanceRecord};
use crate::config::{ServerConfig, Verbosity};
use crate::logutil::quoted;
use crate::{metrics, validation, wire};
use server::{Frontend, EVENT_QUEUE};
use session::Session;
use transcript::TranscriptFile;

/// Empty-command requests held open at once; the oldest is released first.
pub const MAX_UNANSWERED: usize = 16;

/// What the game shows the bridge when a reply is composed.
pub trait TurnView {
    /// Current affordances; any error voids the whole list.
    fn affordances(&self) -> Result<Vec<AffordanceRecord>, AffordanceError>;

    /// Names of the objects currently in scope.
    fn object_names(&self) -> Result<Vec<String>, AffordanceError>;

    /// Markup placed ahead of the terminal footer.
    fn game_over_message(&self) -> String;
}

/// Sink for turn output.
pub trait Transcript {
    fn say(&mut self, text: &str);
}

impl Transcript for String {
    fn say(&mut self, text: &str) {
        self.push_str(text);
    }
}

/// What the game should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Execute this command, writing output through the bridge.
    Command(String),
    /// The terminal reply went out and the session is closed.
    GameOver,
}

/// Static settings for one bridge.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub host: String,
    pub port: u16,
    pub module: String,
    pub look_command: String,
    pub inactivity_timeout: Option<Duration>,
    pub verbosity: Verbosity,
    pub max_command_bytes: usize,
    /// Append commands and turn output here when set.
    pub transcript: Option<PathBuf>,
}

impl BridgeSettings {
    pub fn from_config(server: &ServerConfig) -> Self {
        Self {
            host: server.host.clone(),
            port: server.port,
            module: server.module.clone(),
            look_command: server.look_command.clone(),
            inactivity_timeout: server.inactivity_timeout(),
            verbosity: server.verbosity,
            max_command_bytes: server.max_command_bytes,
            transcript: None,
        }
    }

    pub fn init_path(&self) -> String {
        format!("{}init", self.module)
    }

    pub fn cmd_path(&self) -> String {
        format!("{}cmd", self.module)
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default())
    }
}

enum RequestKind {
    Init,
    Command,
    Asset,
}

enum Wait {
    Event(NetEvent),
    Closed,
    TimedOut(Duration),
}

pub struct TurnBridge {
    settings: BridgeSettings,
    state: BridgeState,
    session: Session,
    events: Option<mpsc::Receiver<NetEvent>>,
    frontend: Option<Frontend>,
    assets: Box<dyn StaticResolver>,
    /// Empty-command requests: never answered, released at shutdown.
    unanswered: VecDeque<Responder>,
    transcript: Option<TranscriptFile>,
}

impl TurnBridge {
    pub fn new(settings: BridgeSettings, assets: Box<dyn StaticResolver>) -> Self {
        Self {
            settings,
            state: BridgeState::Idle,
            session: Session::default(),
            events: None,
            frontend: None,
            assets,
            unanswered: VecDeque::new(),
            transcript: None,
        }
    }

    /// A bridge serving assets from `server.asset_root`, writing the
    /// transcript to `logging.transcript` if set.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let mut settings = BridgeSettings::from_config(&config.server);
        settings.transcript = config.logging.transcript.as_ref().map(PathBuf::from);
        Self::new(settings, Box::new(FileAssets::new(&config.server.asset_root)))
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == BridgeState::Listening
    }

    /// Activate a session and bind the HTTP listener. Returns the bound
    /// address, so port 0 can be used.
    pub async fn start(&mut self) -> Result<SocketAddr, BridgeError> {
        self.shutdown();
        let (tx, rx) = mpsc::channel(EVENT_QUEUE);
        let frontend = Frontend::spawn(&self.settings.host, self.settings.port, tx)
            .await
            .map_err(BridgeError::Bind)?;
        let addr = frontend.addr();
        self.activate(rx);
        self.frontend = Some(frontend);
        if self.logs(Verbosity::Essential) {
            info!(
                "Turn bridge listening on http://{}{}",
                addr, self.settings.module
            );
        }
        Ok(addr)
    }

    /// Activate a session without a listener; events are fed through the
    /// returned sender.
    pub fn attach(&mut self) -> mpsc::Sender<NetEvent> {
        self.shutdown();
        let (tx, rx) = mpsc::channel(EVENT_QUEUE);
        self.activate(rx);
        if self.logs(Verbosity::Essential) {
            info!("Turn bridge attached to in-process transport");
        }
        tx
    }

    fn activate(&mut self, events: mpsc::Receiver<NetEvent>) {
        self.session = Session::default();
        self.unanswered.clear();
        self.transcript = self.settings.transcript.as_ref().map(TranscriptFile::new);
        self.events = Some(events);
        self.state = BridgeState::Listening;
    }

    /// Turn output buffered for the next reply.
    pub fn output(&self) -> &str {
        &self.session.output
    }

    pub fn has_pending(&self) -> bool {
        self.session.pending.is_some()
    }

    /// End the game after the current turn: the next
    /// [`await_next_command`](Self::await_next_command) sends the terminal
    /// reply and closes the session.
    pub fn request_termination(&mut self) {
        self.session.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.session.quit
    }

    pub async fn await_next_command(
        &mut self,
        view: &dyn TurnView,
    ) -> Result<Prompt, BridgeError> {
        if !self.is_active() {
            return Err(BridgeError::Inactive);
        }

        if let Some(responder) = self.session.pending.take() {
            let output = self.session.take_output();
            let written = self.transcript.as_mut().map(|t| t.output(&output));
            self.check_transcript(written);
            let body = if self.session.quit {
                wire::compose_game_over(&output, &view.game_over_message())
            } else {
                compose_turn(&output, view)?
            };
            if responder.send(Reply::Fragment(body)).is_err() && self.logs(Verbosity::Essential)
            {
                warn!("Client went away before its reply was sent");
            }
        }

        if self.session.quit {
            self.shutdown();
            return Ok(Prompt::GameOver);
        }

        loop {
            let event = match self.wait().await {
                Wait::Event(event) => event,
                Wait::Closed => {
                    if self.logs(Verbosity::Essential) {
                        warn!("Network transport closed, ending session");
                    }
                    self.shutdown();
                    return Err(BridgeError::TransportClosed);
                }
                Wait::TimedOut(limit) => {
                    metrics::inc_timeouts();
                    if self.logs(Verbosity::Essential) {
                        info!("No request within {:?}, closing session", limit);
                    }
                    self.shutdown();
                    return Err(BridgeError::InactivityTimeout(limit));
                }
            };

            let NetEvent { request, responder } = event;
            match self.classify(&request.path) {
                RequestKind::Init => {
                    if self.session.output.is_empty() {
                        if self.logs(Verbosity::Commands) {
                            info!("INIT: new session, issuing {}", quoted(&self.settings.look_command));
                        }
                        metrics::inc_turns_accepted();
                        let look = self.settings.look_command.clone();
                        let written = self.transcript.as_mut().map(|t| t.command("INIT", &look));
                        self.check_transcript(written);
                        self.session.pending = Some(responder);
                        return Ok(Prompt::Command(look));
                    }
                    if self.logs(Verbosity::Commands) {
                        info!("INIT: resuming with {} buffered bytes", self.session.output.len());
                    }
                    metrics::inc_resumes();
                    let body = compose_turn(&self.session.output, view)?;
                    self.session.delivered = true;
                    let _ = responder.send(Reply::Fragment(body));
                }
                RequestKind::Command => {
                    let command =
                        match validation::sanitize_command(&request.body, self.settings.max_command_bytes) {
                            Ok(command) => command,
                            Err(e) => {
                                if self.logs(Verbosity::Essential) {
                                    warn!("CMD rejected: {}", e);
                                }
                                String::new()
                            }
                        };
                    if command.is_empty() {
                        if self.logs(Verbosity::Commands) {
                            info!("CMD: empty command ignored");
                        }
                        metrics::inc_ignored_commands();
                        if self.unanswered.len() >= MAX_UNANSWERED {
                            self.unanswered.pop_front();
                        }
                        self.unanswered.push_back(responder);
                        continue;
                    }
                    if self.logs(Verbosity::Commands) {
                        info!("CMD: {}", quoted(&command));
                    }
                    metrics::inc_turns_accepted();
                    let written = self.transcript.as_mut().map(|t| t.command("CMD", &command));
                    self.check_transcript(written);
                    self.session.discard_delivered();
                    self.session.pending = Some(responder);
                    return Ok(Prompt::Command(command));
                }
                RequestKind::Asset => {
                    let lookup = if request.method == Method::GET || request.method == Method::POST {
                        self.assets.resolve(&request.path).await
                    } else {
                        AssetLookup {
                            reply: Reply::NotFound,
                            note: Some(format!("{} not served for assets", request.method)),
                        }
                    };
                    if let Some(note) = &lookup.note {
                        if self.logs(Verbosity::Debug) {
                            debug!("{}", note);
                        }
                    }
                    let reply = lookup.reply;
                    match reply {
                        Reply::NotFound => {
                            metrics::inc_assets_missing();
                            if self.logs(Verbosity::Assets) {
                                info!("{} {} -> 404", request.method, request.path);
                            }
                        }
                        _ => {
                            metrics::inc_assets_served();
                            if self.logs(Verbosity::Assets) {
                                info!("{} {}", request.method, request.path);
                            }
                        }
                    }
                    let _ = responder.send(reply);
                }
            }
        }
    }

    async fn wait(&mut self) -> Wait {
        let limit = self.settings.inactivity_timeout;
        let Some(events) = self.events.as_mut() else {
            return Wait::Closed;
        };
        let received = match limit {
            Some(limit) => match tokio::time::timeout(limit, events.recv()).await {
                Ok(received) => received,
                Err(_) => return Wait::TimedOut(limit),
            },
            None => events.recv().await,
        };
        match received {
            Some(event) => Wait::Event(event),
            None => Wait::Closed,
        }
    }

    fn classify(&self, path: &str) -> RequestKind {
        let rest = match path.strip_prefix(self.settings.module.as_str()) {
            Some(rest) => rest,
            None => return RequestKind::Asset,
        };
        match rest {
            "init" => RequestKind::Init,
            "cmd" => RequestKind::Command,
            _ => {
                if self.logs(Verbosity::Debug) {
                    debug!("{} is under {} but not a protocol path", path, self.settings.module);
                }
                RequestKind::Asset
            }
        }
    }

    /// Close the session. Safe to call any number of times.
    pub fn shutdown(&mut self) {
        if self.state != BridgeState::Listening {
            return;
        }
        self.state = BridgeState::ShuttingDown;
        if let Some(frontend) = &self.frontend {
            frontend.stop();
        }
        self.events = None;
        self.session.pending = None;
        self.unanswered.clear();
        if self.logs(Verbosity::Essential) {
            info!("Turn bridge stopped");
        }
        if self.logs(Verbosity::Debug) {
            debug!("Bridge counters: {:?}", metrics::snapshot());
        }
    }

    /// Wait for the HTTP front end to finish after shutdown.
    pub async fn closed(&mut self) {
        if let Some(frontend) = self.frontend.take() {
            frontend.stop();
            frontend.join().await;
        }
    }

    /// Stop writing the transcript after the first failed write.
    fn check_transcript(&mut self, written: Option<io::Result<()>>) {
        if let Some(Err(e)) = written {
            if let Some(t) = self.transcript.take() {
                if self.logs(Verbosity::Essential) {
                    warn!("Transcript {} disabled: {}", t.path().display(), e);
                }
            }
        }
    }

    fn logs(&self, level: Verbosity) -> bool {
        self.settings.verbosity.allows(level)
    }
}

impl Transcript for TurnBridge {
    fn say(&mut self, text: &str) {
        self.session.append(text);
    }
}

impl Drop for TurnBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn compose_turn(output: &str, view: &dyn TurnView) -> Result<String, BridgeError> {
    let records = view.affordances()?;
    let objects = view.object_names()?;
    if log::log_enabled!(log::Level::Debug) {
        debug!("Reply carries {} affordances, {} objects", records.len(), objects.len());
    }
    Ok(wire::compose_reply(output, &records, &objects)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Quiet;

    impl TurnView for Quiet {
        fn affordances(&self) -> Result<Vec<AffordanceRecord>, AffordanceError> {
            Ok(Vec::new())
        }
        fn object_names(&self) -> Result<Vec<String>, AffordanceError> {
            Ok(Vec::new())
        }
        fn game_over_message(&self) -> String {
            String::new()
        }
    }

    fn bridge() -> TurnBridge {
        TurnBridge::new(BridgeSettings::default(), Box::new(NoAssets))
    }

    #[tokio::test]
    async fn inactive_bridge_refuses_to_wait() {
        let mut bridge = bridge();
        assert_eq!(bridge.state(), BridgeState::Idle);
        assert!(matches!(
            bridge.await_next_command(&Quiet).await,
            Err(BridgeError::Inactive)
        ));
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut bridge = bridge();
        bridge.shutdown();
        assert_eq!(bridge.state(), BridgeState::Idle);
        let _tx = bridge.attach();
        assert!(bridge.is_active());
        bridge.shutdown();
        bridge.shutdown();
        assert_eq!(bridge.state(), BridgeState::ShuttingDown);
    }

    #[tokio::test]
    async fn dropped_transport_ends_the_wait() {
        let mut bridge = bridge();
        drop(bridge.attach());
        assert!(matches!(
            bridge.await_next_command(&Quiet).await,
            Err(BridgeError::TransportClosed)
        ));
        assert!(!bridge.is_active());
    }

    #[test]
    fn transcript_path_comes_from_logging_config() {
        let mut config = crate::config::Config::default();
        assert_eq!(TurnBridge::from_config(&config).settings().transcript, None);
        config.logging.transcript = Some("play.web.log".into());
        assert_eq!(
            TurnBridge::from_config(&config).settings().transcript,
            Some(PathBuf::from("play.web.log"))
        );
    }

    #[test]
    fn paths_are_split_by_module_prefix() {
        let bridge = bridge();
        assert!(matches!(bridge.classify("/game/init"), RequestKind::Init));
        assert!(matches!(bridge.classify("/game/cmd"), RequestKind::Command));
        assert!(matches!(bridge.classify("/game/other"), RequestKind::Asset));
        assert!(matches!(bridge.classify("/init"), RequestKind::Asset));
    }
}
