//! Test utilities & fixtures.
//! A scripted world whose answers are set up per test, plus helpers for
//! driving the bridge in-process.
#![allow(dead_code)] // Each test binary uses a different subset.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::oneshot;

use turnlink::afford::{
    ActionCandidate, AffordanceEngine, AffordanceError, AffordanceRecord, CollaboratorError,
    Collaborators, Entity, EntityId, ObjectionClass, Oracle, ScopeResolver, TopicEntry, TopicSets,
    TopicSource, VerbDescriptor, VerbKind, VerbRegistry, Verification,
};
use turnlink::bridge::{NetEvent, NetRequest, Reply, TurnView};
use turnlink::config::AffordanceConfig;

pub const ACTOR: &str = "me";

/// Collaborators answering from tables. Unlisted probes get `fallback`.
pub struct ScriptedWorld {
    pub scope: Vec<Entity>,
    pub location: Option<EntityId>,
    pub exits: Vec<String>,
    pub verdicts: HashMap<(String, Option<String>, Option<String>), Verification>,
    pub fallback: Verification,
    pub topics: HashMap<(String, String), TopicSets>,
    pub oracle_down: AtomicBool,
}

impl ScriptedWorld {
    pub fn new(scope: Vec<Entity>) -> Self {
        Self {
            scope,
            location: None,
            exits: Vec::new(),
            verdicts: HashMap::new(),
            fallback: Verification::objection(ObjectionClass::Illogical, 0),
            topics: HashMap::new(),
            oracle_down: AtomicBool::new(false),
        }
    }

    pub fn allow(mut self, verb: &str, direct: Option<&str>, indirect: Option<&str>) -> Self {
        self.verdicts.insert(key(verb, direct, indirect), Verification::NoObjection);
        self
    }

    pub fn judge(
        mut self,
        verb: &str,
        direct: Option<&str>,
        indirect: Option<&str>,
        verdict: Verification,
    ) -> Self {
        self.verdicts.insert(key(verb, direct, indirect), verdict);
        self
    }

    pub fn with_topics(mut self, verb: &str, recipient: &str, sets: TopicSets) -> Self {
        self.topics.insert((verb.to_string(), recipient.to_string()), sets);
        self
    }

    pub fn fail_oracle(&self) {
        self.oracle_down.store(true, Ordering::SeqCst);
    }
}

fn key(verb: &str, direct: Option<&str>, indirect: Option<&str>) -> (String, Option<String>, Option<String>) {
    (
        verb.to_string(),
        direct.map(str::to_string),
        indirect.map(str::to_string),
    )
}

impl ScopeResolver for ScriptedWorld {
    fn scope(&self, actor: &str) -> Result<Vec<Entity>, CollaboratorError> {
        if actor != ACTOR {
            return Err(CollaboratorError::scope(format!("no actor {}", actor)));
        }
        Ok(self.scope.clone())
    }

    fn location(&self, _actor: &str) -> Result<Option<EntityId>, CollaboratorError> {
        Ok(self.location.clone())
    }

    fn visible_exits(&self, _actor: &str) -> Result<Vec<String>, CollaboratorError> {
        Ok(self.exits.clone())
    }
}

impl Oracle for ScriptedWorld {
    fn verify(&self, candidate: &ActionCandidate<'_>) -> Result<Verification, CollaboratorError> {
        if self.oracle_down.load(Ordering::SeqCst) {
            return Err(CollaboratorError::oracle("rules offline"));
        }
        let k = key(
            &candidate.verb.id,
            candidate.direct.map(|e| e.id.as_str()),
            candidate.indirect.map(|e| e.id.as_str()),
        );
        Ok(self.verdicts.get(&k).copied().unwrap_or(self.fallback))
    }
}

impl TopicSource for ScriptedWorld {
    fn topics(
        &self,
        verb: &VerbDescriptor,
        recipient: &Entity,
    ) -> Result<Option<TopicSets>, CollaboratorError> {
        Ok(self
            .topics
            .get(&(verb.id.clone(), recipient.id.clone()))
            .cloned())
    }
}

/// Registry plus scripted world, viewable by the bridge.
pub struct Fixture {
    pub registry: VerbRegistry,
    pub config: AffordanceConfig,
    pub world: ScriptedWorld,
}

impl Fixture {
    pub fn new(verbs: Vec<VerbDescriptor>, world: ScriptedWorld) -> Self {
        Self {
            registry: VerbRegistry::new(verbs),
            config: AffordanceConfig {
                excluded: Vec::new(),
                ..AffordanceConfig::default()
            },
            world,
        }
    }

    pub fn compute(&self) -> Result<Vec<AffordanceRecord>, AffordanceError> {
        AffordanceEngine::new(&self.registry, &self.config).compute(ACTOR, Collaborators::of(&self.world))
    }
}

impl TurnView for Fixture {
    fn affordances(&self) -> Result<Vec<AffordanceRecord>, AffordanceError> {
        self.compute()
    }

    fn object_names(&self) -> Result<Vec<String>, AffordanceError> {
        AffordanceEngine::new(&self.registry, &self.config)
            .object_names(ACTOR, Collaborators::of(&self.world))
    }

    fn game_over_message(&self) -> String {
        "<p>The End</p>".to_string()
    }
}

/// Look (intransitive) and Take (transitive) with apple and rock in scope:
/// Look and Take apple pass, Take rock draws a non-obvious objection ranked -1.
pub fn look_take_fixture() -> Fixture {
    let verbs = vec![
        VerbDescriptor::new("look", "Look", 10, VerbKind::Intransitive),
        VerbDescriptor::new("take", "Take", 20, VerbKind::Transitive),
    ];
    let world = ScriptedWorld::new(vec![Entity::new("apple", "apple"), Entity::new("rock", "rock")])
        .allow("look", None, None)
        .allow("take", Some("apple"), None)
        .judge(
            "take",
            Some("rock"),
            None,
            Verification::objection(ObjectionClass::NonObvious, -1),
        );
    Fixture::new(verbs, world)
}

/// Push a request into the bridge's event queue, returning the reply handle.
pub async fn send(
    tx: &tokio::sync::mpsc::Sender<NetEvent>,
    request: NetRequest,
) -> oneshot::Receiver<Reply> {
    let (event, rx) = NetEvent::new(request);
    tx.send(event).await.expect("bridge accepts events");
    rx
}

pub fn fragment(reply: Reply) -> String {
    match reply {
        Reply::Fragment(body) => body,
        other => panic!("expected a fragment, got {:?}", other),
    }
}

/// The bundled demo world.
pub fn demo_world_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join("world.json")
}

pub fn entity(name: &str) -> Entity {
    Entity::new(name, name)
}

pub fn topic(subjects: &[&str]) -> TopicEntry {
    TopicEntry::about(subjects)
}
