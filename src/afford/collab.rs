//! Seams to the simulation. The engine never touches world state directly;
//! it only asks these three collaborators.
use super::errors::CollaboratorError;
use super::types::{ActionCandidate, Entity, EntityId, VerbDescriptor};
use super::verdict::Verification;

/// Answers "what can the actor perceive or reach right now".
pub trait ScopeResolver {
    /// Entities in scope, unfiltered, in a stable order.
    fn scope(&self, actor: &str) -> Result<Vec<Entity>, CollaboratorError>;

    /// The entity standing for the actor's current location, if any.
    fn location(&self, actor: &str) -> Result<Option<EntityId>, CollaboratorError>;

    /// Names of the directions with currently visible exits.
    fn visible_exits(&self, actor: &str) -> Result<Vec<String>, CollaboratorError>;
}

/// The rule system's verify step, as a pure function of the candidate.
pub trait Oracle {
    fn verify(&self, candidate: &ActionCandidate<'_>) -> Result<Verification, CollaboratorError>;
}

/// One conversation topic; `subjects` are display names of the things the
/// topic is about (may be empty for free-floating topics).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicEntry {
    pub subjects: Vec<String>,
}

impl TopicEntry {
    pub fn about(subjects: &[&str]) -> Self {
        Self {
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Topics a recipient supports for one verb: its own and those of its
/// current state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicSets {
    pub base: Vec<TopicEntry>,
    pub current_state: Vec<TopicEntry>,
}

/// Topic tables keyed by verb and recipient.
pub trait TopicSource {
    /// `Ok(None)` when the recipient cannot hold a conversation at all.
    fn topics(
        &self,
        verb: &VerbDescriptor,
        recipient: &Entity,
    ) -> Result<Option<TopicSets>, CollaboratorError>;
}

/// Borrowed bundle of the three collaborators an engine run needs.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub scope: &'a dyn ScopeResolver,
    pub oracle: &'a dyn Oracle,
    pub topics: &'a dyn TopicSource,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        scope: &'a dyn ScopeResolver,
        oracle: &'a dyn Oracle,
        topics: &'a dyn TopicSource,
    ) -> Self {
        Self {
            scope,
            oracle,
            topics,
        }
    }

    /// All three roles played by one value (the usual case for a world model).
    pub fn of<W>(world: &'a W) -> Self
    where
        W: ScopeResolver + Oracle + TopicSource,
    {
        Self {
            scope: world,
            oracle: world,
            topics: world,
        }
    }
}
