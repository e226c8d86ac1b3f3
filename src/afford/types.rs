use serde::{Deserialize, Serialize};

/// Identifier of a world entity as known to the collaborators.
pub type EntityId = String;

/// How a verb's participants are enumerated.
///
/// The kind fixes the verb's arity: intransitive verbs take no object,
/// travel and transitive verbs one (travel objects are directions), topic
/// and ditransitive verbs two. `Indeterminate` verbs cannot be enumerated and
/// are skipped by the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VerbKind {
    Intransitive,
    Travel,
    Transitive,
    Topic,
    Ditransitive,
    Indeterminate,
}

impl VerbKind {
    /// Number of participants including the actor's action slot:
    /// 0 for no-object verbs, 2 for one object, 3 for two objects.
    pub fn arity(self) -> Option<u8> {
        match self {
            VerbKind::Intransitive => Some(0),
            VerbKind::Travel | VerbKind::Transitive => Some(2),
            VerbKind::Topic | VerbKind::Ditransitive => Some(3),
            VerbKind::Indeterminate => None,
        }
    }
}

/// A registered verb. Immutable once the registry is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerbDescriptor {
    pub id: String,
    /// Name shown to the player and sent on the wire.
    pub name: String,
    /// Author-assigned sort key, only used for client-side grouping.
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preposition: Option<String>,
    pub kind: VerbKind,
}

impl VerbDescriptor {
    pub fn new(id: &str, name: &str, order: i32, kind: VerbKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            order,
            preposition: None,
            kind,
        }
    }

    pub fn with_preposition(mut self, preposition: &str) -> Self {
        self.preposition = Some(preposition.to_string());
        self
    }

    pub fn arity(&self) -> Option<u8> {
        self.kind.arity()
    }
}

/// Something the actor can currently perceive or reach.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    pub id: EntityId,
    pub name: Option<String>,
}

impl Entity {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Some(name.to_string()),
        }
    }

    pub fn unnamed(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
        }
    }

    /// The name if it is present and non-empty. Entities without one never
    /// take part in an affordance.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// One probe of the oracle: the actor trying `verb` with up to two objects.
#[derive(Debug, Clone, Copy)]
pub struct ActionCandidate<'a> {
    pub actor: &'a str,
    pub verb: &'a VerbDescriptor,
    pub direct: Option<&'a Entity>,
    pub indirect: Option<&'a Entity>,
}

impl<'a> ActionCandidate<'a> {
    pub fn bare(actor: &'a str, verb: &'a VerbDescriptor) -> Self {
        Self {
            actor,
            verb,
            direct: None,
            indirect: None,
        }
    }

    pub fn with_direct(mut self, direct: &'a Entity) -> Self {
        self.direct = Some(direct);
        self
    }

    pub fn with_indirect(mut self, indirect: &'a Entity) -> Self {
        self.indirect = Some(indirect);
        self
    }
}

/// A participant slot value in an affordance record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Participant {
    Entity(Entity),
    Direction(String),
    Topic(String),
}

impl Participant {
    pub fn name(&self) -> &str {
        match self {
            Participant::Entity(e) => e.display_name().unwrap_or(e.id.as_str()),
            Participant::Direction(d) => d,
            Participant::Topic(t) => t,
        }
    }
}

/// A currently valid action: verb plus participants, strong or weak.
///
/// Built fresh every turn. `primary` is empty only for intransitive verbs;
/// `secondary`, when present, is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffordanceRecord {
    pub verb: VerbDescriptor,
    pub primary: Vec<Participant>,
    pub secondary: Option<Vec<Participant>>,
    pub weak: bool,
}

impl AffordanceRecord {
    pub fn primary_names(&self) -> Vec<String> {
        self.primary.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn secondary_names(&self) -> Option<Vec<String>> {
        self.secondary
            .as_ref()
            .map(|s| s.iter().map(|p| p.name().to_string()).collect())
    }
}
