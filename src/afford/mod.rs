//! # Affordance Engine
//!
//! Discovers, for the current world state, every action a player could
//! currently attempt, split into strong (would succeed outright) and weak
//! (conditional or non-obvious) affordances.
//!
//! ## Components
//!
//! - [`types`] - verbs, entities, action candidates and affordance records
//! - [`verdict`] - the tri-state verdict and the objection mapping rule
//! - [`collab`] - traits for the simulation's scope resolver, oracle and topic tables
//! - [`registry`] - the verb registry built from configuration
//! - [`scope`] - scope filtering and topic merging
//! - [`engine`] - the enumeration itself
//!
//! ## Usage
//!
//! ```rust,ignore
//! let registry = VerbRegistry::from_config(&config);
//! let engine = AffordanceEngine::new(&registry, &config.affordances);
//! let records = engine.compute("player", Collaborators::of(&world))?;
//! ```

pub mod collab;
pub mod engine;
pub mod errors;
pub mod registry;
pub mod scope;
pub mod types;
pub mod verdict;

pub use collab::{Collaborators, Oracle, ScopeResolver, TopicEntry, TopicSets, TopicSource};
pub use engine::AffordanceEngine;
pub use errors::{AffordanceError, CollaboratorError};
pub use registry::VerbRegistry;
pub use scope::{merge_topics, ScopeFilter};
pub use types::{
    ActionCandidate, AffordanceRecord, Entity, EntityId, Participant, VerbDescriptor, VerbKind,
};
pub use verdict::{Objection, ObjectionClass, Verdict, VerdictPolicy, Verification};
