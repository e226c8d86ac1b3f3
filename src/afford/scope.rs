//! Scope filtering and topic list assembly.
use std::collections::HashSet;

use super::collab::{ScopeResolver, TopicSets};
use super::errors::CollaboratorError;
use super::types::Entity;
use crate::config::AffordanceConfig;

/// Rules applied to the raw scope before any probing.
#[derive(Debug, Clone, Default)]
pub struct ScopeFilter {
    excluded: HashSet<String>,
    ignore_location: bool,
}

impl ScopeFilter {
    pub fn new<I, S>(excluded: I, ignore_location: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
            ignore_location,
        }
    }

    pub fn from_config(config: &AffordanceConfig) -> Self {
        Self::new(config.excluded.iter().cloned(), config.ignore_location)
    }

    /// Scope entities that may take part in affordances: not excluded scenery,
    /// not the actor's location (when configured), and carrying a name.
    pub fn objects_in_scope(
        &self,
        actor: &str,
        resolver: &dyn ScopeResolver,
    ) -> Result<Vec<Entity>, CollaboratorError> {
        let entities = resolver.scope(actor)?;
        let location = if self.ignore_location {
            resolver.location(actor)?
        } else {
            None
        };
        Ok(entities
            .into_iter()
            .filter(|e| !self.excluded.contains(&e.id))
            .filter(|e| location.as_deref() != Some(e.id.as_str()))
            .filter(|e| e.display_name().is_some())
            .collect())
    }
}

/// Flatten a recipient's topic tables into the names offered to the player.
///
/// Base topics come first, then the current state's. Topics without a
/// subject are dropped and repeated names keep their first position. With
/// `first_subject_only`, a topic covering several things contributes only its
/// first subject.
pub fn merge_topics(sets: &TopicSets, first_subject_only: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for entry in sets.base.iter().chain(sets.current_state.iter()) {
        let subjects = entry.subjects.iter().filter(|s| !s.is_empty());
        let limit = if first_subject_only { 1 } else { usize::MAX };
        for subject in subjects.take(limit) {
            if seen.insert(subject.clone()) {
                names.push(subject.clone());
            }
        }
    }
    names
}
