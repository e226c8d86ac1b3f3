use log::debug;

use super::collab::Collaborators;
use super::errors::AffordanceError;
use super::registry::VerbRegistry;
use super::scope::{merge_topics, ScopeFilter};
use super::types::{
    ActionCandidate, AffordanceRecord, Entity, Participant, VerbDescriptor, VerbKind,
};
use super::verdict::{Verdict, VerdictPolicy};
use crate::config::AffordanceConfig;

/// # Affordance Engine
///
/// Enumerates every action the actor could currently attempt, by probing the
/// oracle across the verb × object × object space of the registry and the
/// filtered scope.
///
/// Per verb kind:
///
/// - **intransitive**: one probe with no objects
/// - **travel**: no probe; one record listing the visible exit directions
/// - **transitive**: one probe per scope object, batched into a strong and a
///   weak record
/// - **topic**: per conversational recipient, one record with its topic list
/// - **ditransitive**: full direct × indirect cross product, up to two
///   records per direct object
/// - **indeterminate**: skipped
///
/// Records never carry an empty object list and strong/weak partitions are
/// never merged. The computation is all-or-nothing: a collaborator failure
/// aborts it with [`AffordanceError`].
pub struct AffordanceEngine<'a> {
    registry: &'a VerbRegistry,
    filter: ScopeFilter,
    policy: VerdictPolicy,
    first_subject_only: bool,
}

#[derive(Default)]
struct Partition {
    strong: Vec<Participant>,
    weak: Vec<Participant>,
}

impl Partition {
    fn push(&mut self, verdict: Verdict, who: &Entity) {
        match verdict {
            Verdict::Denied => {}
            Verdict::Strong(_) => self.strong.push(Participant::Entity(who.clone())),
            Verdict::Weak(_) => self.weak.push(Participant::Entity(who.clone())),
        }
    }
}

impl<'a> AffordanceEngine<'a> {
    pub fn new(registry: &'a VerbRegistry, config: &AffordanceConfig) -> Self {
        Self {
            registry,
            filter: ScopeFilter::from_config(config),
            policy: VerdictPolicy {
                non_obvious_is_obvious: config.non_obvious_is_obvious,
            },
            first_subject_only: config.single_subject_per_topic,
        }
    }

    pub fn registry(&self) -> &VerbRegistry {
        self.registry
    }

    /// Scope objects eligible for affordances, after filtering.
    pub fn objects_in_scope(
        &self,
        actor: &str,
        world: Collaborators<'_>,
    ) -> Result<Vec<Entity>, AffordanceError> {
        Ok(self.filter.objects_in_scope(actor, world.scope)?)
    }

    /// Names of [`Self::objects_in_scope`], in scope order.
    pub fn object_names(
        &self,
        actor: &str,
        world: Collaborators<'_>,
    ) -> Result<Vec<String>, AffordanceError> {
        Ok(self
            .objects_in_scope(actor, world)?
            .iter()
            .filter_map(|e| e.display_name().map(str::to_string))
            .collect())
    }

    pub fn compute(
        &self,
        actor: &str,
        world: Collaborators<'_>,
    ) -> Result<Vec<AffordanceRecord>, AffordanceError> {
        let objects = self.objects_in_scope(actor, world)?;
        let mut records = Vec::new();
        for verb in self.registry.iter() {
            match verb.kind {
                VerbKind::Intransitive => self.intransitive(actor, verb, world, &mut records)?,
                VerbKind::Travel => self.travel(actor, verb, world, &mut records)?,
                VerbKind::Transitive => {
                    self.transitive(actor, verb, &objects, world, &mut records)?
                }
                VerbKind::Topic => self.topics(verb, &objects, world, &mut records)?,
                VerbKind::Ditransitive => {
                    self.ditransitive(actor, verb, &objects, world, &mut records)?
                }
                VerbKind::Indeterminate => {
                    debug!("Skipping verb '{}': arity cannot be enumerated", verb.id);
                }
            }
        }
        debug!(
            "Computed {} affordances over {} scope objects for '{}'",
            records.len(),
            objects.len(),
            actor
        );
        Ok(records)
    }

    fn verdict(
        &self,
        world: Collaborators<'_>,
        candidate: &ActionCandidate<'_>,
    ) -> Result<Verdict, AffordanceError> {
        let verification = world.oracle.verify(candidate)?;
        Ok(self.policy.classify(&verification))
    }

    fn intransitive(
        &self,
        actor: &str,
        verb: &VerbDescriptor,
        world: Collaborators<'_>,
        out: &mut Vec<AffordanceRecord>,
    ) -> Result<(), AffordanceError> {
        let verdict = self.verdict(world, &ActionCandidate::bare(actor, verb))?;
        if !verdict.is_denied() {
            out.push(AffordanceRecord {
                verb: verb.clone(),
                primary: Vec::new(),
                secondary: None,
                weak: verdict.is_weak(),
            });
        }
        Ok(())
    }

    fn travel(
        &self,
        actor: &str,
        verb: &VerbDescriptor,
        world: Collaborators<'_>,
        out: &mut Vec<AffordanceRecord>,
    ) -> Result<(), AffordanceError> {
        let exits = world.scope.visible_exits(actor)?;
        if !exits.is_empty() {
            out.push(AffordanceRecord {
                verb: verb.clone(),
                primary: exits.into_iter().map(Participant::Direction).collect(),
                secondary: None,
                weak: false,
            });
        }
        Ok(())
    }

    fn transitive(
        &self,
        actor: &str,
        verb: &VerbDescriptor,
        objects: &[Entity],
        world: Collaborators<'_>,
        out: &mut Vec<AffordanceRecord>,
    ) -> Result<(), AffordanceError> {
        let mut partition = Partition::default();
        for obj in objects {
            let candidate = ActionCandidate::bare(actor, verb).with_direct(obj);
            partition.push(self.verdict(world, &candidate)?, obj);
        }
        for (list, weak) in [(partition.strong, false), (partition.weak, true)] {
            if !list.is_empty() {
                out.push(AffordanceRecord {
                    verb: verb.clone(),
                    primary: list,
                    secondary: None,
                    weak,
                });
            }
        }
        Ok(())
    }

    fn topics(
        &self,
        verb: &VerbDescriptor,
        objects: &[Entity],
        world: Collaborators<'_>,
        out: &mut Vec<AffordanceRecord>,
    ) -> Result<(), AffordanceError> {
        for recipient in objects {
            let Some(sets) = world.topics.topics(verb, recipient)? else {
                continue;
            };
            let names = merge_topics(&sets, self.first_subject_only);
            if !names.is_empty() {
                out.push(AffordanceRecord {
                    verb: verb.clone(),
                    primary: vec![Participant::Entity(recipient.clone())],
                    secondary: Some(names.into_iter().map(Participant::Topic).collect()),
                    weak: false,
                });
            }
        }
        Ok(())
    }

    fn ditransitive(
        &self,
        actor: &str,
        verb: &VerbDescriptor,
        objects: &[Entity],
        world: Collaborators<'_>,
        out: &mut Vec<AffordanceRecord>,
    ) -> Result<(), AffordanceError> {
        for direct in objects {
            let mut partition = Partition::default();
            for indirect in objects {
                let candidate = ActionCandidate::bare(actor, verb)
                    .with_direct(direct)
                    .with_indirect(indirect);
                partition.push(self.verdict(world, &candidate)?, indirect);
            }
            for (list, weak) in [(partition.strong, false), (partition.weak, true)] {
                if !list.is_empty() {
                    out.push(AffordanceRecord {
                        verb: verb.clone(),
                        primary: vec![Participant::Entity(direct.clone())],
                        secondary: Some(list),
                        weak,
                    });
                }
            }
        }
        Ok(())
    }
}
