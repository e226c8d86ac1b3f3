//! Verify rules: how the reference world judges a candidate action before
//! anything is executed. Pure; never changes the world.
use crate::afford::{
    ActionCandidate, CollaboratorError, Entity, ObjectionClass, Oracle, Verification,
};

use super::types::{Item, ItemFlag};
use super::World;

use ObjectionClass::*;

/// What a participant turned out to be.
enum Thing<'a> {
    Room,
    Item(&'a Item),
    Npc,
    Missing,
}

impl World {
    fn thing(&self, entity: Option<&Entity>) -> Thing<'_> {
        let Some(entity) = entity else {
            return Thing::Missing;
        };
        if let Some(item) = self.item(&entity.id) {
            Thing::Item(item)
        } else if self.npc(&entity.id).is_some() {
            Thing::Npc
        } else if self.room(&entity.id).is_some() {
            Thing::Room
        } else {
            Thing::Missing
        }
    }

    /// Verify a candidate against the world's rules.
    pub fn judge(&self, candidate: &ActionCandidate<'_>) -> Verification {
        let direct = self.thing(candidate.direct);
        let indirect = self.thing(candidate.indirect);
        let same = match (candidate.direct, candidate.indirect) {
            (Some(a), Some(b)) => a.id == b.id,
            _ => false,
        };

        match candidate.verb.id.as_str() {
            "look" | "inventory" | "wait" | "go" => Verification::NoObjection,
            "examine" => match direct {
                Thing::Missing => refuse(Illogical),
                _ => Verification::NoObjection,
            },
            "take" => match direct {
                Thing::Item(item) => self.check_take(item),
                _ => refuse(Illogical),
            },
            "drop" => match direct {
                Thing::Item(item) if self.is_held(&item.id) => Verification::NoObjection,
                Thing::Item(item) if item.is_portable() => refuse(IllogicalNow),
                _ => refuse(Illogical),
            },
            "open" => match direct {
                Thing::Item(item) if item.has(ItemFlag::Container) => {
                    if item.open {
                        refuse(IllogicalAlready)
                    } else if item.locked {
                        refuse(IllogicalNow)
                    } else {
                        Verification::NoObjection
                    }
                }
                _ => refuse(Illogical),
            },
            "close" => match direct {
                Thing::Item(item) if item.has(ItemFlag::Container) => {
                    if item.open {
                        Verification::NoObjection
                    } else {
                        refuse(IllogicalAlready)
                    }
                }
                _ => refuse(Illogical),
            },
            "eat" => match direct {
                Thing::Item(item) if item.has(ItemFlag::Edible) => {
                    if self.is_held(&item.id) {
                        Verification::NoObjection
                    } else {
                        Verification::objection(Logical, 80)
                    }
                }
                _ => refuse(Illogical),
            },
            "attack" => match direct {
                Thing::Npc => Verification::objection(Dangerous, 0),
                _ => refuse(Illogical),
            },
            "put_in" => {
                if same {
                    return refuse(IllogicalSelf);
                }
                match (direct, indirect) {
                    (Thing::Item(item), Thing::Item(container))
                        if item.is_portable() && container.has(ItemFlag::Container) =>
                    {
                        if self.contents(&container.id).iter().any(|i| i.id == item.id) {
                            refuse(IllogicalAlready)
                        } else if !container.open {
                            refuse(IllogicalNow)
                        } else if self.is_held(&item.id) {
                            Verification::NoObjection
                        } else {
                            Verification::objection(Logical, 80)
                        }
                    }
                    _ => refuse(Illogical),
                }
            }
            "unlock_with" => {
                if same {
                    return refuse(IllogicalSelf);
                }
                match (direct, indirect) {
                    (Thing::Item(lock), Thing::Item(key))
                        if lock.has(ItemFlag::Container) && key.has(ItemFlag::Key) =>
                    {
                        if !lock.locked {
                            refuse(IllogicalAlready)
                        } else if key.key_for.as_deref() == Some(lock.id.as_str()) {
                            Verification::NoObjection
                        } else {
                            Verification::objection(NonObvious, 0)
                        }
                    }
                    _ => refuse(Illogical),
                }
            }
            "show_to" | "give_to" => {
                if same {
                    return refuse(IllogicalSelf);
                }
                match (direct, indirect, candidate.indirect) {
                    (Thing::Item(item), Thing::Npc, Some(who)) => {
                        if !self.is_held(&item.id) {
                            return refuse(IllogicalNow);
                        }
                        let interested = self
                            .npc(&who.id)
                            .and_then(|npc| npc.find_topic(&candidate.verb.id, &item.name))
                            .is_some();
                        if interested {
                            Verification::NoObjection
                        } else {
                            Verification::objection(NonObvious, 10)
                        }
                    }
                    _ => refuse(Illogical),
                }
            }
            "ask_about" | "tell_about" | "ask_for" => match direct {
                Thing::Npc => Verification::NoObjection,
                _ => refuse(Illogical),
            },
            _ => refuse(Illogical),
        }
    }

    fn check_take(&self, item: &Item) -> Verification {
        if self.is_held(&item.id) {
            refuse(IllogicalAlready)
        } else if !item.is_portable() {
            refuse(Illogical)
        } else if !self.is_reachable(&item.id) {
            refuse(Inaccessible)
        } else if item.has(ItemFlag::Dangerous) {
            Verification::objection(Dangerous, -20)
        } else {
            Verification::NoObjection
        }
    }
}

fn refuse(class: ObjectionClass) -> Verification {
    Verification::objection(class, 0)
}

impl Oracle for World {
    fn verify(&self, candidate: &ActionCandidate<'_>) -> Result<Verification, CollaboratorError> {
        if candidate.actor != self.player() {
            return Err(CollaboratorError::oracle(format!(
                "unknown actor '{}'",
                candidate.actor
            )));
        }
        Ok(self.judge(candidate))
    }
}
