//! # Reference World
//!
//! A small JSON-seeded simulation: rooms joined by exits, items that can be
//! carried, opened, locked or eaten, and characters with topic tables. It
//! plays all three collaborator roles for the affordance engine
//! ([`ScopeResolver`], [`Oracle`](crate::afford::Oracle) in [`rules`],
//! [`TopicSource`]) and executes commands through [`interp`].

pub mod errors;
pub mod interp;
pub mod resolve;
pub mod rules;
pub mod seed;
pub mod types;

pub use errors::WorldError;
pub use interp::{execute, Outcome};
pub use seed::{load_seed, WorldSeed};
pub use types::{Direction, Exit, Item, ItemFlag, Location, Npc, Room, Topic, TopicTable};

use std::path::Path;

use log::debug;

use crate::afford::{
    CollaboratorError, Entity, EntityId, ScopeResolver, TopicEntry, TopicSets, TopicSource,
    VerbDescriptor,
};

#[derive(Debug, Clone)]
pub struct World {
    pub title: String,
    pub intro: String,
    pub victory_item: Option<String>,
    pub victory_message: Option<String>,
    player: String,
    here: String,
    rooms: Vec<Room>,
    items: Vec<Item>,
    npcs: Vec<Npc>,
}

impl World {
    pub fn from_seed(seed: WorldSeed, player: &str) -> Result<Self, WorldError> {
        seed.check()?;
        Ok(Self {
            title: seed.title,
            intro: seed.intro,
            victory_item: seed.victory_item,
            victory_message: seed.victory_message,
            player: player.to_string(),
            here: seed.start,
            rooms: seed.rooms,
            items: seed.items,
            npcs: seed.npcs,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P, player: &str) -> Result<Self, WorldError> {
        let world = Self::from_seed(load_seed(&path)?, player)?;
        debug!(
            "Loaded world '{}': {} rooms, {} items, {} characters",
            world.title,
            world.rooms.len(),
            world.items.len(),
            world.npcs.len()
        );
        Ok(world)
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn here(&self) -> &str {
        &self.here
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.room(&self.here)
    }

    pub(crate) fn move_player(&mut self, room: &str) {
        self.here = room.to_string();
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub(crate) fn item_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn npc(&self, id: &str) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id == id)
    }

    pub(crate) fn npc_mut(&mut self, id: &str) -> Option<&mut Npc> {
        self.npcs.iter_mut().find(|n| n.id == id)
    }

    pub fn npcs_here(&self) -> impl Iterator<Item = &Npc> {
        self.npcs.iter().filter(move |n| n.location == self.here)
    }

    pub fn is_held(&self, id: &str) -> bool {
        self.item(id)
            .is_some_and(|i| self.carrier_chain_ends_in(&i.location, &Location::Player))
    }

    /// Items directly inside `container`.
    pub fn contents(&self, container: &str) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|i| matches!(&i.location, Location::Inside(c) if c == container))
            .collect()
    }

    /// Items at `location` plus, recursively, the contents of any open
    /// containers among them.
    fn reachable_from(&self, location: &Location) -> Vec<&Item> {
        let mut found = Vec::new();
        for item in self.items.iter().filter(|i| &i.location == location) {
            found.push(item);
            self.push_open_contents(item, &mut found, 0);
        }
        found
    }

    fn push_open_contents<'a>(&'a self, item: &'a Item, found: &mut Vec<&'a Item>, depth: usize) {
        if !item.has(ItemFlag::Container) || !item.open || depth > 8 {
            return;
        }
        for inner in self.contents(&item.id) {
            found.push(inner);
            self.push_open_contents(inner, found, depth + 1);
        }
    }

    pub fn items_here(&self) -> Vec<&Item> {
        self.reachable_from(&Location::Room(self.here.clone()))
    }

    pub fn inventory(&self) -> Vec<&Item> {
        self.reachable_from(&Location::Player)
    }

    /// Whether the item can be touched: in the room or held, and not shut
    /// away in a closed container.
    pub fn is_reachable(&self, id: &str) -> bool {
        self.items_here()
            .iter()
            .chain(self.inventory().iter())
            .any(|i| i.id == id)
    }

    fn carrier_chain_ends_in(&self, location: &Location, target: &Location) -> bool {
        let mut current = location.clone();
        for _ in 0..16 {
            if &current == target {
                return true;
            }
            match &current {
                Location::Inside(container) => match self.item(container) {
                    Some(c) => current = c.location.clone(),
                    None => return false,
                },
                _ => return false,
            }
        }
        false
    }

    pub fn entity(&self, id: &str) -> Option<Entity> {
        if let Some(room) = self.room(id) {
            return Some(Entity::new(&room.id, &room.name));
        }
        if let Some(item) = self.item(id) {
            return Some(Entity::new(&item.id, &item.name));
        }
        self.npc(id).map(|n| Entity::new(&n.id, &n.name))
    }

    /// Obvious exits from the current room, in seed order.
    pub fn obvious_exits(&self) -> Vec<Direction> {
        self.current_room()
            .map(|r| {
                r.exits
                    .iter()
                    .filter(|e| e.obvious)
                    .map(|e| e.direction)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Room name, description, visible things and exits. With `markup`, the
    /// name is bold and exits are direction links.
    pub fn describe_room(&self, markup: bool) -> String {
        let Some(room) = self.current_room() else {
            return "You are nowhere at all.\n".to_string();
        };
        let mut out = String::new();
        if markup {
            out.push_str(&format!("<b>{}</b>\n", room.name));
        } else {
            out.push_str(&format!("{}\n", room.name));
        }
        out.push_str(&room.description);
        out.push('\n');

        let visible: Vec<&str> = self
            .items_here()
            .into_iter()
            .filter(|i| !i.has(ItemFlag::Scenery))
            .map(|i| i.name.as_str())
            .collect();
        if !visible.is_empty() {
            out.push_str(&format!("You see {} here.\n", list_with_articles(&visible)));
        }
        for npc in self.npcs_here() {
            out.push_str(&format!("{} is here.\n", capitalize(&with_article(&npc.name))));
        }

        let exits = self.obvious_exits();
        if exits.is_empty() {
            out.push_str("There are no obvious exits.\n");
        } else {
            let names: Vec<String> = exits
                .iter()
                .map(|d| {
                    if markup {
                        format!("<a href=\"{}\">{}</a>", d.link_target(), d.name())
                    } else {
                        d.name().to_string()
                    }
                })
                .collect();
            out.push_str(&format!("Exits: {}.\n", names.join(", ")));
        }
        out
    }

    fn check_actor(&self, actor: &str) -> Result<(), CollaboratorError> {
        if actor == self.player {
            Ok(())
        } else {
            Err(CollaboratorError::scope(format!("unknown actor '{}'", actor)))
        }
    }
}

impl ScopeResolver for World {
    fn scope(&self, actor: &str) -> Result<Vec<Entity>, CollaboratorError> {
        self.check_actor(actor)?;
        let room = self
            .current_room()
            .ok_or_else(|| CollaboratorError::scope(format!("no room '{}'", self.here)))?;
        let mut scope = vec![Entity::new(&room.id, &room.name)];
        scope.extend(self.items_here().iter().map(|i| Entity::new(&i.id, &i.name)));
        scope.extend(self.npcs_here().map(|n| Entity::new(&n.id, &n.name)));
        scope.extend(self.inventory().iter().map(|i| Entity::new(&i.id, &i.name)));
        Ok(scope)
    }

    fn location(&self, actor: &str) -> Result<Option<EntityId>, CollaboratorError> {
        self.check_actor(actor)?;
        Ok(Some(self.here.clone()))
    }

    fn visible_exits(&self, actor: &str) -> Result<Vec<String>, CollaboratorError> {
        self.check_actor(actor)?;
        Ok(self
            .obvious_exits()
            .into_iter()
            .map(|d| d.name().to_string())
            .collect())
    }
}

impl TopicSource for World {
    fn topics(
        &self,
        verb: &VerbDescriptor,
        recipient: &Entity,
    ) -> Result<Option<TopicSets>, CollaboratorError> {
        let Some(npc) = self.npc(&recipient.id) else {
            return Ok(None);
        };
        let Some(base) = npc.topics.for_verb(&verb.id) else {
            return Ok(None);
        };
        let entries = |topics: &[Topic]| -> Vec<TopicEntry> {
            topics
                .iter()
                .map(|t| TopicEntry {
                    subjects: t.subjects.clone(),
                })
                .collect()
        };
        let current_state = npc
            .state_topics()
            .and_then(|t| t.for_verb(&verb.id))
            .map(entries)
            .unwrap_or_default();
        Ok(Some(TopicSets {
            base: entries(base),
            current_state,
        }))
    }
}

pub(crate) fn with_article(name: &str) -> String {
    let article = match name.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    };
    format!("{} {}", article, name)
}

pub(crate) fn list_with_articles(names: &[&str]) -> String {
    let parts: Vec<String> = names.iter().map(|n| with_article(n)).collect();
    match parts.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
