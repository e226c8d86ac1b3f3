//! World seed loading.
//!
//! A seed is a single JSON document so a story can be changed without
//! recompiling:
//!
//! ```json
//! {
//!   "title": "The Troll Bridge",
//!   "intro": "You wake beside a river.",
//!   "start": "meadow",
//!   "victory_item": "crown",
//!   "rooms": [{"id": "meadow", "name": "Meadow", "description": "...", "exits": []}],
//!   "items": [],
//!   "npcs": []
//! }
//! ```
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::WorldError;
use super::types::{Item, Location, Npc, Room};
use crate::validation::{secure_json_parse, validate_file_size};

const MAX_SEED_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSeed {
    pub title: String,
    #[serde(default)]
    pub intro: String,
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victory_item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victory_message: Option<String>,
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub npcs: Vec<Npc>,
}

impl WorldSeed {
    pub fn from_json(content: &str, origin: &str) -> Result<Self, WorldError> {
        let seed: WorldSeed =
            secure_json_parse(content, MAX_SEED_BYTES).map_err(|source| WorldError::Parse {
                path: origin.to_string(),
                source,
            })?;
        seed.check()?;
        Ok(seed)
    }

    /// Check ids are unique and every reference resolves.
    pub fn check(&self) -> Result<(), WorldError> {
        let mut ids = HashSet::new();
        let all_ids = self
            .rooms
            .iter()
            .map(|r| &r.id)
            .chain(self.items.iter().map(|i| &i.id))
            .chain(self.npcs.iter().map(|n| &n.id));
        for id in all_ids {
            if !ids.insert(id.as_str()) {
                return Err(WorldError::DuplicateId(id.clone()));
            }
        }

        let rooms: HashSet<&str> = self.rooms.iter().map(|r| r.id.as_str()).collect();
        let items: HashSet<&str> = self.items.iter().map(|i| i.id.as_str()).collect();
        let dangling = |kind, id: &str, by: &str| WorldError::Dangling {
            kind,
            id: id.to_string(),
            referenced_by: by.to_string(),
        };

        if !rooms.contains(self.start.as_str()) {
            return Err(dangling("room", &self.start, "start"));
        }
        for room in &self.rooms {
            for exit in &room.exits {
                if !rooms.contains(exit.to.as_str()) {
                    return Err(dangling("room", &exit.to, &room.id));
                }
            }
        }
        for item in &self.items {
            match &item.location {
                Location::Room(id) if !rooms.contains(id.as_str()) => {
                    return Err(dangling("room", id, &item.id))
                }
                Location::Inside(id) if !items.contains(id.as_str()) => {
                    return Err(dangling("item", id, &item.id))
                }
                _ => {}
            }
            if let Some(target) = &item.key_for {
                if !items.contains(target.as_str()) {
                    return Err(dangling("item", target, &item.id));
                }
            }
        }
        for npc in &self.npcs {
            if !rooms.contains(npc.location.as_str()) {
                return Err(dangling("room", &npc.location, &npc.id));
            }
        }
        if let Some(victory) = &self.victory_item {
            if !items.contains(victory.as_str()) {
                return Err(dangling("item", victory, "victory_item"));
            }
        }
        Ok(())
    }
}

/// Load a world seed from disk
pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<WorldSeed, WorldError> {
    let path = path.as_ref();
    let meta = fs::metadata(path)?;
    validate_file_size(meta.len(), MAX_SEED_BYTES as u64).map_err(|source| WorldError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    let contents = fs::read_to_string(path)?;
    WorldSeed::from_json(&contents, &path.display().to_string())
}
