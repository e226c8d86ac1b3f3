use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Direction {
    pub const ALL: [Direction; 10] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
        Direction::Northeast,
        Direction::Northwest,
        Direction::Southeast,
        Direction::Southwest,
    ];

    /// Lowercase keyword, as typed by players.
    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Northeast => "northeast",
            Direction::Northwest => "northwest",
            Direction::Southeast => "southeast",
            Direction::Southwest => "southwest",
        }
    }

    /// Capitalised link target used in room descriptions.
    pub fn link_target(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Northeast => "Northeast",
            Direction::Northwest => "Northwest",
            Direction::Southeast => "Southeast",
            Direction::Southwest => "Southwest",
        }
    }

    /// Full names and the usual abbreviations.
    pub fn parse(word: &str) -> Option<Direction> {
        let d = match word.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Direction::North,
            "s" | "south" => Direction::South,
            "e" | "east" => Direction::East,
            "w" | "west" => Direction::West,
            "u" | "up" => Direction::Up,
            "d" | "down" => Direction::Down,
            "ne" | "northeast" => Direction::Northeast,
            "nw" | "northwest" => Direction::Northwest,
            "se" | "southeast" => Direction::Southeast,
            "sw" | "southwest" => Direction::Southwest,
            _ => return None,
        };
        Some(d)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exit {
    pub direction: Direction,
    pub to: String,
    /// Hidden exits still work but are never listed or offered.
    #[serde(default = "default_true")]
    pub obvious: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub exits: Vec<Exit>,
}

impl Room {
    pub fn exit(&self, direction: Direction) -> Option<&Exit> {
        self.exits.iter().find(|e| e.direction == direction)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemFlag {
    /// Cannot be picked up.
    Fixed,
    /// Background detail; also fixed.
    Scenery,
    Container,
    Edible,
    Key,
    Dangerous,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Room(String),
    Player,
    Inside(String),
    Nowhere,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub flags: Vec<ItemFlag>,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub locked: bool,
    /// For keys: the container this key unlocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_for: Option<String>,
    pub location: Location,
}

impl Item {
    pub fn has(&self, flag: ItemFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_portable(&self) -> bool {
        !self.has(ItemFlag::Fixed) && !self.has(ItemFlag::Scenery)
    }
}

/// One conversation entry. `subjects` are offered to players as topics;
/// `keywords` only help match what they type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topic {
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_state: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicTable {
    #[serde(default)]
    pub ask: Vec<Topic>,
    #[serde(default)]
    pub tell: Vec<Topic>,
    #[serde(default)]
    pub show: Vec<Topic>,
    #[serde(default)]
    pub give: Vec<Topic>,
    #[serde(default)]
    pub ask_for: Vec<Topic>,
}

impl TopicTable {
    /// The table a verb consults, if it is a conversational verb.
    pub fn for_verb(&self, verb_id: &str) -> Option<&[Topic]> {
        let table = match verb_id {
            "ask_about" => &self.ask,
            "tell_about" => &self.tell,
            "show_to" => &self.show,
            "give_to" => &self.give,
            "ask_for" => &self.ask_for,
            _ => return None,
        };
        Some(table)
    }
}

/// An exit a character refuses to let the player use until it reaches
/// one of `until_states`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub direction: Direction,
    #[serde(default)]
    pub until_states: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub topics: TopicTable,
    #[serde(default)]
    pub states: HashMap<String, TopicTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_reply: Option<String>,
}

impl Npc {
    pub fn state_topics(&self) -> Option<&TopicTable> {
        self.state.as_ref().and_then(|s| self.states.get(s))
    }

    /// Whether the character currently stops the player going `direction`.
    pub fn blocks(&self, direction: Direction) -> Option<&Block> {
        let block = self.blocks.as_ref()?;
        if block.direction != direction {
            return None;
        }
        match &self.state {
            Some(state) if block.until_states.contains(state) => None,
            _ => Some(block),
        }
    }

    /// First topic for `verb_id` matching `query`, current state first.
    pub fn find_topic(&self, verb_id: &str, query: &str) -> Option<&Topic> {
        let state = self.state_topics().and_then(|t| t.for_verb(verb_id));
        let base = self.topics.for_verb(verb_id);
        state
            .into_iter()
            .chain(base)
            .flatten()
            .find(|topic| {
                topic
                    .subjects
                    .iter()
                    .chain(topic.keywords.iter())
                    .any(|s| super::resolve::name_matches(query, s))
            })
    }
}
