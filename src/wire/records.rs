use serde::{Deserialize, Serialize};

use crate::afford::AffordanceRecord;

/// One slot of the positional `affordance` array: a verb or preposition
/// word, or a list of participant names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireSlot {
    Word(String),
    List(Vec<String>),
}

/// An affordance record as the client sees it:
/// `{"affordance": [verb, [objects], prep?, [secondary]?], "weak": true?, "order": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAffordance {
    pub affordance: Vec<WireSlot>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub weak: bool,
    pub order: i32,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl WireAffordance {
    pub fn from_record(record: &AffordanceRecord) -> Self {
        let mut affordance = vec![WireSlot::Word(record.verb.name.clone())];
        if !record.primary.is_empty() {
            affordance.push(WireSlot::List(record.primary_names()));
        }
        if let Some(secondary) = record.secondary_names() {
            if let Some(prep) = &record.verb.preposition {
                affordance.push(WireSlot::Word(prep.clone()));
            }
            affordance.push(WireSlot::List(secondary));
        }
        Self {
            affordance,
            weak: record.weak,
            order: record.verb.order,
        }
    }

    pub fn verb(&self) -> Option<&str> {
        match self.affordance.first() {
            Some(WireSlot::Word(w)) => Some(w),
            _ => None,
        }
    }

    pub fn objects(&self) -> Option<&[String]> {
        match self.affordance.get(1) {
            Some(WireSlot::List(l)) => Some(l),
            _ => None,
        }
    }

    pub fn preposition(&self) -> Option<&str> {
        match self.affordance.get(2) {
            Some(WireSlot::Word(w)) => Some(w),
            _ => None,
        }
    }

    pub fn secondary(&self) -> Option<&[String]> {
        match self.affordance.last() {
            Some(WireSlot::List(l)) if self.affordance.len() > 2 => Some(l),
            _ => None,
        }
    }
}

/// The JSON carried in a reply's footer script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Footer {
    Turn {
        affordances: Vec<WireAffordance>,
        objects: Vec<String>,
    },
    GameOver {
        #[serde(rename = "gameOver")]
        game_over: bool,
    },
}

impl Footer {
    pub fn turn(records: &[AffordanceRecord], objects: &[String]) -> Self {
        Footer::Turn {
            affordances: records.iter().map(WireAffordance::from_record).collect(),
            objects: objects.to_vec(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, Footer::GameOver { game_over: true })
    }
}
