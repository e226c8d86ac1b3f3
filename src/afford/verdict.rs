//! Verdicts and the mapping from raw oracle verifications to them.
//!
//! The oracle reports either no objection at all or its most limiting
//! objection (a class plus a signed rank). [`VerdictPolicy::classify`] turns
//! that into a [`Verdict`]:
//!
//! - no objection: `Strong(1)`
//! - logical: `Strong(rank)`, with ranks <= 0 lifted to 1
//! - illogical, illogical-self, inaccessible: `Denied`
//! - anything else: `Weak`, with rank `r >= 0` becoming `r + 1` and negative
//!   ranks keeping their magnitude
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Tri-state verdict for one action candidate.
///
/// Ranks are always >= 1. The engine only partitions on the tag; the rank is
/// kept as an ordering hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Denied,
    Strong(u32),
    Weak(u32),
}

impl Verdict {
    pub fn is_denied(&self) -> bool {
        matches!(self, Verdict::Denied)
    }

    pub fn is_weak(&self) -> bool {
        matches!(self, Verdict::Weak(_))
    }

    /// Signed form: positive for strong, negative for weak, zero for denied.
    pub fn signed_rank(&self) -> i64 {
        match *self {
            Verdict::Denied => 0,
            Verdict::Strong(r) => i64::from(r),
            Verdict::Weak(r) => -i64::from(r),
        }
    }

    fn tag(&self) -> u8 {
        match self {
            Verdict::Denied => 0,
            Verdict::Weak(_) => 1,
            Verdict::Strong(_) => 2,
        }
    }

    fn rank(&self) -> u32 {
        match *self {
            Verdict::Denied => 0,
            Verdict::Strong(r) | Verdict::Weak(r) => r,
        }
    }
}

impl PartialOrd for Verdict {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Verdict {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag()
            .cmp(&other.tag())
            .then_with(|| self.rank().cmp(&other.rank()))
    }
}

/// Class of an objection raised while verifying an action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObjectionClass {
    /// Clearly afforded, possibly with a lowered rank.
    Logical,
    /// Obviously dangerous.
    Dangerous,
    /// Not possible now but could be later.
    IllogicalNow,
    /// Would only reproduce the current state.
    IllogicalAlready,
    /// Logical, but not something a player would think of.
    NonObvious,
    /// Never sensible.
    Illogical,
    /// Using an object on itself.
    IllogicalSelf,
    /// A required object cannot be reached.
    Inaccessible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Objection {
    pub class: ObjectionClass,
    pub rank: i32,
}

impl Objection {
    pub fn new(class: ObjectionClass, rank: i32) -> Self {
        Self { class, rank }
    }
}

/// What the oracle reports for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    NoObjection,
    Objection(Objection),
}

impl Verification {
    pub fn objection(class: ObjectionClass, rank: i32) -> Self {
        Verification::Objection(Objection::new(class, rank))
    }
}

/// Knobs that influence how objections are classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerdictPolicy {
    /// Treat non-obvious actions as clearly afforded.
    pub non_obvious_is_obvious: bool,
}

impl VerdictPolicy {
    pub fn classify(&self, verification: &Verification) -> Verdict {
        let objection = match verification {
            Verification::NoObjection => return Verdict::Strong(1),
            Verification::Objection(o) => o,
        };
        match objection.class {
            ObjectionClass::Inaccessible
            | ObjectionClass::Illogical
            | ObjectionClass::IllogicalSelf => Verdict::Denied,
            ObjectionClass::Logical => strong(objection.rank),
            ObjectionClass::NonObvious if self.non_obvious_is_obvious => strong(objection.rank),
            _ => weak(objection.rank),
        }
    }
}

fn strong(rank: i32) -> Verdict {
    Verdict::Strong(if rank <= 0 { 1 } else { rank.unsigned_abs() })
}

fn weak(rank: i32) -> Verdict {
    if rank >= 0 {
        Verdict::Weak(rank.unsigned_abs().saturating_add(1))
    } else {
        Verdict::Weak(rank.unsigned_abs())
    }
}
