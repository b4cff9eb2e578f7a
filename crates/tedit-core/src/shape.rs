//! Argument-shape resolution
//!
//! A trigger carries one overloaded integer argument (`narg`) and one
//! optional string argument. What they mean depends on which event types
//! are set: a Random trigger reads `narg` as a percentage, a Bribe trigger
//! as a cost, a Speech trigger as a phrase/wordlist selector, and so on.

use crate::attach::{AttachKind, EventMask};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Argument shapes a trigger's event types give meaning to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ArgShape: u8 {
        /// `narg` is a 0-100 chance to fire
        const PERCENT = 1 << 0;
        /// `narg` selects phrase or wordlist matching of the string
        const PHRASE_OR_WORDLIST = 1 << 1;
        /// `narg` is a set of object locations
        const OBJ_WHERE = 1 << 2;
        /// the string is a command word
        const COMMAND = 1 << 3;
        /// `narg` is a non-negative coin cost
        const COST = 1 << 4;
    }
}

impl ArgShape {
    /// Shapes that give `narg` a specific meaning
    pub const NARG_ROLES: ArgShape = ArgShape::PERCENT
        .union(ArgShape::PHRASE_OR_WORDLIST)
        .union(ArgShape::OBJ_WHERE)
        .union(ArgShape::COST);

    /// Shapes that use the string argument
    pub const STRING_ROLES: ArgShape = ArgShape::COMMAND
        .union(ArgShape::PHRASE_OR_WORDLIST)
        .union(ArgShape::OBJ_WHERE);

    /// Whether the string argument means anything
    pub fn uses_string(&self) -> bool {
        self.intersects(Self::STRING_ROLES)
    }

    /// Whether `narg` is a free numeric argument (no specific role)
    pub fn free_narg(&self) -> bool {
        !self.intersects(Self::NARG_ROLES)
    }
}

/// Resolve the argument shapes for a kind and event-type mask.
///
/// Pure: the result depends only on the inputs, so callers recompute it
/// whenever they need it. Bits beyond the kind's table contribute nothing.
pub fn resolve_arg_shape(kind: AttachKind, types: EventMask) -> ArgShape {
    let table = kind.event_types();
    types
        .positions()
        .filter_map(|pos| table.get(pos))
        .fold(ArgShape::empty(), |acc, ev| acc | ev.shape)
}

bitflags! {
    /// Where an object must be for a command trigger to match
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ObjWhere: i32 {
        const EQUIPMENT = 1 << 0;
        const INVENTORY = 1 << 1;
        const ROOM = 1 << 2;
    }
}

impl ObjWhere {
    /// Author-facing names, in bit order
    pub const NAMES: [(&'static str, ObjWhere); 3] = [
        ("equipment", ObjWhere::EQUIPMENT),
        ("inventory", ObjWhere::INVENTORY),
        ("room", ObjWhere::ROOM),
    ];

    /// Comma-separated names, or "none"
    pub fn describe(&self) -> String {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    }
}

/// How a speech/act trigger matches its string argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhraseKind {
    Phrase = 0,
    Wordlist = 1,
}

impl PhraseKind {
    pub const ALL: [PhraseKind; 2] = [PhraseKind::Phrase, PhraseKind::Wordlist];

    pub fn name(&self) -> &'static str {
        match self {
            PhraseKind::Phrase => "phrase",
            PhraseKind::Wordlist => "wordlist",
        }
    }

    /// Interpret a stored `narg`
    pub fn from_narg(narg: i32) -> Option<Self> {
        match narg {
            0 => Some(PhraseKind::Phrase),
            1 => Some(PhraseKind::Wordlist),
            _ => None,
        }
    }
}

impl fmt::Display for PhraseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
