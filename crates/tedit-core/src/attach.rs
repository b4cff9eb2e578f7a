//! Attachment kinds and their event-type tables
//!
//! A trigger's event-type mask only has meaning relative to its attachment
//! kind: bit *n* of the mask selects entry *n* of that kind's table.

use crate::shape::ArgShape;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of entity a trigger attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttachKind {
    #[default]
    Mobile,
    Object,
    Room,
    RoomTemplate,
}

impl AttachKind {
    /// All kinds, in menu order
    pub const ALL: [AttachKind; 4] = [
        AttachKind::Mobile,
        AttachKind::Object,
        AttachKind::Room,
        AttachKind::RoomTemplate,
    ];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            AttachKind::Mobile => "Mobile",
            AttachKind::Object => "Object",
            AttachKind::Room => "Room",
            AttachKind::RoomTemplate => "Room Template",
        }
    }

    /// The ordered table of event types legal for this kind
    pub fn event_types(&self) -> &'static [EventType] {
        match self {
            AttachKind::Mobile => MOBILE_EVENTS,
            AttachKind::Object => OBJECT_EVENTS,
            // room templates spawn rooms, so they share the room table
            AttachKind::Room | AttachKind::RoomTemplate => ROOM_EVENTS,
        }
    }
}

impl fmt::Display for AttachKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of an event-type table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventType {
    /// Name shown to authors and used to toggle the bit
    pub name: &'static str,
    /// Argument shapes this event type gives meaning to
    pub shape: ArgShape,
}

const fn ev(name: &'static str, shape: ArgShape) -> EventType {
    EventType { name, shape }
}

const NONE: ArgShape = ArgShape::empty();
const PCT: ArgShape = ArgShape::PERCENT;
const CMD: ArgShape = ArgShape::COMMAND;
const PHRASE: ArgShape = ArgShape::PHRASE_OR_WORDLIST;
const COST: ArgShape = ArgShape::COST;

static MOBILE_EVENTS: &[EventType] = &[
    ev("Global", NONE),
    ev("Random", PCT),
    ev("Command", CMD),
    ev("Speech", PHRASE),
    ev("Act", PHRASE),
    ev("Death", PCT),
    ev("Greet", PCT),
    ev("Greet-All", PCT),
    ev("Entry", PCT),
    ev("Receive", PCT),
    ev("Fight", PCT),
    ev("HitPrcnt", PCT),
    ev("Bribe", COST),
    ev("Load", PCT),
    ev("Memory", PCT),
    ev("Ability", PCT),
    ev("Leave", PCT),
    ev("Door", PCT),
];

static OBJECT_EVENTS: &[EventType] = &[
    ev("Global", NONE),
    ev("Random", PCT),
    ev("Command", CMD.union(ArgShape::OBJ_WHERE)),
    ev("Timer", NONE),
    ev("Get", PCT),
    ev("Drop", PCT),
    ev("Give", PCT),
    ev("Wear", NONE),
    ev("Remove", NONE),
    ev("Load", PCT),
    ev("Ability", PCT),
    ev("Leave", PCT),
    ev("Consume", PCT),
];

static ROOM_EVENTS: &[EventType] = &[
    ev("Global", NONE),
    ev("Random", PCT),
    ev("Command", CMD),
    ev("Speech", PHRASE),
    ev("Reset", PCT),
    ev("Enter", PCT),
    ev("Drop", PCT),
    ev("Ability", PCT),
    ev("Leave", PCT),
    ev("Door", PCT),
];

/// Bitset of event types; bit positions index the attachment kind's table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventMask(u64);

impl EventMask {
    /// The empty mask
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from raw bits
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub fn bits(&self) -> u64 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Check whether the bit at `pos` is set
    pub fn has(&self, pos: usize) -> bool {
        pos < 64 && self.0 & (1 << pos) != 0
    }

    /// Set the bit at `pos`
    pub fn with(self, pos: usize) -> Self {
        if pos < 64 {
            Self(self.0 | (1 << pos))
        } else {
            self
        }
    }

    /// Flip the bit at `pos`
    pub fn toggle(&mut self, pos: usize) {
        if pos < 64 {
            self.0 ^= 1 << pos;
        }
    }

    /// Positions of the set bits, lowest first
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..64).filter(move |pos| self.has(*pos))
    }

    /// Names of the set bits under `kind`, skipping bits the table lacks
    pub fn names(&self, kind: AttachKind) -> Vec<&'static str> {
        let table = kind.event_types();
        self.positions()
            .filter_map(|pos| table.get(pos).map(|ev| ev.name))
            .collect()
    }

    /// Comma-separated names, or "none"
    pub fn describe(&self, kind: AttachKind) -> String {
        let names = self.names(kind);
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_template_shares_room_table() {
        assert_eq!(
            AttachKind::RoomTemplate.event_types(),
            AttachKind::Room.event_types()
        );
        assert_ne!(
            AttachKind::Mobile.event_types().len(),
            AttachKind::Object.event_types().len()
        );
    }

    #[test]
    fn test_event_mask_bits() {
        let mut mask = EventMask::empty().with(1).with(6);
        assert!(mask.has(1));
        assert!(mask.has(6));
        assert!(!mask.has(2));
        assert_eq!(mask.positions().collect::<Vec<_>>(), vec![1, 6]);

        mask.toggle(1);
        assert!(!mask.has(1));
        assert_eq!(mask.bits(), 1 << 6);
    }

    #[test]
    fn test_describe() {
        let mask = EventMask::empty().with(1).with(6);
        assert_eq!(mask.describe(AttachKind::Mobile), "Random, Greet");
        assert_eq!(EventMask::empty().describe(AttachKind::Room), "none");
        // bit 40 has no entry in any table
        assert_eq!(EventMask::empty().with(40).describe(AttachKind::Room), "none");
    }
}
