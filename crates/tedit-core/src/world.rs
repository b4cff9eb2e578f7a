//! The slice of the world model that carries triggers
//!
//! Entity prototypes and rooms hold ordered lists of trigger vnums to
//! instantiate; live characters, objects and rooms hold the instantiated
//! [`Script`]s.

use crate::identity::{EntityId, Vnum};
use crate::persist::Collection;
use crate::trigger::Script;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The prototype collections that can reference triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtoKind {
    Mobile,
    Object,
    RoomTemplate,
}

impl ProtoKind {
    pub const ALL: [ProtoKind; 3] = [ProtoKind::Mobile, ProtoKind::Object, ProtoKind::RoomTemplate];

    /// The library this kind is persisted in
    pub fn collection(&self) -> Collection {
        match self {
            ProtoKind::Mobile => Collection::Mobile,
            ProtoKind::Object => Collection::Object,
            ProtoKind::RoomTemplate => Collection::RoomTemplate,
        }
    }

    /// Short tag used in reports
    pub fn tag(&self) -> &'static str {
        match self {
            ProtoKind::Mobile => "MOB",
            ProtoKind::Object => "OBJ",
            ProtoKind::RoomTemplate => "RMT",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProtoKind::Mobile => "mobile",
            ProtoKind::Object => "object",
            ProtoKind::RoomTemplate => "room template",
        }
    }
}

impl fmt::Display for ProtoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A persisted reference to a trigger prototype, by vnum only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtoListRef {
    pub vnum: Vnum,
}

impl ProtoListRef {
    pub fn new(vnum: Vnum) -> Self {
        Self { vnum }
    }
}

/// Remove every reference to `vnum`; true if any were removed
pub fn delete_from_proto_list(list: &mut Vec<ProtoListRef>, vnum: Vnum) -> bool {
    let before = list.len();
    list.retain(|r| r.vnum != vnum);
    list.len() != before
}

/// A mobile, object or room-template prototype, reduced to what
/// trigger bookkeeping needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedProto {
    pub vnum: Vnum,
    /// Short description (or title, for room templates)
    pub short_desc: String,
    /// Triggers to attach when this prototype is instantiated
    pub scripts: Vec<ProtoListRef>,
}

impl ScriptedProto {
    pub fn new(vnum: Vnum, short_desc: impl Into<String>) -> Self {
        Self {
            vnum,
            short_desc: short_desc.into(),
            scripts: Vec::new(),
        }
    }

    /// Builder-style: append a trigger reference
    pub fn with_script(mut self, trigger: Vnum) -> Self {
        self.scripts.push(ProtoListRef::new(trigger));
        self
    }

    pub fn references(&self, trigger: Vnum) -> bool {
        self.scripts.iter().any(|r| r.vnum == trigger)
    }
}

/// A live character or object
#[derive(Debug, Clone)]
pub struct LiveEntity {
    pub id: EntityId,
    /// Prototype this entity was loaded from
    pub proto: Vnum,
    /// Player characters never carry scripts
    pub is_npc: bool,
    pub script: Option<Script>,
}

impl LiveEntity {
    pub fn new(id: EntityId, proto: Vnum) -> Self {
        Self {
            id,
            proto,
            is_npc: true,
            script: None,
        }
    }
}

/// A live room; rooms carry both instances and their own reference list
#[derive(Debug, Clone)]
pub struct Room {
    pub vnum: Vnum,
    pub name: String,
    pub script: Option<Script>,
    pub scripts: Vec<ProtoListRef>,
}

impl Room {
    pub fn new(vnum: Vnum, name: impl Into<String>) -> Self {
        Self {
            vnum,
            name: name.into(),
            script: None,
            scripts: Vec::new(),
        }
    }
}

/// Something a live trigger can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Character(EntityId),
    Object(EntityId),
    Room(Vnum),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_from_proto_list_removes_duplicates() {
        let mut list = vec![
            ProtoListRef::new(Vnum::new(5)),
            ProtoListRef::new(Vnum::new(6)),
            ProtoListRef::new(Vnum::new(5)),
        ];
        assert!(delete_from_proto_list(&mut list, Vnum::new(5)));
        assert_eq!(list, vec![ProtoListRef::new(Vnum::new(6))]);
        assert!(!delete_from_proto_list(&mut list, Vnum::new(5)));
    }

    #[test]
    fn test_scripted_proto_references() {
        let mob = ScriptedProto::new(Vnum::new(10), "a guard").with_script(Vnum::new(5));
        assert!(mob.references(Vnum::new(5)));
        assert!(!mob.references(Vnum::new(6)));
        assert_eq!(ProtoKind::Mobile.collection(), Collection::Mobile);
    }
}
