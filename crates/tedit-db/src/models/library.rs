//! Stored entity prototypes and collection indexes.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use tedit_core::{Collection, ProtoKind, ProtoListRef, ScriptedProto, Vnum};

/// Primary key of an entity prototype, e.g. `mob:10`.
pub fn proto_key(kind: ProtoKind, vnum: Vnum) -> String {
    format!("{}:{}", kind.collection().name(), vnum)
}

/// Stored mobile, object or room-template prototype.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredProto {
    /// Primary key - collection and vnum.
    #[primary_key]
    pub key: String,
    /// Collection name.
    #[secondary_key]
    pub collection: String,
    pub vnum: i32,
    pub short_desc: String,
    /// Trigger vnums, in attach order.
    pub scripts: Vec<i32>,
}

impl StoredProto {
    pub fn from_proto(kind: ProtoKind, proto: &ScriptedProto) -> Self {
        Self {
            key: proto_key(kind, proto.vnum),
            collection: kind.collection().name().to_string(),
            vnum: proto.vnum.raw(),
            short_desc: proto.short_desc.clone(),
            scripts: proto.scripts.iter().map(|r| r.vnum.raw()).collect(),
        }
    }

    pub fn to_proto(&self) -> ScriptedProto {
        let mut proto = ScriptedProto::new(Vnum::new(self.vnum), self.short_desc.clone());
        proto.scripts = self
            .scripts
            .iter()
            .map(|&v| ProtoListRef::new(Vnum::new(v)))
            .collect();
        proto
    }
}

/// Stored index of one collection: the sorted vnums it holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredIndex {
    /// Primary key - collection name.
    #[primary_key]
    pub collection: String,
    pub vnums: Vec<i32>,
}

impl StoredIndex {
    pub fn new(collection: Collection, vnums: &[Vnum]) -> Self {
        Self {
            collection: collection.name().to_string(),
            vnums: vnums.iter().map(|v| v.raw()).collect(),
        }
    }

    pub fn vnums(&self) -> Vec<Vnum> {
        self.vnums.iter().map(|&v| Vnum::new(v)).collect()
    }
}
