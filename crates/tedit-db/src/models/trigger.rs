//! Stored trigger prototypes.

use crate::error::{Error, Result};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use tedit_core::{AttachKind, Command, CompiledBody, EventMask, TriggerDef, TriggerPrototype, Vnum};

/// Primary key for a trigger vnum; negative vnums are never stored.
pub fn trigger_key(vnum: Vnum) -> Result<u64> {
    u64::try_from(vnum.raw()).map_err(|_| Error::NotFound(format!("trigger {}", vnum)))
}

/// Stored trigger prototype.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredTrigger {
    /// Primary key - trigger vnum.
    #[primary_key]
    pub vnum: u64,
    pub name: String,
    /// Serialized attachment kind.
    pub attach: Vec<u8>,
    /// Event-type bits.
    pub types: u64,
    pub narg: i32,
    pub arglist: Option<String>,
    pub data_type: i32,
    /// Serialized command lines.
    pub commands: Vec<u8>,
}

impl StoredTrigger {
    /// Create from a trigger prototype.
    pub fn from_proto(proto: &TriggerPrototype) -> Result<Self> {
        let def = proto.def();
        Ok(Self {
            vnum: trigger_key(proto.vnum())?,
            name: def.name.clone(),
            attach: bincode::serialize(&def.attach)?,
            types: def.types.bits(),
            narg: def.narg,
            arglist: def.arglist.clone(),
            data_type: def.data_type,
            commands: bincode::serialize(def.body.commands())?,
        })
    }

    /// Convert back to a trigger prototype.
    pub fn to_proto(&self) -> Result<TriggerPrototype> {
        let vnum = i32::try_from(self.vnum).map_err(|e| Error::Serialization(e.to_string()))?;
        let attach: AttachKind = bincode::deserialize(&self.attach)?;
        let commands: Vec<Command> = bincode::deserialize(&self.commands)?;
        let def = TriggerDef {
            name: self.name.clone(),
            attach,
            types: EventMask::from_bits(self.types),
            narg: self.narg,
            arglist: self.arglist.clone(),
            data_type: self.data_type,
            body: CompiledBody::from_commands(commands),
        };
        Ok(TriggerPrototype::new(Vnum::new(vnum), def))
    }
}
