//! Common query patterns for the database.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::Store;
use tedit_core::{ProtoKind, ScriptedProto, TriggerPrototype};

impl Store {
    /// Get every stored trigger prototype.
    pub fn all_triggers(&self) -> Result<Vec<TriggerPrototype>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredTrigger>()?;
        let iter = scan.all()?;
        let stored: std::result::Result<Vec<StoredTrigger>, _> = iter.collect();
        let stored = stored.map_err(|e| Error::Database(e.to_string()))?;
        stored.iter().map(|s| s.to_proto()).collect()
    }

    /// Get every stored prototype of one kind.
    pub fn protos_in(&self, kind: ProtoKind) -> Result<Vec<ScriptedProto>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredProto>(StoredProtoKey::collection)?;
        let iter = scan.start_with(kind.collection().name())?;
        let stored: std::result::Result<Vec<StoredProto>, _> = iter.collect();
        let stored = stored.map_err(|e| Error::Database(e.to_string()))?;
        Ok(stored.iter().map(|s| s.to_proto()).collect())
    }

    /// Count stored prototypes of one kind.
    pub fn count_protos(&self, kind: ProtoKind) -> Result<usize> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredProto>(StoredProtoKey::collection)?;
        let iter = scan.start_with(kind.collection().name())?;
        Ok(iter.count())
    }
}
