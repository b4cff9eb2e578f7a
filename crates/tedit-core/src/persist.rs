//! Persistence scheduling
//!
//! Mutations never write storage themselves. They enqueue save requests
//! naming the index or the single entry that changed, and the host drains
//! the queue into a [`Persister`] when convenient.

use crate::error::Result;
use crate::identity::Vnum;
use crate::registry::Registry;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A persisted library of prototypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Trigger,
    Mobile,
    Object,
    RoomTemplate,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Trigger => "trg",
            Collection::Mobile => "mob",
            Collection::Object => "obj",
            Collection::RoomTemplate => "rmt",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One scheduled write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveRequest {
    /// Rewrite the list of vnums in a collection
    Index(Collection),
    /// Rewrite (or remove, if gone) one entry's definition
    Entry(Collection, Vnum),
}

/// Ordered, de-duplicated pending saves
#[derive(Debug, Clone, Default)]
pub struct SaveQueue {
    pending: IndexSet<SaveRequest>,
}

impl SaveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&mut self, collection: Collection) {
        if self.pending.insert(SaveRequest::Index(collection)) {
            tracing::debug!(%collection, "scheduled index save");
        }
    }

    pub fn entry(&mut self, collection: Collection, vnum: Vnum) {
        if self.pending.insert(SaveRequest::Entry(collection, vnum)) {
            tracing::debug!(%collection, %vnum, "scheduled entry save");
        }
    }

    pub fn contains(&self, request: &SaveRequest) -> bool {
        self.pending.contains(request)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SaveRequest> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop everything pending, e.g. saves scheduled while booting a world
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub(crate) fn take(&mut self) -> Vec<SaveRequest> {
        self.pending.drain(..).collect()
    }
}

/// Durable storage for prototype libraries
///
/// Implementations read the current state out of the registry. An entry
/// request for a vnum the registry no longer holds means "remove it".
pub trait Persister {
    fn persist_index(&mut self, registry: &Registry, collection: Collection) -> Result<()>;

    fn persist_entry(&mut self, registry: &Registry, collection: Collection, vnum: Vnum) -> Result<()>;
}
