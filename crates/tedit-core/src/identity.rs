//! Identity types for prototypes, live entities and scheduled timers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Virtual number: the key of a prototype within its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vnum(pub i32);

impl Vnum {
    /// Sentinel for "no vnum assigned"
    pub const NOTHING: Vnum = Vnum(-1);

    /// Create a new vnum
    pub fn new(vnum: i32) -> Self {
        Self(vnum)
    }

    /// Get the raw value
    pub fn raw(&self) -> i32 {
        self.0
    }

    /// Check whether this is a real vnum rather than the sentinel
    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for Vnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Vnum {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

/// Runtime identifier for a live character or object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Create a new entity ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

/// Identifier of one live trigger instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance:{}", self.0)
    }
}

/// Handle of a pending resume timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vnum() {
        let vnum = Vnum::new(100);
        assert_eq!(vnum.raw(), 100);
        assert!(vnum.is_valid());
        assert!(!Vnum::NOTHING.is_valid());
        assert_eq!(format!("{}", vnum), "100");
    }

    #[test]
    fn test_entity_id() {
        let id = EntityId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "entity:42");
    }
}
