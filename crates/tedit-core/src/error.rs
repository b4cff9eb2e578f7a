//! Error types for tedit-core

use crate::{EntityId, Vnum};
use thiserror::Error;

/// Core error type
///
/// The `Display` text of each variant is suitable for showing to the
/// author who initiated the operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("There is no such trigger {0}.")]
    NotFound(Vnum),

    #[error("You can't delete the last trigger.")]
    LastEntryProtected,

    #[error("Trigger {0} already exists.")]
    DuplicateIdentifier(Vnum),

    #[error("There is no such entity {0}.")]
    NoSuchEntity(EntityId),

    #[error("Players can't carry triggers ({0}).")]
    PlayerCharacter(EntityId),

    #[error("There is no such room {0}.")]
    NoSuchRoom(Vnum),

    #[error("There is no such prototype {0}.")]
    NoSuchPrototype(Vnum),

    #[error("Configuration error: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
