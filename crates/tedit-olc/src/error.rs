//! Error types for tedit-olc
//!
//! Each variant's `Display` is the message shown to the author.

use crate::field::TriggerField;
use crate::sessions::SessionId;
use tedit_core::Vnum;
use thiserror::Error;

/// Editor error type
#[derive(Error, Debug)]
pub enum Error {
    /// The argument shapes of the draft do not give this field a meaning
    #[error("You can't set that property on this trigger.")]
    FieldNotApplicable(TriggerField),

    #[error("What do you want to set the {0} to?")]
    MissingArgument(&'static str),

    #[error("Invalid {what} '{given}'.")]
    InvalidChoice { what: &'static str, given: String },

    #[error("The {what} must be between {min} and {max}.")]
    OutOfRange { what: &'static str, min: i64, max: i64 },

    #[error("Unknown trigger property '{0}'.")]
    UnknownField(String),

    #[error("You aren't editing anything ({0}).")]
    NoSuchSession(SessionId),

    #[error("You aren't editing a {0}.")]
    WrongEditor(&'static str),

    #[error("Someone else is already editing {0}.")]
    InUse(String),

    #[error("Invalid vnum {0}.")]
    InvalidVnum(Vnum),

    #[error(transparent)]
    Core(#[from] tedit_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
