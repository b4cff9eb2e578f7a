//! Database models for the trigger and prototype libraries.

mod library;
mod trigger;

pub use library::*;
pub use trigger::*;
