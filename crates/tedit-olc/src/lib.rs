//! Tedit OLC - the online trigger editor
//!
//! Authors open a draft of a trigger, change it one named field at a
//! time, and commit it. A commit republishes the new definition to every
//! live instance of the trigger; a delete removes the trigger and every
//! reference to it.
//!
//! - [`Draft`] and [`TriggerField`]: the textual field-edit surface
//! - [`commit`]: recompile and republish
//! - [`delete_trigger`]: remove a trigger everywhere
//! - [`search_trigger`]: which prototypes reference a trigger
//! - [`Olc`]: the facade a host routes author commands through

mod delete;
mod display;
mod draft;
mod error;
mod field;
mod olc;
mod propagate;
mod search;
mod sessions;

pub use delete::{delete_trigger, DeleteReport};
pub use display::{show_color_codes, show_draft};
pub use draft::{Draft, PresetText, TextCapture};
pub use error::{Error, Result};
pub use field::TriggerField;
pub use olc::{Olc, Saved};
pub use propagate::{commit, CommitReport};
pub use search::{find_usages, search_trigger, Usage};
pub use sessions::{EditorTarget, OlcSession, SessionId, Sessions};
