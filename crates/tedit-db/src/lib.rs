//! Tedit DB - trigger library storage using native_db
//!
//! Provides persistent storage for:
//! - Trigger prototypes (fields plus command lines)
//! - Mobile, object and room-template trigger lists
//! - Per-collection indexes
//!
//! [`Store`] implements `tedit_core::Persister`, so a registry's pending
//! saves can be flushed straight into it.

mod error;
mod models;
mod queries;
mod store;

pub use error::{Error, Result};
pub use store::Store;
