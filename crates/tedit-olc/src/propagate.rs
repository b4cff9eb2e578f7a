//! Committing a draft and republishing it to live instances
//!
//! A commit recompiles the draft's text, stores the result on the
//! canonical prototype, and then walks every live trigger in the world.
//! Each instance of the vnum adopts the new definition and loses its
//! execution state: its old cursor indexes the old body and is meaningless
//! against the new one, and a pending resume timer would fire into it.
//!
//! The sweep runs to completion before any script can resume.

use crate::draft::Draft;
use crate::error::{Error, Result};
use tedit_core::{Compiler, OlcConfig, Registry, Vnum};

/// What a commit did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub vnum: Vnum,
    /// The prototype did not exist before this commit
    pub created: bool,
    /// The draft had no text and the placeholder script was compiled
    pub placeholder: bool,
    /// Live instances republished
    pub instances: usize,
    /// Pending resume timers cancelled
    pub timers_cancelled: usize,
}

/// Commit a draft to the store and every live instance of its vnum.
pub fn commit(
    registry: &mut Registry,
    draft: &Draft,
    compiler: &dyn Compiler,
    config: &OlcConfig,
) -> Result<CommitReport> {
    let vnum = draft.vnum();
    if !vnum.is_valid() {
        return Err(Error::InvalidVnum(vnum));
    }

    let created = registry.trigger(vnum).is_none();
    if created {
        registry.create_trigger(vnum, &config.new_trigger_name);
    }

    // the placeholder is compiled, never written back into the draft
    let placeholder = draft.text().is_empty();
    let text = if placeholder {
        config.placeholder_script.as_str()
    } else {
        draft.text()
    };

    let mut def = draft.def().clone();
    def.body = compiler.compile(text);
    registry.update_trigger(vnum, def)?;

    let proto = registry
        .trigger(vnum)
        .cloned()
        .ok_or(tedit_core::Error::NotFound(vnum))?;

    let mut instances = 0;
    let mut timers_cancelled = 0;
    registry.for_each_live_mut(|live, timers| {
        if live.vnum != vnum {
            return;
        }
        if let Some(wait) = live.republish(&proto) {
            if timers.cancel(wait) {
                timers_cancelled += 1;
            }
        }
        instances += 1;
        tracing::debug!(%vnum, instance = %live.id, "republished live trigger");
    });

    tracing::info!(%vnum, created, instances, timers_cancelled, "committed trigger");
    Ok(CommitReport {
        vnum,
        created,
        placeholder,
        instances,
        timers_cancelled,
    })
}
