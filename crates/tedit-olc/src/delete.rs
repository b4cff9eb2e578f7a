//! Deleting a trigger and every reference to it
//!
//! References live in several independent places: live scripts, the
//! trigger lists of mobile/object/room-template prototypes, live rooms'
//! own lists, and the drafts of entity editors that are open right now.
//! All of them are swept before the call returns.

use crate::error::Result;
use crate::sessions::{EditorTarget, Sessions};
use tedit_core::{delete_from_proto_list, ProtoKind, Registry, Vnum};

/// What a deletion touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub vnum: Option<Vnum>,
    /// Live instances extracted
    pub live_removed: usize,
    /// Entity prototypes whose trigger list changed (each scheduled for save)
    pub protos_updated: Vec<(ProtoKind, Vnum)>,
    /// Live rooms whose own trigger list changed
    pub rooms_updated: Vec<Vnum>,
    /// Open editors that lost a reference and were told so
    pub editors_notified: usize,
}

/// Permanently delete a trigger prototype.
///
/// Fails without changing anything if the vnum is unknown or is the last
/// trigger in the store.
pub fn delete_trigger(registry: &mut Registry, sessions: &mut Sessions, vnum: Vnum) -> Result<DeleteReport> {
    let proto = registry.remove_trigger(vnum)?;
    let mut report = DeleteReport {
        vnum: Some(vnum),
        ..Default::default()
    };

    report.live_removed = registry.remove_live(vnum);

    for room in registry.rooms_mut() {
        if delete_from_proto_list(&mut room.scripts, vnum) {
            report.rooms_updated.push(room.vnum);
        }
    }

    for kind in ProtoKind::ALL {
        let touched: Vec<Vnum> = registry
            .protos_mut(kind)
            .filter_map(|p| delete_from_proto_list(&mut p.scripts, vnum).then_some(p.vnum))
            .collect();
        for owner in touched {
            registry.saves_mut().entry(kind.collection(), owner);
            report.protos_updated.push((kind, owner));
        }
    }

    for session in sessions.iter_mut() {
        let EditorTarget::Proto { kind, draft } = &mut session.target else {
            continue;
        };
        if !delete_from_proto_list(&mut draft.scripts, vnum) {
            continue;
        }
        let kind = *kind;
        session.notify(format!(
            "A trigger attached to the {} you're editing was deleted.",
            kind
        ));
        report.editors_notified += 1;
    }

    tracing::debug!(
        %vnum,
        name = proto.name(),
        live = report.live_removed,
        protos = report.protos_updated.len(),
        rooms = report.rooms_updated.len(),
        editors = report.editors_notified,
        "swept trigger references"
    );
    Ok(report)
}
