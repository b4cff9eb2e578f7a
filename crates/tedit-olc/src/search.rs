//! Usage search: which authored prototypes reference a trigger
//!
//! Only the mobile, object and room-template tables are examined. Live
//! rooms carry their own reference lists, which deletion sweeps but this
//! report does not show.

use crate::error::Result;
use std::fmt::Write;
use tedit_core::{Error, ProtoKind, Registry, Vnum, LINE_END};

/// One prototype that references the trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    pub kind: ProtoKind,
    pub vnum: Vnum,
    pub short_desc: String,
}

/// Every prototype referencing `trigger`, each owner once, in table order
/// mobiles first, then objects, then room templates.
///
/// Works for any vnum, including one that has already been deleted.
pub fn find_usages(registry: &Registry, trigger: Vnum) -> Vec<Usage> {
    ProtoKind::ALL
        .into_iter()
        .flat_map(|kind| {
            registry
                .protos(kind)
                .filter(move |p| p.references(trigger))
                .map(move |p| Usage {
                    kind,
                    vnum: p.vnum,
                    short_desc: p.short_desc.clone(),
                })
        })
        .collect()
}

/// The author-facing usage report for an existing trigger
pub fn search_trigger(registry: &Registry, vnum: Vnum) -> Result<String> {
    let proto = registry.trigger(vnum).ok_or(Error::NotFound(vnum))?;
    let usages = find_usages(registry, vnum);

    let mut out = format!("Occurrences of trigger {} ({}):{}", vnum, proto.name(), LINE_END);
    for usage in &usages {
        let _ = write!(
            out,
            "{} [{:>5}] {}{}",
            usage.kind.tag(),
            usage.vnum.raw(),
            usage.short_desc,
            LINE_END
        );
    }
    match usages.len() {
        0 => out.push_str(" none"),
        n => {
            let _ = write!(out, "{} location{} shown", n, if n == 1 { "" } else { "s" });
        }
    }
    out.push_str(LINE_END);
    Ok(out)
}
