//! The main trigger editor display

use crate::draft::Draft;
use std::fmt::Write;
use tedit_core::{ArgShape, ObjWhere, PhraseKind, Registry};

/// Escape colour codes so stored text shows literally
pub fn show_color_codes(text: &str) -> String {
    text.replace('&', "&&")
}

/// Render a draft for its author.
///
/// The header shows the name currently stored for the vnum (or "new
/// trigger" if nothing is stored yet), then the draft's own fields. Only
/// the argument lines that the draft's shapes give meaning to are shown.
pub fn show_draft(draft: &Draft, registry: &Registry) -> String {
    let def = draft.def();
    let shape = draft.arg_shape();
    let stored = registry
        .trigger(draft.vnum())
        .map_or("new trigger", |proto| proto.name());

    let mut out = String::new();
    // writing to a String cannot fail
    let _ = write!(out, "[&c{}&0] &c{}&0\r\n", draft.vnum(), stored);
    let _ = write!(out, "<&yname&0> {}\r\n", def.name);
    let _ = write!(out, "<&yattaches&0> {}\r\n", def.attach);
    let _ = write!(out, "<&ytypes&0> {}\r\n", def.types.describe(def.attach));

    if shape.contains(ArgShape::PERCENT) {
        let _ = write!(out, "<&ypercent&0> {}%\r\n", def.narg);
    }
    if shape.contains(ArgShape::PHRASE_OR_WORDLIST) {
        let kind = PhraseKind::from_narg(def.narg).map_or("UNKNOWN", |k| k.name());
        let _ = write!(out, "<&yargtype&0> {}\r\n", kind);
    }
    if shape.contains(ArgShape::OBJ_WHERE) {
        let location = ObjWhere::from_bits_truncate(def.narg).describe();
        let _ = write!(out, "<&ylocation&0> {}\r\n", location);
    }
    if shape.uses_string() {
        let _ = write!(out, "<&ystring&0> {}\r\n", def.arglist.as_deref().unwrap_or(""));
    }
    if shape.contains(ArgShape::COST) {
        let _ = write!(out, "<&ycosts&0> {} other coins\r\n", def.narg);
    }

    let _ = write!(out, "<&ycommands&0>\r\n{}", show_color_codes(draft.text()));
    out
}
