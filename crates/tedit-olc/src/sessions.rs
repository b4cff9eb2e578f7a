//! Open editors
//!
//! Each author session edits exactly one thing: a trigger draft, or a
//! mobile/object/room-template draft whose trigger list may change under
//! it when a trigger is deleted.

use crate::draft::Draft;
use indexmap::IndexMap;
use std::fmt;
use tedit_core::{ProtoKind, ScriptedProto, Vnum};

/// Identifier of an open editor session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// What a session is editing
#[derive(Debug, Clone)]
pub enum EditorTarget {
    Trigger(Draft),
    Proto { kind: ProtoKind, draft: ScriptedProto },
}

impl EditorTarget {
    /// Whether this edits the given trigger vnum
    pub fn edits_trigger(&self, vnum: Vnum) -> bool {
        matches!(self, EditorTarget::Trigger(draft) if draft.vnum() == vnum)
    }

    /// Whether this edits the given entity prototype
    pub fn edits_proto(&self, kind: ProtoKind, vnum: Vnum) -> bool {
        matches!(self, EditorTarget::Proto { kind: k, draft } if *k == kind && draft.vnum == vnum)
    }
}

/// One author's open editor and the notices waiting for them
#[derive(Debug, Clone)]
pub struct OlcSession {
    pub author: String,
    pub target: EditorTarget,
    outbox: Vec<String>,
}

impl OlcSession {
    pub fn new(author: impl Into<String>, target: EditorTarget) -> Self {
        Self {
            author: author.into(),
            target,
            outbox: Vec::new(),
        }
    }

    /// Queue a message for the author
    pub fn notify(&mut self, message: impl Into<String>) {
        self.outbox.push(message.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.outbox
    }

    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outbox)
    }
}

/// All open editor sessions
#[derive(Debug, Clone, Default)]
pub struct Sessions {
    sessions: IndexMap<SessionId, OlcSession>,
    next_id: u64,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, session: OlcSession) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.sessions.insert(id, session);
        id
    }

    pub fn get(&self, id: SessionId) -> Option<&OlcSession> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut OlcSession> {
        self.sessions.get_mut(&id)
    }

    pub fn close(&mut self, id: SessionId) -> Option<OlcSession> {
        self.sessions.shift_remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SessionId, &OlcSession)> {
        self.sessions.iter().map(|(id, s)| (*id, s))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut OlcSession> {
        self.sessions.values_mut()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
