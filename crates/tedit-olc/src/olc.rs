//! Olc - routes author operations to drafts, commits and deletions
//!
//! `Olc` owns the registry and the open editors. Hosts feed it one author
//! command at a time; every call runs to completion before returning.

use crate::delete::{delete_trigger, DeleteReport};
use crate::display::show_draft;
use crate::draft::{Draft, TextCapture};
use crate::error::{Error, Result};
use crate::field::TriggerField;
use crate::propagate::{commit, CommitReport};
use crate::search::search_trigger;
use crate::sessions::{EditorTarget, OlcSession, SessionId, Sessions};
use tedit_core::{
    Compiler, LineCompiler, OlcConfig, Persister, ProtoKind, ProtoListRef, Registry, ScriptedProto, Vnum,
};

/// Outcome of saving an editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Saved {
    Trigger(CommitReport),
    Proto { kind: ProtoKind, vnum: Vnum },
}

/// The online trigger editor
///
/// ```
/// use tedit_olc::{Olc, PresetText};
/// use tedit_core::Vnum;
///
/// let mut olc = Olc::new();
/// let session = olc.open_trigger("builder", Vnum::new(100)).unwrap();
/// olc.edit(session, "types", "greet", &mut PresetText::default()).unwrap();
/// olc.edit(session, "percent", "50", &mut PresetText::default()).unwrap();
/// olc.save(session).unwrap();
///
/// assert_eq!(olc.registry().trigger(Vnum::new(100)).unwrap().def().narg, 50);
/// ```
#[derive(Debug)]
pub struct Olc<C: Compiler = LineCompiler> {
    registry: Registry,
    sessions: Sessions,
    compiler: C,
    config: OlcConfig,
}

impl Olc<LineCompiler> {
    /// An editor over an empty registry, with the line compiler
    pub fn new() -> Self {
        Self::with_compiler(Registry::new(), LineCompiler, OlcConfig::default())
    }

    pub fn with_registry(registry: Registry, config: OlcConfig) -> Self {
        Self::with_compiler(registry, LineCompiler, config)
    }
}

impl Default for Olc<LineCompiler> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Compiler> Olc<C> {
    pub fn with_compiler(registry: Registry, compiler: C, config: OlcConfig) -> Self {
        Self {
            registry,
            sessions: Sessions::new(),
            compiler,
            config,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut Sessions {
        &mut self.sessions
    }

    pub fn config(&self) -> &OlcConfig {
        &self.config
    }

    /// Open a trigger draft, cloning the stored prototype if there is one
    pub fn open_trigger(&mut self, author: &str, vnum: Vnum) -> Result<SessionId> {
        if !vnum.is_valid() {
            return Err(Error::InvalidVnum(vnum));
        }
        if self.sessions.iter().any(|(_, s)| s.target.edits_trigger(vnum)) {
            return Err(Error::InUse(format!("trigger {}", vnum)));
        }
        let draft = Draft::begin(vnum, self.registry.trigger(vnum), &self.config);
        let id = self.sessions.open(OlcSession::new(author, EditorTarget::Trigger(draft)));
        tracing::debug!(author, %vnum, session = %id, "opened trigger editor");
        Ok(id)
    }

    /// Open a mobile, object or room-template draft
    pub fn open_proto(&mut self, author: &str, kind: ProtoKind, vnum: Vnum) -> Result<SessionId> {
        if !vnum.is_valid() {
            return Err(Error::InvalidVnum(vnum));
        }
        if self.sessions.iter().any(|(_, s)| s.target.edits_proto(kind, vnum)) {
            return Err(Error::InUse(format!("{} {}", kind, vnum)));
        }
        let draft = self
            .registry
            .proto(kind, vnum)
            .cloned()
            .unwrap_or_else(|| ScriptedProto::new(vnum, format!("a new {}", kind)));
        let id = self
            .sessions
            .open(OlcSession::new(author, EditorTarget::Proto { kind, draft }));
        tracing::debug!(author, %vnum, %kind, session = %id, "opened prototype editor");
        Ok(id)
    }

    fn session_mut(&mut self, id: SessionId) -> Result<&mut OlcSession> {
        self.sessions.get_mut(id).ok_or(Error::NoSuchSession(id))
    }

    /// Append a trigger to the reference list of an open prototype draft
    pub fn add_proto_script(&mut self, id: SessionId, trigger: Vnum) -> Result<String> {
        if self.registry.trigger(trigger).is_none() {
            return Err(tedit_core::Error::NotFound(trigger).into());
        }
        match &mut self.session_mut(id)?.target {
            EditorTarget::Proto { draft, .. } => {
                draft.scripts.push(ProtoListRef::new(trigger));
                Ok(format!("Trigger {} attached.", trigger))
            }
            EditorTarget::Trigger(_) => Err(Error::WrongEditor("mobile, object or room template")),
        }
    }

    /// Run one named field operation on a trigger draft
    pub fn edit(
        &mut self,
        id: SessionId,
        field: &str,
        arg: &str,
        capture: &mut dyn TextCapture,
    ) -> Result<String> {
        let field: TriggerField = field.parse()?;
        let config = &self.config;
        match &mut self.sessions.get_mut(id).ok_or(Error::NoSuchSession(id))?.target {
            EditorTarget::Trigger(draft) => draft.apply(field, arg, capture, config),
            EditorTarget::Proto { .. } => Err(Error::WrongEditor("trigger")),
        }
    }

    /// Render the open trigger draft
    pub fn show(&self, id: SessionId) -> Result<String> {
        let session = self.sessions.get(id).ok_or(Error::NoSuchSession(id))?;
        match &session.target {
            EditorTarget::Trigger(draft) => Ok(show_draft(draft, &self.registry)),
            EditorTarget::Proto { .. } => Err(Error::WrongEditor("trigger")),
        }
    }

    /// Commit the editor's draft and close it.
    ///
    /// On error the session stays open with its draft untouched.
    pub fn save(&mut self, id: SessionId) -> Result<Saved> {
        let session = self.sessions.get(id).ok_or(Error::NoSuchSession(id))?;
        let saved = match &session.target {
            EditorTarget::Trigger(draft) => {
                let report = commit(&mut self.registry, draft, &self.compiler, &self.config)?;
                tracing::info!(author = %session.author, vnum = %report.vnum, "saved trigger");
                Saved::Trigger(report)
            }
            EditorTarget::Proto { kind, draft } => {
                let (kind, vnum) = (*kind, draft.vnum);
                self.registry.save_proto(kind, draft.clone());
                tracing::info!(author = %session.author, %vnum, %kind, "saved prototype");
                Saved::Proto { kind, vnum }
            }
        };
        self.sessions.close(id);
        Ok(saved)
    }

    /// Discard the editor's draft
    pub fn cancel(&mut self, id: SessionId) -> Result<()> {
        self.sessions.close(id).map(|_| ()).ok_or(Error::NoSuchSession(id))
    }

    /// Delete a trigger and every reference to it
    pub fn delete_trigger(&mut self, author: &str, vnum: Vnum) -> Result<DeleteReport> {
        let report = delete_trigger(&mut self.registry, &mut self.sessions, vnum)?;
        tracing::info!(author, %vnum, live = report.live_removed, "deleted trigger");
        Ok(report)
    }

    /// Usage report for a trigger
    pub fn search(&self, vnum: Vnum) -> Result<String> {
        search_trigger(&self.registry, vnum)
    }

    /// Notices queued for an author since the last call
    pub fn take_messages(&mut self, id: SessionId) -> Result<Vec<String>> {
        Ok(self.session_mut(id)?.take_messages())
    }

    /// Write every pending save; returns the number that failed
    pub fn flush(&mut self, persister: &mut dyn Persister) -> usize {
        self.registry.flush_saves(persister)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::PresetText;
    use tedit_core::{Collection, Owner, Room, SaveRequest};

    fn olc() -> Olc {
        let mut registry = Registry::new();
        registry.create_trigger(Vnum::new(1), "New Trigger");
        registry.add_room(Room::new(Vnum::new(3001), "Temple"));
        registry.saves_mut().clear();
        Olc::with_registry(registry, OlcConfig::default())
    }

    fn no_text() -> PresetText {
        PresetText::default()
    }

    #[test]
    fn test_edit_show_save() {
        let mut olc = olc();
        let id = olc.open_trigger("builder", Vnum::new(100)).unwrap();
        olc.edit(id, "name", "greeter", &mut no_text()).unwrap();
        olc.edit(id, "attach", "room", &mut no_text()).unwrap();
        olc.edit(id, "types", "enter", &mut no_text()).unwrap();
        olc.edit(id, "percent", "75", &mut no_text()).unwrap();
        olc.edit(id, "commands", "", &mut PresetText::new("say hello\r\nsmile")).unwrap();

        let shown = olc.show(id).unwrap();
        assert!(shown.starts_with("[&c100&0] &cnew trigger&0\r\n"));
        assert!(shown.contains("<&ypercent&0> 75%"));

        let saved = olc.save(id).unwrap();
        assert!(matches!(saved, Saved::Trigger(CommitReport { created: true, .. })));
        assert!(olc.sessions().is_empty());

        let proto = olc.registry().trigger(Vnum::new(100)).unwrap();
        assert_eq!(proto.name(), "greeter");
        assert_eq!(proto.def().narg, 75);
        assert_eq!(proto.body().len(), 2);
        assert!(olc.registry().saves().contains(&SaveRequest::Entry(Collection::Trigger, Vnum::new(100))));
    }

    #[test]
    fn test_gated_edit_leaves_draft_alone() {
        let mut olc = olc();
        let id = olc.open_trigger("builder", Vnum::new(1)).unwrap();
        let before = olc.show(id).unwrap();
        assert!(matches!(
            olc.edit(id, "costs", "10", &mut no_text()),
            Err(Error::FieldNotApplicable(TriggerField::Costs))
        ));
        assert_eq!(olc.show(id).unwrap(), before);
    }

    #[test]
    fn test_one_editor_per_target() {
        let mut olc = olc();
        olc.open_trigger("builder", Vnum::new(1)).unwrap();
        assert!(matches!(olc.open_trigger("other", Vnum::new(1)), Err(Error::InUse(_))));
        assert!(matches!(
            olc.open_trigger("other", Vnum::NOTHING),
            Err(Error::InvalidVnum(_))
        ));

        olc.open_proto("builder", ProtoKind::Mobile, Vnum::new(10)).unwrap();
        assert!(matches!(
            olc.open_proto("other", ProtoKind::Mobile, Vnum::new(10)),
            Err(Error::InUse(_))
        ));
        assert!(olc.open_proto("other", ProtoKind::Object, Vnum::new(10)).is_ok());
    }

    #[test]
    fn test_cancel_discards() {
        let mut olc = olc();
        let id = olc.open_trigger("builder", Vnum::new(1)).unwrap();
        olc.edit(id, "name", "changed", &mut no_text()).unwrap();
        olc.cancel(id).unwrap();
        assert_eq!(olc.registry().trigger(Vnum::new(1)).unwrap().name(), "New Trigger");
        assert!(matches!(olc.cancel(id), Err(Error::NoSuchSession(_))));
        assert!(matches!(olc.show(id), Err(Error::NoSuchSession(_))));
    }

    #[test]
    fn test_proto_editor() {
        let mut olc = olc();
        let id = olc.open_proto("builder", ProtoKind::Mobile, Vnum::new(10)).unwrap();
        assert!(matches!(
            olc.edit(id, "name", "x", &mut no_text()),
            Err(Error::WrongEditor("trigger"))
        ));
        assert!(matches!(
            olc.add_proto_script(id, Vnum::new(99)),
            Err(Error::Core(tedit_core::Error::NotFound(_)))
        ));
        olc.add_proto_script(id, Vnum::new(1)).unwrap();

        assert_eq!(
            olc.save(id).unwrap(),
            Saved::Proto {
                kind: ProtoKind::Mobile,
                vnum: Vnum::new(10)
            }
        );
        assert!(olc.registry().proto(ProtoKind::Mobile, Vnum::new(10)).unwrap().references(Vnum::new(1)));
        assert!(olc.registry().saves().contains(&SaveRequest::Index(Collection::Mobile)));
    }

    // A draft left open over a trigger that is then deleted saves it back
    // as a new prototype.
    #[test]
    fn test_delete_then_search() {
        let mut olc = olc();
        for v in [5, 6] {
            olc.registry_mut().create_trigger(Vnum::new(v), "New Trigger");
        }
        olc.registry_mut()
            .add_proto(ProtoKind::Mobile, ScriptedProto::new(Vnum::new(10), "a guard").with_script(Vnum::new(5)));
        olc.registry_mut()
            .add_proto(ProtoKind::Object, ScriptedProto::new(Vnum::new(20), "a lever").with_script(Vnum::new(5)));
        olc.registry_mut().attach_trigger(Owner::Room(Vnum::new(3001)), Vnum::new(5)).unwrap();
        let editing = olc.open_proto("builder", ProtoKind::Mobile, Vnum::new(10)).unwrap();
        let trigger_draft = olc.open_trigger("other", Vnum::new(5)).unwrap();

        assert!(olc.search(Vnum::new(5)).unwrap().ends_with("2 locations shown\r\n"));

        let report = olc.delete_trigger("builder", Vnum::new(5)).unwrap();
        assert_eq!(report.live_removed, 1);
        assert_eq!(report.editors_notified, 1);
        assert!(crate::search::find_usages(olc.registry(), Vnum::new(5)).is_empty());
        assert!(matches!(
            olc.search(Vnum::new(5)),
            Err(Error::Core(tedit_core::Error::NotFound(_)))
        ));
        assert_eq!(olc.take_messages(editing).unwrap().len(), 1);
        assert!(olc.take_messages(editing).unwrap().is_empty());

        let saved = olc.save(trigger_draft).unwrap();
        assert!(matches!(saved, Saved::Trigger(CommitReport { created: true, .. })));
    }

    #[test]
    fn test_flush_drains_queue() {
        struct Counting(usize);
        impl Persister for Counting {
            fn persist_index(&mut self, _: &Registry, _: Collection) -> tedit_core::Result<()> {
                self.0 += 1;
                Ok(())
            }
            fn persist_entry(&mut self, _: &Registry, _: Collection, _: Vnum) -> tedit_core::Result<()> {
                self.0 += 1;
                Ok(())
            }
        }

        let mut olc = olc();
        let id = olc.open_trigger("builder", Vnum::new(2)).unwrap();
        olc.save(id).unwrap();
        let mut persister = Counting(0);
        assert_eq!(olc.flush(&mut persister), 0);
        assert_eq!(persister.0, 2);
        assert!(olc.registry().saves().is_empty());
    }
}
