//! Trigger prototypes and their live instances

use crate::attach::{AttachKind, EventMask};
use crate::compile::{Command, CompiledBody};
use crate::identity::{InstanceId, TimerId, Vnum};
use crate::shape::{resolve_arg_shape, ArgShape};
use indexmap::IndexMap;

/// The authored fields of a trigger, shared by prototypes and drafts
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerDef {
    /// Display name (never empty on a stored prototype)
    pub name: String,
    pub attach: AttachKind,
    pub types: EventMask,
    /// Overloaded numeric argument, see [`ArgShape`]
    pub narg: i32,
    /// Optional string argument
    pub arglist: Option<String>,
    pub data_type: i32,
    pub body: CompiledBody,
}

impl TriggerDef {
    /// Safe defaults for a freshly created definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attach: AttachKind::Mobile,
            types: EventMask::empty(),
            narg: 0,
            arglist: None,
            data_type: 0,
            body: CompiledBody::empty(),
        }
    }

    /// Argument shapes for the current kind and types
    pub fn arg_shape(&self) -> ArgShape {
        resolve_arg_shape(self.attach, self.types)
    }
}

/// The canonical, persisted definition of a trigger
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerPrototype {
    vnum: Vnum,
    def: TriggerDef,
}

impl TriggerPrototype {
    pub fn new(vnum: Vnum, def: TriggerDef) -> Self {
        Self { vnum, def }
    }

    pub fn vnum(&self) -> Vnum {
        self.vnum
    }

    pub fn def(&self) -> &TriggerDef {
        &self.def
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn body(&self) -> &CompiledBody {
        &self.def.body
    }

    /// Replace the authored fields; the vnum is never touched.
    pub(crate) fn replace_def(&mut self, def: TriggerDef) -> TriggerDef {
        std::mem::replace(&mut self.def, def)
    }
}

/// A trigger attached to one live entity
///
/// Structural fields mirror the prototype; the cursor, depth, pending
/// timer and variables are this instance's own execution state.
#[derive(Debug, Clone)]
pub struct LiveTrigger {
    pub id: InstanceId,
    pub vnum: Vnum,
    pub name: String,
    pub arglist: Option<String>,
    pub attach: AttachKind,
    pub types: EventMask,
    pub narg: i32,
    pub data_type: i32,
    pub body: CompiledBody,
    /// Index of the next statement to run
    pub cursor: usize,
    /// Nested call depth
    pub depth: u32,
    /// Pending resume timer, if suspended
    pub wait: Option<TimerId>,
    /// Bound script variables
    pub vars: IndexMap<String, String>,
}

impl LiveTrigger {
    /// Create a fresh instance of a prototype
    pub fn instantiate(id: InstanceId, proto: &TriggerPrototype) -> Self {
        let def = proto.def();
        Self {
            id,
            vnum: proto.vnum(),
            name: def.name.clone(),
            arglist: def.arglist.clone(),
            attach: def.attach,
            types: def.types,
            narg: def.narg,
            data_type: def.data_type,
            body: def.body.clone(),
            cursor: 0,
            depth: 0,
            wait: None,
            vars: IndexMap::new(),
        }
    }

    /// Adopt the prototype's current definition and discard execution state.
    ///
    /// Returns the pending timer the caller must cancel, if there was one.
    #[must_use = "a returned timer is still scheduled and must be cancelled"]
    pub fn republish(&mut self, proto: &TriggerPrototype) -> Option<TimerId> {
        let def = proto.def();
        self.name = def.name.clone();
        self.arglist = def.arglist.clone();
        let wait = self.wait.take();
        self.vars.clear();
        self.body = def.body.clone();
        self.cursor = 0;
        self.types = def.types;
        self.attach = def.attach;
        self.narg = def.narg;
        self.data_type = def.data_type;
        self.depth = 0;
        wait
    }

    /// The statement at the cursor
    pub fn current(&self) -> Option<&Command> {
        self.body.get(self.cursor)
    }

    /// Advance past the current statement
    pub fn step(&mut self) -> Option<&Command> {
        let index = self.cursor;
        if index < self.body.len() {
            self.cursor += 1;
        }
        self.body.get(index)
    }

    pub fn is_suspended(&self) -> bool {
        self.wait.is_some()
    }
}

/// The ordered triggers attached to one live entity
#[derive(Debug, Clone, Default)]
pub struct Script {
    triggers: Vec<LiveTrigger>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, trigger: LiveTrigger) {
        self.triggers.push(trigger);
    }

    pub fn triggers(&self) -> &[LiveTrigger] {
        &self.triggers
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LiveTrigger> {
        self.triggers.iter_mut()
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut LiveTrigger> {
        self.triggers.iter_mut().find(|t| t.id == id)
    }

    /// Detach every instance of `vnum`, preserving the order of the rest
    pub fn remove_vnum(&mut self, vnum: Vnum) -> Vec<LiveTrigger> {
        let (removed, kept) = std::mem::take(&mut self.triggers)
            .into_iter()
            .partition(|t| t.vnum == vnum);
        self.triggers = kept;
        removed
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
