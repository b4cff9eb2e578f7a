//! Edit sessions: a detached, uncommitted copy of a trigger
//!
//! While a draft is open its command list lives only as text; the compiled
//! body is rebuilt from that text on commit. Every field operation checks
//! the draft's current argument shapes before touching anything.

use crate::error::{Error, Result};
use crate::field::{process_choice, process_flags, process_number, process_string, TriggerField};
use tedit_core::{
    ArgShape, AttachKind, CompiledBody, EventMask, ObjWhere, OlcConfig, PhraseKind, TriggerDef,
    TriggerPrototype, Vnum,
};

/// External line editor that takes over a text buffer
pub trait TextCapture {
    /// Edit `buffer` in place. Implementations must keep it within
    /// `max_len` bytes; longer results are truncated.
    fn capture(&mut self, title: &str, buffer: &mut String, max_len: usize) -> Result<()>;
}

/// A capture that replaces the buffer with fixed text (imports, tests)
#[derive(Debug, Clone, Default)]
pub struct PresetText(pub String);

impl PresetText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl TextCapture for PresetText {
    fn capture(&mut self, _title: &str, buffer: &mut String, _max_len: usize) -> Result<()> {
        buffer.clone_from(&self.0);
        Ok(())
    }
}

/// An uncommitted trigger and the text of its command list
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    vnum: Vnum,
    def: TriggerDef,
    text: String,
}

impl Draft {
    /// Open a draft for `vnum`, cloning `existing` or starting blank.
    ///
    /// A clone carries every authored field but not the compiled body,
    /// which is rendered into the text buffer instead.
    pub fn begin(vnum: Vnum, existing: Option<&TriggerPrototype>, config: &OlcConfig) -> Self {
        match existing {
            Some(proto) => {
                let mut def = proto.def().clone();
                def.body = CompiledBody::empty();
                Self {
                    vnum,
                    def,
                    text: proto.body().to_text(),
                }
            }
            None => {
                let mut def = TriggerDef::new(config.draft_name.clone());
                def.narg = config.draft_narg;
                Self {
                    vnum,
                    def,
                    text: String::new(),
                }
            }
        }
    }

    pub fn vnum(&self) -> Vnum {
        self.vnum
    }

    pub fn def(&self) -> &TriggerDef {
        &self.def
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn arg_shape(&self) -> ArgShape {
        self.def.arg_shape()
    }

    fn require(&self, shape: ArgShape, field: TriggerField) -> Result<()> {
        if self.arg_shape().intersects(shape) {
            Ok(())
        } else {
            Err(Error::FieldNotApplicable(field))
        }
    }

    /// Apply one named field operation
    pub fn apply(
        &mut self,
        field: TriggerField,
        arg: &str,
        capture: &mut dyn TextCapture,
        config: &OlcConfig,
    ) -> Result<String> {
        match field {
            TriggerField::Name => self.set_name(arg),
            TriggerField::Attaches => self.set_attaches(arg),
            TriggerField::Types => self.set_types(arg),
            TriggerField::Argtype => self.set_argtype(arg),
            TriggerField::Location => self.set_location(arg),
            TriggerField::String => self.set_string(arg),
            TriggerField::Costs => self.set_costs(arg),
            TriggerField::Percent => self.set_percent(arg),
            TriggerField::Numarg => self.set_numarg(arg),
            TriggerField::Commands => self.edit_commands(capture, config.max_command_length),
        }
    }

    pub fn set_name(&mut self, arg: &str) -> Result<String> {
        self.def.name = process_string(arg, "name")?;
        Ok(format!("The name is now: {}", self.def.name))
    }

    /// Change the attachment kind; a change clears the event types
    pub fn set_attaches(&mut self, arg: &str) -> Result<String> {
        let kind = process_choice(
            arg,
            "attach type",
            AttachKind::ALL.iter().map(|k| (k.name(), *k)),
        )?;
        if kind != self.def.attach {
            self.def.attach = kind;
            self.def.types = EventMask::empty();
        }
        Ok(format!("It now attaches to: {}", kind))
    }

    /// Toggle event types; a change clears both arguments
    pub fn set_types(&mut self, arg: &str) -> Result<String> {
        let names: Vec<&str> = self.def.attach.event_types().iter().map(|ev| ev.name).collect();
        let bits = process_flags(arg, "type", &names, self.def.types.bits())?;
        let types = EventMask::from_bits(bits);
        if types != self.def.types {
            self.def.types = types;
            self.def.narg = 0;
            self.def.arglist = None;
        }
        Ok(format!("Types are now: {}", types.describe(self.def.attach)))
    }

    pub fn set_argtype(&mut self, arg: &str) -> Result<String> {
        self.require(ArgShape::PHRASE_OR_WORDLIST, TriggerField::Argtype)?;
        let kind = process_choice(
            arg,
            "argument type",
            PhraseKind::ALL.iter().map(|k| (k.name(), *k)),
        )?;
        self.def.narg = kind as i32;
        Ok(format!("The argument type is now: {}", kind))
    }

    pub fn set_location(&mut self, arg: &str) -> Result<String> {
        self.require(ArgShape::OBJ_WHERE, TriggerField::Location)?;
        let names = ObjWhere::NAMES.map(|(name, _)| name);
        // narg may hold a stale negative value from another role
        let current = ObjWhere::from_bits_truncate(self.def.narg).bits() as u64;
        let bits = process_flags(arg, "location", &names, current)?;
        let location = ObjWhere::from_bits_truncate(bits as i32);
        self.def.narg = location.bits();
        Ok(format!("The location is now: {}", location.describe()))
    }

    /// Set the string argument; "none" clears it
    pub fn set_string(&mut self, arg: &str) -> Result<String> {
        self.require(ArgShape::STRING_ROLES, TriggerField::String)?;
        let value = process_string(arg, "string")?;
        if value.eq_ignore_ascii_case("none") {
            self.def.arglist = None;
            Ok("The string is now cleared.".to_string())
        } else {
            let msg = format!("The string is now: {}", value);
            self.def.arglist = Some(value);
            Ok(msg)
        }
    }

    pub fn set_costs(&mut self, arg: &str) -> Result<String> {
        self.require(ArgShape::COST, TriggerField::Costs)?;
        self.def.narg = process_number(arg, "cost", 0, i32::MAX)?;
        Ok(format!("The cost is now: {} other coins", self.def.narg))
    }

    pub fn set_percent(&mut self, arg: &str) -> Result<String> {
        self.require(ArgShape::PERCENT, TriggerField::Percent)?;
        self.def.narg = process_number(arg, "percent", 0, 100)?;
        Ok(format!("The percent is now: {}%", self.def.narg))
    }

    /// Set `narg` as a free number; only when no event type gives it a role
    // Refused while percent, phrase/wordlist, location or cost owns narg.
    pub fn set_numarg(&mut self, arg: &str) -> Result<String> {
        if !self.arg_shape().free_narg() {
            return Err(Error::FieldNotApplicable(TriggerField::Numarg));
        }
        self.def.narg = process_number(arg, "numeric argument", i32::MIN, i32::MAX)?;
        Ok(format!("The numeric argument is now: {}", self.def.narg))
    }

    /// Hand the command text to the line editor
    pub fn edit_commands(&mut self, capture: &mut dyn TextCapture, max_len: usize) -> Result<String> {
        capture.capture("trigger commands", &mut self.text, max_len)?;
        if self.text.len() > max_len {
            let mut cut = max_len;
            while !self.text.is_char_boundary(cut) {
                cut -= 1;
            }
            tracing::warn!(vnum = %self.vnum, len = self.text.len(), max_len, "command text truncated");
            self.text.truncate(cut);
        }
        Ok(format!("The command list is now {} bytes.", self.text.len()))
    }
}
