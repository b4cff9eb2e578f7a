//! Tedit Core - trigger prototypes and the live world that runs them
//!
//! This crate provides the data side of the trigger editor:
//! - Identifiers (`Vnum`, `EntityId`, `InstanceId`, `TimerId`)
//! - Attachment kinds, event-type tables and argument-shape resolution
//! - Compiled command lists and the `Compiler` seam
//! - Trigger prototypes and live trigger instances
//! - The `Registry`: prototype store, entity prototypes, live world,
//!   resume timers and the persistence queue
//!
//! Editing, commit propagation and deletion live in `tedit-olc`.

mod attach;
mod compile;
mod config;
mod error;
mod identity;
mod persist;
mod registry;
mod shape;
pub mod timer;
mod trigger;
mod world;

pub use attach::{AttachKind, EventMask, EventType};
pub use compile::{Command, CompiledBody, Compiler, LineCompiler, LINE_END};
pub use config::OlcConfig;
pub use error::{Error, Result};
pub use identity::{EntityId, InstanceId, TimerId, Vnum};
pub use persist::{Collection, Persister, SaveQueue, SaveRequest};
pub use registry::Registry;
pub use shape::{resolve_arg_shape, ArgShape, ObjWhere, PhraseKind};
pub use timer::{ResumeTimer, Tick, TimerQueue};
pub use trigger::{LiveTrigger, Script, TriggerDef, TriggerPrototype};
pub use world::{delete_from_proto_list, LiveEntity, Owner, ProtoKind, ProtoListRef, Room, ScriptedProto};
