//! The registry: every collection that can hold a trigger or a reference
//! to one
//!
//! All cross references are by vnum or id, never by pointer, so removing a
//! prototype can never leave a dangling reference behind; at worst a stale
//! vnum that the sweep in the editor removes.
//!
//! The registry assumes a single writer. Commit and delete sweeps run to
//! completion before any script resumes; a parallel host must hold an
//! exclusive lock on the whole registry for the duration of a sweep.

use crate::error::{Error, Result};
use crate::identity::{EntityId, InstanceId, TimerId, Vnum};
use crate::persist::{Collection, Persister, SaveQueue, SaveRequest};
use crate::timer::{Tick, TimerQueue};
use crate::trigger::{LiveTrigger, Script, TriggerDef, TriggerPrototype};
use crate::world::{LiveEntity, Owner, ProtoKind, ProtoListRef, Room, ScriptedProto};
use indexmap::IndexMap;

/// Process-wide trigger state
#[derive(Debug, Clone, Default)]
pub struct Registry {
    triggers: IndexMap<Vnum, TriggerPrototype>,
    mobiles: IndexMap<Vnum, ScriptedProto>,
    objects: IndexMap<Vnum, ScriptedProto>,
    room_templates: IndexMap<Vnum, ScriptedProto>,
    characters: IndexMap<EntityId, LiveEntity>,
    items: IndexMap<EntityId, LiveEntity>,
    rooms: IndexMap<Vnum, Room>,
    timers: TimerQueue,
    saves: SaveQueue,
    next_entity: u64,
    next_instance: u64,
    tick: Tick,
}

fn all_scripts_mut<'a>(
    characters: &'a mut IndexMap<EntityId, LiveEntity>,
    items: &'a mut IndexMap<EntityId, LiveEntity>,
    rooms: &'a mut IndexMap<Vnum, Room>,
) -> impl Iterator<Item = &'a mut Script> + 'a {
    characters
        .values_mut()
        .filter_map(|c| c.script.as_mut())
        .chain(items.values_mut().filter_map(|o| o.script.as_mut()))
        .chain(rooms.values_mut().filter_map(|r| r.script.as_mut()))
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // ----------------------------------------------------------------------
    // Trigger prototypes
    // ----------------------------------------------------------------------

    /// Create a prototype with safe defaults.
    ///
    /// Creating over an existing vnum is an internal inconsistency: it is
    /// logged and the existing prototype is returned untouched.
    pub fn create_trigger(&mut self, vnum: Vnum, name: &str) -> &TriggerPrototype {
        if self.triggers.contains_key(&vnum) {
            tracing::error!(%vnum, "SYSERR: attempting to insert trigger at existing vnum");
        } else {
            self.triggers
                .insert(vnum, TriggerPrototype::new(vnum, TriggerDef::new(name)));
            self.saves.index(Collection::Trigger);
            self.saves.entry(Collection::Trigger, vnum);
        }
        &self.triggers[&vnum]
    }

    /// Insert a prototype read back from storage; schedules nothing
    pub fn load_trigger(&mut self, proto: TriggerPrototype) -> Result<()> {
        let vnum = proto.vnum();
        if self.triggers.contains_key(&vnum) {
            return Err(Error::DuplicateIdentifier(vnum));
        }
        self.triggers.insert(vnum, proto);
        Ok(())
    }

    pub fn trigger(&self, vnum: Vnum) -> Option<&TriggerPrototype> {
        self.triggers.get(&vnum)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &TriggerPrototype> {
        self.triggers.values()
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Replace a prototype's authored fields in place.
    ///
    /// The prototype keeps its vnum and its slot in the store. Returns the
    /// previous definition.
    pub fn update_trigger(&mut self, vnum: Vnum, def: TriggerDef) -> Result<TriggerDef> {
        let proto = self.triggers.get_mut(&vnum).ok_or(Error::NotFound(vnum))?;
        let old = proto.replace_def(def);
        self.saves.entry(Collection::Trigger, vnum);
        Ok(old)
    }

    /// Remove a prototype from the store. The last one is protected.
    pub fn remove_trigger(&mut self, vnum: Vnum) -> Result<TriggerPrototype> {
        if !self.triggers.contains_key(&vnum) {
            return Err(Error::NotFound(vnum));
        }
        if self.triggers.len() <= 1 {
            return Err(Error::LastEntryProtected);
        }
        let proto = self
            .triggers
            .shift_remove(&vnum)
            .ok_or(Error::NotFound(vnum))?;
        self.saves.index(Collection::Trigger);
        self.saves.entry(Collection::Trigger, vnum);
        Ok(proto)
    }

    // ----------------------------------------------------------------------
    // Entity prototypes
    // ----------------------------------------------------------------------

    fn table(&self, kind: ProtoKind) -> &IndexMap<Vnum, ScriptedProto> {
        match kind {
            ProtoKind::Mobile => &self.mobiles,
            ProtoKind::Object => &self.objects,
            ProtoKind::RoomTemplate => &self.room_templates,
        }
    }

    fn table_mut(&mut self, kind: ProtoKind) -> &mut IndexMap<Vnum, ScriptedProto> {
        match kind {
            ProtoKind::Mobile => &mut self.mobiles,
            ProtoKind::Object => &mut self.objects,
            ProtoKind::RoomTemplate => &mut self.room_templates,
        }
    }

    /// Add a prototype during world load; schedules nothing
    pub fn add_proto(&mut self, kind: ProtoKind, proto: ScriptedProto) {
        self.table_mut(kind).insert(proto.vnum, proto);
    }

    /// Store an edited prototype and schedule its save
    pub fn save_proto(&mut self, kind: ProtoKind, proto: ScriptedProto) {
        let vnum = proto.vnum;
        if self.table_mut(kind).insert(vnum, proto).is_none() {
            self.saves.index(kind.collection());
        }
        self.saves.entry(kind.collection(), vnum);
    }

    pub fn proto(&self, kind: ProtoKind, vnum: Vnum) -> Option<&ScriptedProto> {
        self.table(kind).get(&vnum)
    }

    pub fn protos(&self, kind: ProtoKind) -> impl Iterator<Item = &ScriptedProto> {
        self.table(kind).values()
    }

    pub fn protos_mut(&mut self, kind: ProtoKind) -> impl Iterator<Item = &mut ScriptedProto> {
        self.table_mut(kind).values_mut()
    }

    /// Sorted vnums of a collection, as written to its index
    pub fn vnums(&self, collection: Collection) -> Vec<Vnum> {
        let mut vnums: Vec<Vnum> = match collection {
            Collection::Trigger => self.triggers.keys().copied().collect(),
            Collection::Mobile => self.mobiles.keys().copied().collect(),
            Collection::Object => self.objects.keys().copied().collect(),
            Collection::RoomTemplate => self.room_templates.keys().copied().collect(),
        };
        vnums.sort();
        vnums
    }

    // ----------------------------------------------------------------------
    // Live world
    // ----------------------------------------------------------------------

    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity);
        self.next_entity += 1;
        id
    }

    fn next_instance_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        id
    }

    /// Instantiate each referenced trigger that exists, in list order
    fn instantiate_refs(&mut self, refs: &[ProtoListRef]) -> Option<Script> {
        if refs.is_empty() {
            return None;
        }
        let mut script = Script::new();
        for r in refs {
            let id = self.next_instance_id();
            match self.triggers.get(&r.vnum) {
                Some(proto) => script.push(LiveTrigger::instantiate(id, proto)),
                None => tracing::warn!(vnum = %r.vnum, "prototype references missing trigger"),
            }
        }
        Some(script)
    }

    fn spawn(&mut self, kind: ProtoKind, vnum: Vnum) -> Result<LiveEntity> {
        let refs = self
            .proto(kind, vnum)
            .ok_or(Error::NoSuchPrototype(vnum))?
            .scripts
            .clone();
        let id = self.next_entity_id();
        let mut entity = LiveEntity::new(id, vnum);
        entity.script = self.instantiate_refs(&refs);
        Ok(entity)
    }

    /// Load a live NPC from a mobile prototype, attaching its triggers
    pub fn spawn_mobile(&mut self, vnum: Vnum) -> Result<EntityId> {
        let entity = self.spawn(ProtoKind::Mobile, vnum)?;
        let id = entity.id;
        self.characters.insert(id, entity);
        Ok(id)
    }

    /// Load a live object from an object prototype, attaching its triggers
    pub fn spawn_object(&mut self, vnum: Vnum) -> Result<EntityId> {
        let entity = self.spawn(ProtoKind::Object, vnum)?;
        let id = entity.id;
        self.items.insert(id, entity);
        Ok(id)
    }

    /// Add a player character; players never carry scripts
    pub fn add_player(&mut self) -> EntityId {
        let id = self.next_entity_id();
        let mut player = LiveEntity::new(id, Vnum::NOTHING);
        player.is_npc = false;
        self.characters.insert(id, player);
        id
    }

    /// Add a live room, attaching the triggers its own list references
    pub fn add_room(&mut self, mut room: Room) {
        room.script = self.instantiate_refs(&room.scripts.clone());
        self.rooms.insert(room.vnum, room);
    }

    /// Build a room from a room template, copying its trigger list
    pub fn spawn_room(&mut self, vnum: Vnum, template: Vnum) -> Result<()> {
        let rmt = self
            .proto(ProtoKind::RoomTemplate, template)
            .ok_or(Error::NoSuchPrototype(template))?;
        let mut room = Room::new(vnum, rmt.short_desc.clone());
        room.scripts = rmt.scripts.clone();
        self.add_room(room);
        Ok(())
    }

    pub fn character(&self, id: EntityId) -> Option<&LiveEntity> {
        self.characters.get(&id)
    }

    pub fn object(&self, id: EntityId) -> Option<&LiveEntity> {
        self.items.get(&id)
    }

    pub fn room(&self, vnum: Vnum) -> Option<&Room> {
        self.rooms.get(&vnum)
    }

    pub fn rooms_mut(&mut self) -> impl Iterator<Item = &mut Room> {
        self.rooms.values_mut()
    }

    /// Attach a new instance of a trigger to a live owner
    pub fn attach_trigger(&mut self, owner: Owner, vnum: Vnum) -> Result<InstanceId> {
        let id = self.next_instance_id();
        let live = LiveTrigger::instantiate(id, self.trigger(vnum).ok_or(Error::NotFound(vnum))?);
        let script = match owner {
            Owner::Character(eid) => {
                let ch = self.characters.get_mut(&eid).ok_or(Error::NoSuchEntity(eid))?;
                if !ch.is_npc {
                    return Err(Error::PlayerCharacter(eid));
                }
                &mut ch.script
            }
            Owner::Object(eid) => {
                &mut self.items.get_mut(&eid).ok_or(Error::NoSuchEntity(eid))?.script
            }
            Owner::Room(room) => {
                &mut self.rooms.get_mut(&room).ok_or(Error::NoSuchRoom(room))?.script
            }
        };
        script.get_or_insert_with(Script::new).push(live);
        Ok(id)
    }

    /// Every live trigger instance in the world
    pub fn live_triggers(&self) -> impl Iterator<Item = &LiveTrigger> {
        self.characters
            .values()
            .filter_map(|c| c.script.as_ref())
            .chain(self.items.values().filter_map(|o| o.script.as_ref()))
            .chain(self.rooms.values().filter_map(|r| r.script.as_ref()))
            .flat_map(|s| s.triggers().iter())
    }

    pub fn live_trigger(&self, id: InstanceId) -> Option<&LiveTrigger> {
        self.live_triggers().find(|t| t.id == id)
    }

    pub fn live_trigger_mut(&mut self, id: InstanceId) -> Option<&mut LiveTrigger> {
        all_scripts_mut(&mut self.characters, &mut self.items, &mut self.rooms)
            .find_map(|s| s.get_mut(id))
    }

    /// Visit every live trigger together with the timer queue
    pub fn for_each_live_mut(&mut self, mut f: impl FnMut(&mut LiveTrigger, &mut TimerQueue)) {
        let timers = &mut self.timers;
        for script in all_scripts_mut(&mut self.characters, &mut self.items, &mut self.rooms) {
            for trigger in script.iter_mut() {
                f(trigger, &mut *timers);
            }
        }
    }

    /// Detach and discard every live instance of `vnum`, cancelling any
    /// pending timers.
    pub fn remove_live(&mut self, vnum: Vnum) -> usize {
        let mut removed = Vec::new();
        for ch in self.characters.values_mut() {
            if let Some(script) = ch.script.as_mut() {
                removed.extend(script.remove_vnum(vnum));
            }
        }
        for obj in self.items.values_mut() {
            if let Some(script) = obj.script.as_mut() {
                removed.extend(script.remove_vnum(vnum));
            }
        }
        for room in self.rooms.values_mut() {
            if let Some(script) = room.script.as_mut() {
                removed.extend(script.remove_vnum(vnum));
            }
        }
        for live in &removed {
            if let Some(wait) = live.wait {
                self.timers.cancel(wait);
            }
            tracing::debug!(%vnum, instance = %live.id, "extracted live trigger");
        }
        removed.len()
    }

    // ----------------------------------------------------------------------
    // Scheduling
    // ----------------------------------------------------------------------

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Suspend an instance until `delay` ticks from now
    pub fn suspend(&mut self, instance: InstanceId, delay: Tick) -> Option<TimerId> {
        let tick = self.tick;
        let timers = &mut self.timers;
        let live = all_scripts_mut(&mut self.characters, &mut self.items, &mut self.rooms)
            .find_map(|s| s.get_mut(instance))?;
        if let Some(old) = live.wait.take() {
            timers.cancel(old);
        }
        let id = timers.schedule(instance, delay, tick);
        live.wait = Some(id);
        Some(id)
    }

    /// Advance one tick; returns the instances whose timers fired
    pub fn advance_tick(&mut self) -> Vec<InstanceId> {
        self.tick += 1;
        let due = self.timers.take_due(self.tick);
        let mut resumed = Vec::with_capacity(due.len());
        for timer in due {
            if let Some(live) = self.live_trigger_mut(timer.instance) {
                if live.wait == Some(timer.id) {
                    live.wait = None;
                    resumed.push(timer.instance);
                }
            }
        }
        resumed
    }

    // ----------------------------------------------------------------------
    // Persistence
    // ----------------------------------------------------------------------

    pub fn saves(&self) -> &SaveQueue {
        &self.saves
    }

    pub fn saves_mut(&mut self) -> &mut SaveQueue {
        &mut self.saves
    }

    /// Hand every pending save to the persister.
    ///
    /// Failures are logged and skipped; in-memory state stands either way.
    /// Returns the number of failed requests.
    pub fn flush_saves(&mut self, persister: &mut dyn Persister) -> usize {
        let mut failures = 0;
        for request in self.saves.take() {
            let result = match request {
                SaveRequest::Index(collection) => persister.persist_index(self, collection),
                SaveRequest::Entry(collection, vnum) => {
                    persister.persist_entry(self, collection, vnum)
                }
            };
            if let Err(err) = result {
                failures += 1;
                tracing::warn!(?request, %err, "failed to persist");
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{Compiler, LineCompiler};

    fn registry_with(vnums: &[i32]) -> Registry {
        let mut registry = Registry::new();
        for v in vnums {
            registry.create_trigger(Vnum::new(*v), "New Trigger");
        }
        registry
    }

    #[test]
    fn test_create_trigger_defaults() {
        let mut registry = Registry::new();
        let proto = registry.create_trigger(Vnum::new(100), "New Trigger");
        assert_eq!(proto.name(), "New Trigger");
        assert!(proto.def().types.is_empty());
        assert!(proto.body().is_empty());
        assert!(registry.saves().contains(&SaveRequest::Index(Collection::Trigger)));
        assert!(registry
            .saves()
            .contains(&SaveRequest::Entry(Collection::Trigger, Vnum::new(100))));
    }

    #[test]
    fn test_create_existing_returns_existing() {
        let mut registry = registry_with(&[1]);
        let mut def = TriggerDef::new("Guard greeting");
        def.narg = 42;
        registry.update_trigger(Vnum::new(1), def.clone()).unwrap();

        let proto = registry.create_trigger(Vnum::new(1), "New Trigger");
        assert_eq!(proto.def(), &def);
        assert_eq!(registry.trigger_count(), 1);
    }

    #[test]
    fn test_update_keeps_slot_and_vnum() {
        let mut registry = registry_with(&[1, 2, 3]);
        registry
            .update_trigger(Vnum::new(2), TriggerDef::new("renamed"))
            .unwrap();
        let order: Vec<i32> = registry.triggers().map(|t| t.vnum().raw()).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(registry.trigger(Vnum::new(2)).map(|t| t.name()), Some("renamed"));
        assert!(matches!(
            registry.update_trigger(Vnum::new(9), TriggerDef::new("x")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_last_is_rejected() {
        let mut registry = registry_with(&[1]);
        assert!(matches!(
            registry.remove_trigger(Vnum::new(1)),
            Err(Error::LastEntryProtected)
        ));
        assert_eq!(registry.trigger_count(), 1);
        assert!(matches!(
            registry.remove_trigger(Vnum::new(2)),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_spawn_instantiates_proto_scripts() {
        let mut registry = registry_with(&[5, 6]);
        registry.add_proto(
            ProtoKind::Mobile,
            ScriptedProto::new(Vnum::new(10), "a guard")
                .with_script(Vnum::new(5))
                .with_script(Vnum::new(6))
                .with_script(Vnum::new(99)),
        );
        let mob = registry.spawn_mobile(Vnum::new(10)).unwrap();
        let script = registry.character(mob).and_then(|c| c.script.as_ref()).unwrap();
        // 99 does not exist and is skipped
        assert_eq!(script.len(), 2);
        assert!(registry.spawn_mobile(Vnum::new(11)).is_err());
    }

    #[test]
    fn test_remove_live_cancels_timers() {
        let mut registry = registry_with(&[5, 6]);
        registry.add_proto(ProtoKind::Object, ScriptedProto::new(Vnum::new(20), "a lamp"));
        registry.add_proto(ProtoKind::Mobile, ScriptedProto::new(Vnum::new(10), "a guard"));
        let obj = registry.spawn_object(Vnum::new(20)).unwrap();
        let mob = registry.spawn_mobile(Vnum::new(10)).unwrap();
        registry.add_room(Room::new(Vnum::new(3001), "Temple"));

        let a = registry.attach_trigger(Owner::Object(obj), Vnum::new(5)).unwrap();
        let b = registry.attach_trigger(Owner::Character(mob), Vnum::new(5)).unwrap();
        registry.attach_trigger(Owner::Room(Vnum::new(3001)), Vnum::new(5)).unwrap();
        registry.attach_trigger(Owner::Room(Vnum::new(3001)), Vnum::new(6)).unwrap();
        let ta = registry.suspend(a, 10).unwrap();
        let tb = registry.suspend(b, 1).unwrap();

        assert_eq!(registry.remove_live(Vnum::new(5)), 3);
        assert!(!registry.timers().is_pending(ta));
        assert!(!registry.timers().is_pending(tb));
        assert!(registry.timers().is_empty());
        assert_eq!(registry.live_triggers().filter(|t| t.vnum == Vnum::new(5)).count(), 0);
        assert_eq!(registry.live_triggers().filter(|t| t.vnum == Vnum::new(6)).count(), 1);
        assert!(registry.advance_tick().is_empty());
    }

    #[test]
    fn test_players_cannot_carry_triggers() {
        let mut registry = registry_with(&[5]);
        let player = registry.add_player();
        assert!(matches!(
            registry.attach_trigger(Owner::Character(player), Vnum::new(5)),
            Err(Error::PlayerCharacter(_))
        ));
        assert_eq!(registry.live_triggers().count(), 0);
        assert!(registry.character(player).unwrap().script.is_none());
    }

    #[test]
    fn test_suspend_far_future_saturates() {
        let mut registry = registry_with(&[5]);
        registry.add_room(Room::new(Vnum::new(1), "Void"));
        let id = registry.attach_trigger(Owner::Room(Vnum::new(1)), Vnum::new(5)).unwrap();
        registry.advance_tick();
        let timer = registry.suspend(id, u64::MAX).unwrap();

        assert!(registry.timers().is_pending(timer));
        assert!(registry.advance_tick().is_empty());
    }

    #[test]
    fn test_suspend_and_resume() {
        let mut registry = registry_with(&[5]);
        registry.add_room(Room::new(Vnum::new(1), "Void"));
        let id = registry.attach_trigger(Owner::Room(Vnum::new(1)), Vnum::new(5)).unwrap();
        registry.suspend(id, 2).unwrap();

        assert!(registry.advance_tick().is_empty());
        assert_eq!(registry.advance_tick(), vec![id]);
        assert!(!registry.live_trigger(id).unwrap().is_suspended());
    }

    #[test]
    fn test_room_from_template_copies_refs() {
        let mut registry = registry_with(&[5]);
        registry.add_proto(
            ProtoKind::RoomTemplate,
            ScriptedProto::new(Vnum::new(7), "A Cave").with_script(Vnum::new(5)),
        );
        registry.spawn_room(Vnum::new(700), Vnum::new(7)).unwrap();
        let room = registry.room(Vnum::new(700)).unwrap();
        assert_eq!(room.scripts, vec![ProtoListRef::new(Vnum::new(5))]);
        assert_eq!(room.script.as_ref().map(Script::len), Some(1));
    }

    #[test]
    fn test_live_instances_share_body() {
        let mut registry = registry_with(&[5]);
        let mut def = TriggerDef::new("t");
        def.body = LineCompiler.compile("say hi");
        registry.update_trigger(Vnum::new(5), def).unwrap();
        registry.add_room(Room::new(Vnum::new(1), "Void"));
        registry.attach_trigger(Owner::Room(Vnum::new(1)), Vnum::new(5)).unwrap();

        let proto_body = registry.trigger(Vnum::new(5)).unwrap().body().clone();
        assert!(registry.live_triggers().all(|t| t.body.same_as(&proto_body)));
    }

    struct FailingPersister {
        calls: usize,
    }

    impl Persister for FailingPersister {
        fn persist_index(&mut self, _: &Registry, _: Collection) -> Result<()> {
            self.calls += 1;
            Err(Error::Persistence("disk full".into()))
        }

        fn persist_entry(&mut self, _: &Registry, _: Collection, _: Vnum) -> Result<()> {
            self.calls += 1;
            Ok(())
        }
    }

    #[test]
    fn test_flush_continues_past_failures() {
        let mut registry = registry_with(&[1, 2]);
        let mut persister = FailingPersister { calls: 0 };
        assert_eq!(registry.flush_saves(&mut persister), 1);
        // one index plus two entries
        assert_eq!(persister.calls, 3);
        assert!(registry.saves().is_empty());
        assert_eq!(registry.trigger_count(), 2);
    }
}
