//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use native_db::*;
use std::path::Path;
use std::sync::OnceLock;
use tedit_core::{Collection, Persister, ProtoKind, Registry, ScriptedProto, TriggerPrototype, Vnum};

// Static models for the database
static MODELS: OnceLock<Models> = OnceLock::new();

fn models() -> Result<&'static Models> {
    if let Some(models) = MODELS.get() {
        return Ok(models);
    }
    let mut models = Models::new();
    models.define::<StoredTrigger>()?;
    models.define::<StoredProto>()?;
    models.define::<StoredIndex>()?;
    Ok(MODELS.get_or_init(|| models))
}

fn proto_kind(collection: Collection) -> Option<ProtoKind> {
    ProtoKind::ALL.into_iter().find(|kind| kind.collection() == collection)
}

/// Durable trigger and prototype libraries.
pub struct Store {
    pub(crate) db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(models()?, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(models()?)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Save a trigger prototype.
    pub fn save_trigger(&self, proto: &TriggerPrototype) -> Result<()> {
        let stored = StoredTrigger::from_proto(proto)?;
        let rw = self.db.rw_transaction()?;
        rw.upsert(stored)?;
        rw.commit()?;
        Ok(())
    }

    /// Load a trigger prototype by vnum.
    pub fn load_trigger(&self, vnum: Vnum) -> Result<Option<TriggerPrototype>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredTrigger> = r.get().primary(trigger_key(vnum)?)?;
        stored.map(|s| s.to_proto()).transpose()
    }

    /// Delete a trigger prototype; a missing record is not an error.
    pub fn remove_trigger(&self, vnum: Vnum) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredTrigger> = rw.get().primary(trigger_key(vnum)?)?;
        if let Some(s) = stored {
            rw.remove(s)?;
        }
        rw.commit()?;
        Ok(())
    }

    /// Save an entity prototype's trigger list.
    pub fn save_proto(&self, kind: ProtoKind, proto: &ScriptedProto) -> Result<()> {
        let stored = StoredProto::from_proto(kind, proto);
        let rw = self.db.rw_transaction()?;
        rw.upsert(stored)?;
        rw.commit()?;
        Ok(())
    }

    /// Load an entity prototype.
    pub fn load_proto(&self, kind: ProtoKind, vnum: Vnum) -> Result<Option<ScriptedProto>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredProto> = r.get().primary(proto_key(kind, vnum))?;
        Ok(stored.map(|s| s.to_proto()))
    }

    /// Delete an entity prototype; a missing record is not an error.
    pub fn remove_proto(&self, kind: ProtoKind, vnum: Vnum) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredProto> = rw.get().primary(proto_key(kind, vnum))?;
        if let Some(s) = stored {
            rw.remove(s)?;
        }
        rw.commit()?;
        Ok(())
    }

    /// Replace the index of a collection.
    pub fn save_index(&self, collection: Collection, vnums: &[Vnum]) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredIndex::new(collection, vnums))?;
        rw.commit()?;
        Ok(())
    }

    /// Load the index of a collection; empty if it was never written.
    pub fn load_index(&self, collection: Collection) -> Result<Vec<Vnum>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredIndex> = r.get().primary(collection.name().to_string())?;
        Ok(stored.map(|s| s.vnums()).unwrap_or_default())
    }

    /// Insert every stored trigger into a registry. Vnums the registry
    /// already holds are skipped. Returns the number inserted.
    pub fn boot_triggers(&self, registry: &mut Registry) -> Result<usize> {
        let mut loaded = 0;
        for proto in self.all_triggers()? {
            let vnum = proto.vnum();
            match registry.load_trigger(proto) {
                Ok(()) => loaded += 1,
                Err(err) => tracing::warn!(%vnum, %err, "skipped stored trigger"),
            }
        }
        tracing::info!(loaded, "booted triggers");
        Ok(loaded)
    }

    /// Insert every stored mobile, object and room template into a
    /// registry. Returns the number inserted.
    pub fn boot_protos(&self, registry: &mut Registry) -> Result<usize> {
        let mut loaded = 0;
        for kind in ProtoKind::ALL {
            for proto in self.protos_in(kind)? {
                registry.add_proto(kind, proto);
                loaded += 1;
            }
        }
        tracing::info!(loaded, "booted prototypes");
        Ok(loaded)
    }
}

impl Persister for Store {
    fn persist_index(&mut self, registry: &Registry, collection: Collection) -> tedit_core::Result<()> {
        self.save_index(collection, &registry.vnums(collection))?;
        Ok(())
    }

    fn persist_entry(&mut self, registry: &Registry, collection: Collection, vnum: Vnum) -> tedit_core::Result<()> {
        match proto_kind(collection) {
            None => match registry.trigger(vnum) {
                Some(proto) => self.save_trigger(proto)?,
                None => self.remove_trigger(vnum)?,
            },
            Some(kind) => match registry.proto(kind, vnum) {
                Some(proto) => self.save_proto(kind, proto)?,
                None => self.remove_proto(kind, vnum)?,
            },
        }
        tracing::debug!(%collection, %vnum, "persisted entry");
        Ok(())
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tedit_core::{AttachKind, EventMask, LineCompiler, Compiler, TriggerDef};

    fn world() -> Registry {
        let mut registry = Registry::new();
        registry.create_trigger(Vnum::new(5), "New Trigger");
        registry.create_trigger(Vnum::new(6), "New Trigger");
        let mut def = TriggerDef::new("greeter");
        def.attach = AttachKind::Room;
        def.types = EventMask::empty().with(5);
        def.narg = 40;
        def.arglist = Some("hello".to_string());
        def.body = LineCompiler.compile("say hi\r\nsmile");
        registry.update_trigger(Vnum::new(6), def).unwrap();
        registry.save_proto(
            ProtoKind::Mobile,
            ScriptedProto::new(Vnum::new(10), "a guard")
                .with_script(Vnum::new(5))
                .with_script(Vnum::new(6)),
        );
        registry
    }

    #[test]
    fn test_flush_then_boot() {
        let mut registry = world();
        let mut store = Store::in_memory().unwrap();
        assert_eq!(registry.flush_saves(&mut store), 0);

        assert_eq!(
            store.load_index(Collection::Trigger).unwrap(),
            vec![Vnum::new(5), Vnum::new(6)]
        );
        assert_eq!(store.load_index(Collection::Mobile).unwrap(), vec![Vnum::new(10)]);
        assert!(store.load_index(Collection::Object).unwrap().is_empty());

        let mut booted = Registry::new();
        assert_eq!(store.boot_triggers(&mut booted).unwrap(), 2);
        assert_eq!(store.boot_protos(&mut booted).unwrap(), 1);
        assert_eq!(booted.trigger(Vnum::new(6)), registry.trigger(Vnum::new(6)));
        assert_eq!(
            booted.proto(ProtoKind::Mobile, Vnum::new(10)),
            registry.proto(ProtoKind::Mobile, Vnum::new(10))
        );
        assert!(booted.saves().is_empty());
    }

    #[test]
    fn test_entry_for_missing_vnum_removes_record() {
        let mut registry = world();
        let mut store = Store::in_memory().unwrap();
        registry.flush_saves(&mut store);
        assert!(store.load_trigger(Vnum::new(5)).unwrap().is_some());

        registry.remove_trigger(Vnum::new(5)).unwrap();
        registry.flush_saves(&mut store);
        assert!(store.load_trigger(Vnum::new(5)).unwrap().is_none());
        assert_eq!(store.load_index(Collection::Trigger).unwrap(), vec![Vnum::new(6)]);
    }

    #[test]
    fn test_boot_skips_existing() {
        let mut registry = world();
        let mut store = Store::in_memory().unwrap();
        registry.flush_saves(&mut store);

        let mut booted = Registry::new();
        booted.create_trigger(Vnum::new(5), "already here");
        assert_eq!(store.boot_triggers(&mut booted).unwrap(), 1);
        assert_eq!(booted.trigger(Vnum::new(5)).unwrap().name(), "already here");
    }
}
