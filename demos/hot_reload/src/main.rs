//! Hot Reload Example
//!
//! Builds a small world with a guard and a lever that share a trigger,
//! suspends the running instances, then edits and recommits the trigger
//! and deletes another one. Pending saves go to an in-memory store.
//!
//! Run with `RUST_LOG=debug` to see each instance being republished.

use tedit_core::{Collection, Owner, ProtoKind, Registry, Room, ScriptedProto, Vnum};
use tedit_db::Store;
use tedit_olc::{Olc, PresetText, Saved};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("=== Tedit Hot Reload Example ===\n");

    let mut registry = Registry::new();
    let greet = Vnum::new(100);
    let lever = Vnum::new(101);
    registry.create_trigger(greet, "New Trigger");
    registry.create_trigger(lever, "New Trigger");
    registry.add_proto(
        ProtoKind::Mobile,
        ScriptedProto::new(Vnum::new(10), "a temple guard").with_script(greet),
    );
    registry.add_proto(
        ProtoKind::Object,
        ScriptedProto::new(Vnum::new(20), "a rusty lever")
            .with_script(greet)
            .with_script(lever),
    );
    registry.add_room(Room::new(Vnum::new(3001), "The Temple"));
    registry.saves_mut().clear();

    let mut olc = Olc::with_registry(registry, Default::default());
    let mut store = Store::in_memory()?;

    // First version of the greeting
    let session = olc.open_trigger("builder", greet)?;
    olc.edit(session, "name", "guard greeting", &mut PresetText::default())?;
    olc.edit(session, "types", "greet", &mut PresetText::default())?;
    olc.edit(session, "percent", "100", &mut PresetText::default())?;
    olc.edit(
        session,
        "commands",
        "",
        &mut PresetText::new("say Halt!\r\nwait 5\r\nsay Move along."),
    )?;
    println!("{}", olc.show(session)?);
    olc.save(session)?;

    // Load the world and let every greeting reach its wait
    let guard = olc.registry_mut().spawn_mobile(Vnum::new(10))?;
    olc.registry_mut().spawn_object(Vnum::new(20))?;
    olc.registry_mut().attach_trigger(Owner::Room(Vnum::new(3001)), greet)?;
    let running: Vec<_> = olc
        .registry()
        .live_triggers()
        .filter(|t| t.vnum == greet)
        .map(|t| t.id)
        .collect();
    for id in &running {
        if let Some(live) = olc.registry_mut().live_trigger_mut(*id) {
            live.step();
            live.step();
        }
        olc.registry_mut().suspend(*id, 5);
    }
    println!(
        "{} greeting instances suspended, {} timers pending",
        running.len(),
        olc.registry().timers().len()
    );

    // Edit the greeting while those instances wait
    let session = olc.open_trigger("builder", greet)?;
    olc.edit(
        session,
        "commands",
        "",
        &mut PresetText::new("say Welcome, traveller.\r\nbow"),
    )?;
    if let Saved::Trigger(report) = olc.save(session)? {
        println!(
            "Recommitted trigger {}: {} instances reset, {} timers cancelled",
            report.vnum, report.instances, report.timers_cancelled
        );
    }
    if let Some(live) = olc
        .registry()
        .character(guard)
        .and_then(|c| c.script.as_ref())
        .and_then(|s| s.triggers().first())
    {
        println!(
            "Guard's greeting now at line {}: {:?}",
            live.cursor,
            live.current().map(|c| c.as_str())
        );
    }

    // Somebody else is working on the lever object
    let lever_editor = olc.open_proto("other", ProtoKind::Object, Vnum::new(20))?;

    println!("\n{}", olc.search(lever)?);
    let report = olc.delete_trigger("builder", lever)?;
    println!(
        "Deleted trigger {}: {} live, {} prototypes updated, {} editors told",
        lever,
        report.live_removed,
        report.protos_updated.len(),
        report.editors_notified
    );
    for message in olc.take_messages(lever_editor)? {
        println!("  [to other] {}", message);
    }
    olc.cancel(lever_editor)?;

    let failures = olc.flush(&mut store);
    println!("\nFlushed saves ({} failed)", failures);
    println!("Stored triggers: {:?}", store.load_index(Collection::Trigger)?);
    println!("Stored objects: {}", store.count_protos(ProtoKind::Object)?);

    Ok(())
}
