use proptest::prelude::*;
use shiftplan_core::{CellEntry, Category, ConfigState, Weight};
use shiftplan_engine::{Engine, EngineConfig, persist};
use shiftplan_harness::{DiskStore, Fixture, init_tracing};
use shiftplan_storage::{KeyValueStore, MemoryStore};

const LIMIT: usize = 50;

#[test]
fn history_is_bounded() -> Result<(), Box<dyn std::error::Error>> {
    let mut f = Fixture::new();
    for i in 0..LIMIT + 5 {
        f.engine.add_item(Category::People, &format!("P{i}"), &[], "")?;
    }
    assert_eq!(f.engine.history().len(), LIMIT);

    let mut undos = 0;
    while f.engine.undo() {
        undos += 1;
    }
    assert_eq!(undos, LIMIT - 1);
    // the oldest retained snapshot already holds the first six people
    assert_eq!(f.state().people.items.len(), 6);
    assert!(!f.engine.undo());
    Ok(())
}

#[test]
fn undo_then_new_edit_discards_redo() -> Result<(), Box<dyn std::error::Error>> {
    let mut f = Fixture::new();
    f.add_items(Category::People, &["A", "B"])?;
    assert!(f.engine.undo());
    assert!(f.engine.can_redo());
    f.add_items(Category::People, &["C"])?;
    assert!(!f.engine.can_redo());
    assert_eq!(f.state().people.item_ids(), vec!["A", "C"]);
    Ok(())
}

#[test]
fn unchanged_state_is_not_recorded() -> Result<(), Box<dyn std::error::Error>> {
    let mut f = Fixture::new();
    f.add_items(Category::People, &["A", "B"])?;
    let before = f.engine.history().len();
    f.engine.reorder_items(Category::People, &["A".to_string(), "B".to_string()])?;
    assert_eq!(f.engine.history().len(), before);
    Ok(())
}

#[test]
fn restart_restores_history_and_pointer() -> Result<(), Box<dyn std::error::Error>> {
    let mut f = Fixture::small_roster(2)?;
    f.engine
        .set_preference_cell("P1", "05", &[CellEntry::new("E", Weight::Finite(4))])?;
    f.engine.undo();
    let state = f.state().clone();
    let len = f.engine.history().len();
    let index = f.engine.history().current_index();

    let mut f = f.reopen();
    assert_eq!(f.state(), &state);
    assert_eq!(f.engine.history().len(), len);
    assert_eq!(f.engine.history().current_index(), index);
    assert!(f.engine.redo());
    assert_eq!(f.state().preference_cell("P1", "05").len(), 1);
    Ok(())
}

#[test]
fn date_items_are_rederived_on_load() -> Result<(), Box<dyn std::error::Error>> {
    let mut f = Fixture::small_roster(1)?;
    f.add_group(Category::Dates, "Mid", &["06", "07"])?;
    let stored = f
        .engine
        .storage()
        .get(&f.engine.config().storage_key)?
        .expect("history persisted");
    let decoded = persist::decode(&stored, LIMIT)?;
    assert_eq!(decoded.current().dates.items.len(), 7);

    let f = f.reopen();
    assert_eq!(f.state().dates.items.len(), 7);
    assert_eq!(f.state().dates.items[0].id, "04");
    Ok(())
}

#[test]
fn write_failures_keep_memory_authoritative() -> Result<(), Box<dyn std::error::Error>> {
    let mut f = Fixture::new();
    f.add_items(Category::People, &["A"])?;
    f.engine.storage_mut().set_reject_writes(true);

    f.add_items(Category::People, &["B"])?;
    assert_eq!(f.state().people.item_ids(), vec!["A", "B"]);
    assert!(f.engine.undo());
    assert!(f.engine.redo());

    // the store still holds the last successful write
    f.engine.storage_mut().set_reject_writes(false);
    let f = f.reopen();
    assert_eq!(f.state().people.item_ids(), vec!["A"]);
    Ok(())
}

#[test]
fn quota_overflow_is_swallowed() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let config = EngineConfig {
        seed_defaults: false,
        ..EngineConfig::default()
    };
    let mut engine = Engine::open(config, MemoryStore::with_quota(64));
    engine.add_item(Category::People, "A", &[], "")?;
    assert_eq!(engine.state().people.item_ids(), vec!["A"]);
    assert!(engine.storage().is_empty());
    Ok(())
}

#[test]
fn corrupt_store_falls_back_to_defaults() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let config = EngineConfig::default();
    let mut store = MemoryStore::new();
    store.set(&config.storage_key, b"\xc1\xc1 definitely not an envelope")?;

    let engine = Engine::open(config, store);
    assert_eq!(engine.state(), &ConfigState::seeded());
    assert_eq!(engine.history().len(), 1);
    Ok(())
}

#[test]
fn sqlite_store_survives_restart() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let disk = DiskStore::new()?;
    let config = EngineConfig::from_toml_str("history_limit = 10\nseed_defaults = false")?;
    {
        let mut engine = Engine::open(config.clone(), disk.open()?);
        engine.add_item(Category::ShiftTypes, "D", &[], "Day")?;
        engine.add_group(Category::ShiftTypes, "Work", &["D".to_string()], "")?;
    }
    let mut engine = Engine::open(config, disk.open()?);
    assert_eq!(
        engine.state().shift_types.find_group("Work").unwrap().members,
        vec!["D".to_string()]
    );
    assert!(engine.undo());
    assert!(engine.state().shift_types.groups.is_empty());
    Ok(())
}

#[test]
fn reset_is_undoable() -> Result<(), Box<dyn std::error::Error>> {
    let mut f = Fixture::seeded();
    f.engine.delete_item(Category::People, "P1")?;
    assert!(f.engine.reset());
    assert_eq!(f.state(), &ConfigState::seeded());
    assert!(f.engine.undo());
    assert!(f.state().people.find_item("P1").is_none());
    Ok(())
}

proptest! {
    #[test]
    fn prop_redo_undo_is_identity(steps in 2usize..12, back in 1usize..12) {
        let mut f = Fixture::new();
        for i in 0..steps {
            f.engine.add_item(Category::People, &format!("P{i}"), &[], "").unwrap();
        }
        for _ in 0..back.min(steps - 1) {
            f.engine.undo();
        }
        let before = f.state().clone();
        let index = f.engine.history().current_index();

        if f.engine.redo() {
            f.engine.undo();
        }
        prop_assert_eq!(f.state(), &before);
        prop_assert_eq!(f.engine.history().current_index(), index);

        if f.engine.undo() {
            f.engine.redo();
        }
        prop_assert_eq!(f.state(), &before);
        prop_assert_eq!(f.engine.history().current_index(), index);
    }
}
