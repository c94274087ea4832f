//! End-to-end brewing sessions backed by real storage.

mod common;

use cauldron::alchemy::{
    load_names, BrewOutcome, DexFilter, HeatLevel, KeyValueStore, MemoryStore, Progress,
    Selection, Session, SledStore, DEFAULT_LEDGER_KEY,
};
use cauldron::config::{StorageBackend, StorageConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

fn brew_dan_a<S: KeyValueStore>(session: &mut Session<S>, rng: &mut StdRng) -> BrewOutcome {
    session.reset_selection();
    session.toggle_material("靈芝");
    session.toggle_material("人參");
    session.choose_heat(HeatLevel::Low);
    session.brew(rng)
}

#[test]
fn discoveries_persist_between_sessions() {
    let dir = TempDir::new().expect("tempdir");
    let mut rng = StdRng::seed_from_u64(7);
    {
        let store = SledStore::open(dir.path()).expect("sled");
        let mut session = Session::start(common::five_recipe_catalog(), store, DEFAULT_LEDGER_KEY);
        assert_eq!(session.progress().to_string(), "0/5");
        assert!(brew_dan_a(&mut session, &mut rng).is_success());
        // a second success is a no-op for the ledger
        assert!(brew_dan_a(&mut session, &mut rng).is_success());
        assert_eq!(session.progress().to_string(), "1/5");
    }

    let store = SledStore::open(dir.path()).expect("reopen");
    let session = Session::start(common::five_recipe_catalog(), store, DEFAULT_LEDGER_KEY);
    assert!(session.is_unlocked("丹A"));
    assert_eq!(
        session.status_line(),
        "loaded (json): recipes 5, materials 10 | dex 1/5"
    );
}

#[test]
fn catalog_revision_prunes_stale_discoveries() {
    let dir = TempDir::new().expect("tempdir");
    let mut rng = StdRng::seed_from_u64(11);
    {
        let store = SledStore::open(dir.path()).expect("sled");
        let mut session = Session::start(common::five_recipe_catalog(), store, DEFAULT_LEDGER_KEY);
        assert!(brew_dan_a(&mut session, &mut rng).is_success());
        session.select(
            Selection::new()
                .with_heat(HeatLevel::NoneRequired)
                .with_materials(["薄荷", "甘草"]),
        );
        assert!(session.brew(&mut rng).is_success());
        assert_eq!(session.progress().unlocked, 2);
    }

    let store = SledStore::open(dir.path()).expect("reopen");
    let session = Session::start(common::revised_catalog(), store, DEFAULT_LEDGER_KEY);
    assert_eq!(
        session.progress(),
        Progress {
            unlocked: 1,
            total: 2
        }
    );
    assert!(!session.is_unlocked("丹B"));
    assert_eq!(
        load_names(session.ledger().store(), DEFAULT_LEDGER_KEY).len(),
        1
    );
}

#[test]
fn dex_view_reflects_unlocks() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut session = Session::start(
        common::five_recipe_catalog(),
        MemoryStore::new(),
        DEFAULT_LEDGER_KEY,
    );
    session.select(
        Selection::new()
            .with_heat(HeatLevel::High)
            .with_materials(["龍骨", "硃砂"]),
    );
    assert!(session.brew(&mut rng).is_success());

    let unlocked_only = session.dex(&DexFilter::new());
    assert_eq!(unlocked_only.len(), 1);
    assert_eq!(unlocked_only[0].recipe.name, "丹D");
    assert!(unlocked_only[0].unlocked);

    let everything = session.dex(&DexFilter::new().with_locked(true));
    assert_eq!(everything.len(), 5);
    assert!(everything[0].unlocked);
    assert!(everything[1..].iter().all(|entry| !entry.unlocked));

    let search = session.dex(&DexFilter::new().with_locked(true).with_keyword(" 人參 "));
    let found: Vec<&str> = search.iter().map(|e| e.recipe.name.as_str()).collect();
    assert_eq!(found, vec!["丹A", "丹C"]);
}

#[test]
fn failed_brews_never_unlock() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut session = Session::start(
        common::five_recipe_catalog(),
        MemoryStore::new(),
        DEFAULT_LEDGER_KEY,
    );
    let attempts = [
        Selection::new(),
        Selection::new().with_material("茯苓"),
        Selection::new().with_heat(HeatLevel::Low),
        Selection::new().with_heat(HeatLevel::Medium).with_material("茯苓"),
        Selection::new()
            .with_heat(HeatLevel::Low)
            .with_materials(["茯苓", "人參"]),
    ];
    for selection in attempts {
        session.select(selection);
        assert!(!session.brew(&mut rng).is_success());
    }
    assert_eq!(session.progress().unlocked, 0);
    assert!(load_names(session.ledger().store(), DEFAULT_LEDGER_KEY).is_empty());
}

#[test]
fn unopenable_store_falls_back_to_memory() {
    let dir = TempDir::new().expect("tempdir");
    // a regular file where sled expects a directory
    let blocker = dir.path().join("dex");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let storage = StorageConfig {
        backend: StorageBackend::Sled,
        path: blocker.display().to_string(),
        ..StorageConfig::default()
    };
    assert!(storage.open_store().is_err());

    let mut session = Session::start(
        common::five_recipe_catalog(),
        storage.open_store_or_memory(),
        &storage.key,
    );
    let mut rng = StdRng::seed_from_u64(9);
    assert!(brew_dan_a(&mut session, &mut rng).is_success());
    assert!(session.is_unlocked("丹A"));
}

#[test]
fn file_backend_session_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let storage = StorageConfig {
        backend: StorageBackend::File,
        path: dir.path().join("dex.json").display().to_string(),
        ..StorageConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(13);
    {
        let store = storage.open_store().expect("file store");
        let mut session = Session::start(common::five_recipe_catalog(), store, &storage.key);
        assert!(brew_dan_a(&mut session, &mut rng).is_success());
    }
    let store = storage.open_store().expect("file store");
    let session = Session::start(common::five_recipe_catalog(), store, &storage.key);
    assert!(session.is_unlocked("丹A"));
    assert!(session.ledger().is_persistent());
}
