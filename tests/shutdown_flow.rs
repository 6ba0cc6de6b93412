//! End-to-end: save from the UI, terminate, restart, read back.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use timer_keeper::{
    shutdown::{PauseSummary, ShutdownOutcome},
    Document, StateStore, TerminationHook, TimerRecord, TimerState,
};

const NOW: i64 = 1_700_000_000_000;

#[test]
fn running_timer_is_frozen_across_restart() {
    let dir = TempDir::new().unwrap();

    {
        let store = Arc::new(StateStore::open(dir.path()).unwrap());
        let mut doc = Document::default();
        doc.timers.insert("heist".into(), TimerRecord::cooldown(NOW + 120_000));
        store.save(&doc).unwrap();

        let hook = TerminationHook::new(Arc::clone(&store));
        let outcome = hook.persist_paused_at(NOW + 30_000).unwrap();
        assert!(matches!(outcome, ShutdownOutcome::Persisted(PauseSummary { paused: 1, .. })));
    }

    // A fresh process opening the same directory.
    let store = StateStore::open(dir.path()).unwrap();
    let doc = store.load();
    assert!(doc.is_paused);
    let heist = &doc.timers["heist"];
    assert_eq!(heist.state, TimerState::Paused);
    assert_eq!(heist.remaining_millis(), Some(90_000));
    assert!(!store.tmp_path().exists());
}

#[test]
fn frontend_document_survives_shutdown_pause() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(StateStore::open(dir.path()).unwrap());

    let doc: Document = serde_json::from_value(json!({
        "isPaused": false,
        "timers": {
            "heist":     { "state": "cooldown", "endTime": (NOW + 5_000).to_string(), "remaining": "" },
            "expired":   { "state": "cooldown", "endTime": NOW - 1, "remaining": "" },
            "garbage":   { "state": "cooldown", "endTime": "not-a-number" },
            "nightclub": { "state": "ready", "endTime": "", "remaining": "", "label": "Nightclub" },
            "bunker":    { "state": "paused", "remaining": "42000" }
        }
    }))
    .unwrap();
    store.save(&doc).unwrap();

    TerminationHook::new(Arc::clone(&store))
        .persist_paused_at(NOW)
        .unwrap();

    let saved = serde_json::to_value(store.load()).unwrap();
    assert_eq!(saved["isPaused"], true);
    assert_eq!(saved["timers"]["heist"]["state"], "paused");
    assert_eq!(saved["timers"]["heist"]["remaining"], 5_000);
    assert_eq!(saved["timers"]["expired"]["remaining"], 0);
    assert_eq!(saved["timers"]["garbage"]["state"], "default");
    assert_eq!(saved["timers"]["garbage"]["remaining"], 0);
    assert_eq!(
        saved["timers"]["nightclub"],
        json!({ "state": "ready", "endTime": "", "remaining": "", "label": "Nightclub" })
    );
    assert_eq!(saved["timers"]["bunker"], json!({ "state": "paused", "remaining": "42000" }));

    let names: Vec<String> = store.load().timers.keys().cloned().collect();
    assert_eq!(names, ["heist", "expired", "garbage", "nightclub", "bunker"]);
}

#[test]
fn corrupt_file_recovers_and_is_replaced_on_next_save() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::open(dir.path()).unwrap();
    std::fs::write(store.path(), b"\x00\x01 definitely not json").unwrap();

    assert_eq!(store.load(), Document::default());

    let mut doc = Document::default();
    doc.timers.insert("acid".into(), TimerRecord::paused(1_000));
    store.save(&doc).unwrap();
    assert_eq!(store.load(), doc);
}
