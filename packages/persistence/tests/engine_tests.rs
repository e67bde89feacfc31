//! Integration tests for the persistence engine

use codecanvas_common::ManualClock;
use codecanvas_editor::{
    default_buffers, BufferStore, EditorTheme, ViewTab, CSS_BUFFER, HTML_BUFFER, JS_BUFFER,
};
use codecanvas_persistence::{
    AutosaveTrigger, MemoryStorage, PersistenceEngine, SaveStatus, Snapshot, Storage, StorageError,
    StorageKeys, DEFAULT_AUTOSAVE_DELAY,
};
use std::rc::Rc;
use std::time::Duration;

fn engine_with(storage: MemoryStorage, clock: Rc<ManualClock>) -> PersistenceEngine<MemoryStorage> {
    PersistenceEngine::new(storage, StorageKeys::default(), clock, DEFAULT_AUTOSAVE_DELAY)
}

fn capture(store: &BufferStore) -> Snapshot {
    Snapshot::capture(store.buffers(), store.get_active(), ViewTab::Code, EditorTheme::VsDark)
}

#[test]
fn test_burst_of_edits_schedules_one_save() -> anyhow::Result<()> {
    let clock = Rc::new(ManualClock::at_epoch());
    let mut engine = engine_with(MemoryStorage::new(), clock.clone());
    let mut store = BufferStore::with_default_template();
    store.subscribe(Box::new(AutosaveTrigger::new(engine.debouncer())));

    let mut saves = 0;
    for n in 0..10 {
        store.set_buffer_value(CSS_BUFFER, format!("p {{ margin: {n}px; }}"))?;
        clock.advance(Duration::from_millis(500));
        if engine.autosave_due() {
            saves += 1;
        }
    }
    assert_eq!(saves, 0);

    clock.advance(DEFAULT_AUTOSAVE_DELAY);
    if engine.autosave_due() {
        engine.save_now(&capture(&store))?;
        saves += 1;
    }
    assert!(!engine.autosave_due());
    assert_eq!(saves, 1);

    // A later edit starts a fresh cycle
    store.set_buffer_value(JS_BUFFER, "console.log(1)")?;
    assert!(engine.has_pending_autosave());
    clock.advance(DEFAULT_AUTOSAVE_DELAY);
    assert!(engine.autosave_due());
    assert!(!engine.autosave_due());
    Ok(())
}

#[test]
fn test_quota_failure_purges_and_retries_once() -> anyhow::Result<()> {
    let clock = Rc::new(ManualClock::at_epoch());
    let store = BufferStore::with_default_template();
    let snapshot = capture(&store);
    let payload_len = serde_json::to_string(&snapshot.buffers)?.len();

    // Room for the buffers only once the archive is gone
    let mut storage = MemoryStorage::with_quota(payload_len + 400);
    storage.insert("codecanvas:archive:old", "x".repeat(payload_len));
    storage.insert("unrelated", "kept");

    let mut engine = engine_with(storage, clock);
    engine.save_now(&snapshot)?;

    assert_eq!(engine.status(), Some(SaveStatus::Saved));
    assert!(!engine.storage().contains("codecanvas:archive:old"));
    assert!(engine.storage().contains("unrelated"));
    assert!(engine.storage().contains("codecanvas:files"));
    Ok(())
}

#[test]
fn test_persistent_failure_ends_in_error_status() {
    let clock = Rc::new(ManualClock::at_epoch());
    let mut storage = MemoryStorage::new();
    storage.fail_next_writes(2);
    storage.insert("codecanvas:archive:a", "1");
    storage.insert("codecanvas:archive:b", "2");

    let mut engine = engine_with(storage, clock);
    let store = BufferStore::with_default_template();

    let result = engine.save_now(&capture(&store));

    assert!(matches!(result, Err(StorageError::Unavailable(_))));
    assert_eq!(engine.status(), Some(SaveStatus::Error));
    assert_eq!(
        engine.drain_status_changes(),
        vec![SaveStatus::Saving, SaveStatus::Error]
    );
    // First attempt plus exactly one retry
    assert_eq!(engine.storage().write_attempts(), 2);
    assert!(engine.storage().is_empty());
    assert_eq!(engine.last_saved(), None);

    // In-memory state is untouched
    assert_eq!(store.buffers(), &default_buffers());
}

#[test]
fn test_restore_round_trip_across_restart() -> anyhow::Result<()> {
    let clock = Rc::new(ManualClock::at_epoch());
    let mut store = BufferStore::with_default_template();
    store.set_buffer_value(HTML_BUFFER, "<h1>A</h1>")?;
    store.set_buffer_value(CSS_BUFFER, "h1 { color: teal; }")?;
    store.set_buffer_value(JS_BUFFER, "console.log('C')")?;
    store.set_active(CSS_BUFFER)?;

    let mut engine = engine_with(MemoryStorage::new(), clock.clone());
    let snapshot = Snapshot::capture(
        store.buffers(),
        store.get_active(),
        ViewTab::Preview,
        EditorTheme::Dracula,
    );
    engine.save_now(&snapshot)?;

    // Restart
    let storage = engine.into_storage();
    let engine = engine_with(storage, clock);
    let restored = engine.restore().ok_or_else(|| anyhow::anyhow!("nothing restored"))?;

    assert_eq!(restored.buffers, snapshot.buffers);
    assert_eq!(restored.active_buffer, CSS_BUFFER);
    assert_eq!(restored.active_tab, ViewTab::Preview);
    assert_eq!(restored.theme, EditorTheme::Dracula);

    let buffers = restored.apply_to(&default_buffers());
    assert_eq!(&buffers, store.buffers());
    Ok(())
}

#[test]
fn test_corrupt_payload_restores_nothing() {
    let clock = Rc::new(ManualClock::at_epoch());
    let mut storage = MemoryStorage::new();
    storage.insert("codecanvas:files", "{not json");

    let engine = engine_with(storage, clock);
    assert!(engine.restore().is_none());
}

#[test]
fn test_unreadable_storage_restores_nothing() {
    let clock = Rc::new(ManualClock::at_epoch());
    let mut storage = MemoryStorage::new();
    storage.insert("codecanvas:files", "{}");
    storage.set_unreadable(true);

    let engine = engine_with(storage, clock);
    assert!(engine.restore().is_none());
    assert_eq!(engine.restore_preferences().theme, None);
}

#[test]
fn test_selection_is_written_immediately() -> anyhow::Result<()> {
    let clock = Rc::new(ManualClock::at_epoch());
    let mut engine = engine_with(MemoryStorage::new(), clock);

    engine.persist_theme(EditorTheme::HighContrast)?;
    engine.persist_active_tab(ViewTab::Preview)?;
    engine.persist_active_buffer(JS_BUFFER)?;

    assert!(!engine.has_pending_autosave());
    assert_eq!(engine.storage().get("codecanvas:theme")?.as_deref(), Some("hc-black"));
    assert_eq!(engine.storage().get("codecanvas:active-tab")?.as_deref(), Some("preview"));

    let preferences = engine.restore_preferences();
    assert_eq!(preferences.active_buffer.as_deref(), Some(JS_BUFFER));
    Ok(())
}

#[test]
fn test_flush_only_saves_pending_work() -> anyhow::Result<()> {
    let clock = Rc::new(ManualClock::at_epoch());
    let mut engine = engine_with(MemoryStorage::new(), clock);
    let snapshot =
        Snapshot::capture(&default_buffers(), HTML_BUFFER, ViewTab::Code, EditorTheme::VsDark);

    assert!(engine.flush(&snapshot).is_none());

    engine.schedule_autosave();
    assert!(matches!(engine.flush(&snapshot), Some(Ok(_))));
    assert!(!engine.has_pending_autosave());
    assert!(engine.flush(&snapshot).is_none());
    Ok(())
}

#[test]
fn test_flush_retries_after_failed_save() -> anyhow::Result<()> {
    let clock = Rc::new(ManualClock::at_epoch());
    let mut storage = MemoryStorage::new();
    storage.fail_next_writes(2);
    let mut engine = engine_with(storage, clock);
    let snapshot =
        Snapshot::capture(&default_buffers(), HTML_BUFFER, ViewTab::Code, EditorTheme::VsDark);

    assert!(engine.save_now(&snapshot).is_err());
    assert!(!engine.has_pending_autosave());
    assert!(engine.has_unsaved_changes());

    assert!(matches!(engine.flush(&snapshot), Some(Ok(_))));
    assert!(engine.storage().contains("codecanvas:files"));
    assert!(!engine.has_unsaved_changes());
    assert!(engine.flush(&snapshot).is_none());
    Ok(())
}
