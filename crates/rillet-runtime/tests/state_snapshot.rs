//! Snapshot save/restore across a simulated process restart.
//!
//! Requires the `state-persistence` feature.

use rillet_harness::Harness;
use rillet_runtime::{App, Callback, Navigation, Page, StateSnapshot};
use rillet_state::{bind_local_to_global, init_global, mirror_global_to_local};

fn threshold_app() -> App {
    let page = Page::new("home", "Home", |ctx| {
        init_global(ctx.store_mut(), "global_threshold", 50);
        let _ = mirror_global_to_local(ctx.store_mut(), "_threshold", "global_threshold")?;
        ctx.register_widget("_threshold")?;
        ctx.register_change(
            "_threshold",
            Callback::bind(bind_local_to_global("_threshold", "global_threshold")),
        );
        Ok(())
    });
    App::new(Navigation::new().group("main", vec![page]))
}

#[test]
fn snapshot_survives_a_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    // First process: the user moves the threshold, we save on shutdown.
    {
        let mut harness = Harness::new(threshold_app());
        let sid = harness.open();
        harness.first_load(sid).unwrap();
        harness.set(sid, "_threshold", 80).unwrap();

        let snapshot = StateSnapshot::capture(harness.store(sid));
        snapshot.save_to_path(&path).unwrap();
    }

    // Second process: restore before the first pass, so the initializer
    // sees the restored value and keeps it.
    let mut harness = Harness::new(threshold_app());
    let sid = harness.open();
    StateSnapshot::load_from_path(&path)
        .unwrap()
        .restore(harness.session_mut(sid).store_mut());
    harness.first_load(sid).unwrap();

    assert_eq!(
        harness.store(sid).get("global_threshold").unwrap().as_int(),
        Some(80)
    );
    harness.assert_synced(sid, "_threshold", "global_threshold");
}

#[test]
fn snapshot_excludes_widget_lifetime_state() {
    let mut harness = Harness::new(threshold_app());
    let sid = harness.open();
    harness.first_load(sid).unwrap();

    let snapshot = StateSnapshot::capture(harness.store(sid));
    assert_eq!(snapshot.len(), 1);
    assert!(!snapshot.to_json().unwrap().contains("_threshold"));
}

#[test]
fn restore_before_first_pass_beats_the_initializer() {
    let mut harness = Harness::new(threshold_app());
    let sid = harness.open();

    let json = r#"{"entries":{"global_threshold":{"Int":65}}}"#;
    StateSnapshot::from_json(json)
        .unwrap()
        .restore(harness.session_mut(sid).store_mut());
    harness.first_load(sid).unwrap();

    assert_eq!(
        harness.store(sid).get("_threshold").unwrap().as_int(),
        Some(65)
    );
}
