use std::fs;
use std::io::Cursor;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use tabshell::host::{MemoryHost, MemorySurface};
use tabshell::shell::{parse_action, Shell};
use tabshell::types::action::Action;
use tabshell::types::effect::Effect;
use tabshell::types::errors::ReplayError;
use tabshell::types::settings::ShellSettings;
use tabshell::types::tab::{TabId, WindowId};

fn settings_without_locales() -> ShellSettings {
    ShellSettings {
        locales_dir: "/nonexistent/locales".to_string(),
        ..ShellSettings::default()
    }
}

fn shell() -> Shell<MemoryHost> {
    Shell::new(
        settings_without_locales(),
        MemoryHost::new().with_active_window(WindowId(1)),
    )
}

fn action(value: serde_json::Value) -> Action {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_dispatch_runs_effects_against_host() {
    let mut shell = shell();
    shell.dispatch(action(json!({
        "actionType": "create-tab-requested",
        "createProperties": {"url": "https://a.test"}
    })));

    assert_eq!(shell.state().tabs.len(), 1);
    let surface = shell.host().surfaces.get(&TabId(1)).unwrap();
    assert_eq!(surface.entries, vec!["https://a.test".to_string()]);
    assert!(matches!(shell.host().executed[0], Effect::CreateSurface { .. }));
}

#[test]
fn test_dispatch_of_ignored_action_keeps_snapshot() {
    let mut shell = shell();
    let before = Arc::clone(shell.state());
    shell.dispatch(Action::Unknown);
    shell.dispatch(action(json!({"actionType": "go-back", "tabId": 5})));
    assert!(Arc::ptr_eq(&before, shell.state()));
    assert!(shell.host().executed.is_empty());
}

#[test]
fn test_effects_drive_surface_history() {
    let mut shell = shell();
    shell.dispatch(action(json!({"actionType": "create-tab-requested", "createProperties": {"url": "https://a.test"}})));
    shell.dispatch(action(json!({"actionType": "load-url-requested", "tabId": 1, "url": "https://b.test"})));
    shell.dispatch(action(json!({"actionType": "go-back", "tabId": 1})));

    let surface = shell.host().surfaces.get(&TabId(1)).unwrap();
    assert_eq!(surface.current_index, Some(0));
    assert_eq!(shell.state().tabs.get(&TabId(1)).unwrap().url, "https://a.test");

    // The surface now reports the earlier URL, so a plugin grant for it applies.
    shell.dispatch(action(json!({"actionType": "allow-flash-once", "tabId": 1, "url": "https://a.test"})));
    let surface = shell.host().surfaces.get(&TabId(1)).unwrap();
    assert_eq!(surface.authorized_plugins, vec!["flash".to_string()]);
}

#[test]
fn test_closed_surface_is_marked_destroyed() {
    let mut shell = shell();
    shell.dispatch(action(json!({"actionType": "create-tab-requested"})));
    shell.dispatch(action(json!({"actionType": "tab-closed", "tabValue": {"tabId": 1}})));
    assert!(shell.host().surfaces.get(&TabId(1)).unwrap().destroyed);
    assert!(shell.state().tabs.is_empty());
}

#[test]
fn test_snapshot_reflects_state() {
    let mut shell = shell();
    shell.dispatch(action(json!({"actionType": "create-tab-requested"})));
    shell.dispatch(action(json!({"actionType": "create-tab-requested", "createProperties": {"active": false}})));
    let snapshot = shell.snapshot();
    assert_eq!(snapshot.tabs.len(), 2);
    assert_eq!(snapshot.active_tabs.len(), 1);
    assert_eq!(snapshot.active_tabs[0].tab_id, TabId(1));
}

#[test]
fn test_frame_error_title_uses_loaded_locale() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("ru.json"),
        json!({"errors": {"-106": "Нет подключения к интернету"}}).to_string(),
    )
    .unwrap();
    fs::write(dir.path().join("en.json"), json!({"errors": {}}).to_string()).unwrap();

    let settings = ShellSettings {
        locale: "ru".to_string(),
        locales_dir: dir.path().to_string_lossy().to_string(),
        ..ShellSettings::default()
    };
    let host = MemoryHost::new()
        .with_active_window(WindowId(1))
        .with_surface(TabId(1), MemorySurface::new("https://a.test"));
    let mut shell = Shell::new(settings, host);
    shell.dispatch(action(json!({
        "actionType": "tab-created",
        "tab": {"tabId": 1, "url": "https://a.test"}
    })));
    shell.dispatch(action(json!({
        "actionType": "frame-error-set",
        "frameProps": {"tabId": 1},
        "errorDetails": {"url": "https://offline.test", "errorCode": -106}
    })));

    let about = shell.state().tabs.get(&TabId(1)).unwrap().about_details.clone().unwrap();
    assert_eq!(about.title, "Нет подключения к интернету");
    assert_eq!(about.previous_location.as_deref(), Some("https://a.test"));
}

#[test]
fn test_replay_skips_blank_and_malformed_lines() {
    let mut shell = shell();
    let input = concat!(
        "{\"actionType\": \"create-tab-requested\"}\n",
        "\n",
        "not json\n",
        "{\"actionType\": \"go-back\"}\n",
        "{\"actionType\": \"create-tab-requested\", \"createProperties\": {\"url\": \"https://b.test\"}}\n",
    );
    let dispatched = shell.replay(Cursor::new(input)).unwrap();
    assert_eq!(dispatched, 2);
    assert_eq!(shell.state().tabs.len(), 2);
}

#[test]
fn test_parse_action_reports_line_number() {
    match parse_action(7, "{\"actionType\": \"go-back\"}") {
        Err(ReplayError::Parse { line, .. }) => assert_eq!(line, 7),
        other => panic!("expected parse error, got {:?}", other),
    }
    assert_eq!(parse_action(1, "{\"actionType\": \"drag-ended\"}").unwrap(), Action::DragEnded);
}
