use tabshell::host::{MemoryHost, ReduceContext};
use tabshell::managers::{tab_lifecycle, tab_registry};
use tabshell::services::localization_engine::LocalizationEngine;
use tabshell::types::action::{BrowserOpts, CloneOptions, CreateProperties, FrameOpts, FrameUpdate, TabDescriptor};
use tabshell::types::effect::Effect;
use tabshell::types::errors::TabError;
use tabshell::types::history::{NavigationEntry, NavigationHistory};
use tabshell::types::settings::ShellSettings;
use tabshell::types::state::{ActiveTabEntry, AppState, StateSnapshot};
use tabshell::types::tab::{FrameKey, MessageBoxDetail, MessageBoxResponse, TabId, TabRecord, WindowId};

/// Collaborators for one test: the host reports window 1 as focused.
struct Fixture {
    host: MemoryHost,
    text: LocalizationEngine,
    settings: ShellSettings,
}

impl Fixture {
    fn new() -> Self {
        Self {
            host: MemoryHost::new().with_active_window(WindowId(1)),
            text: LocalizationEngine::new("/nonexistent/locales"),
            settings: ShellSettings::default(),
        }
    }

    fn ctx(&self) -> ReduceContext<'_> {
        ReduceContext {
            surfaces: &self.host,
            windows: &self.host,
            error_text: &self.text,
            settings: &self.settings,
        }
    }
}

fn record(tab_id: i32, window_id: i32) -> TabRecord {
    TabRecord::new(
        TabId(tab_id),
        WindowId(window_id),
        FrameKey(tab_id),
        &format!("https://tab{}.test", tab_id),
    )
}

fn seeded(tabs: Vec<TabRecord>) -> AppState {
    let mut state = AppState::new();
    for tab in tabs {
        tab_registry::insert_tab(&mut state, tab, None);
    }
    state
}

fn order(state: &AppState, window_id: i32) -> Vec<i32> {
    state
        .tab_order
        .get(&WindowId(window_id))
        .map(|o| o.iter().map(|id| id.0).collect())
        .unwrap_or_default()
}

// === init ===

#[test]
fn test_init_drops_foreign_active_pointer_and_repairs_history() {
    let mut broken = record(1, 1);
    broken.history = NavigationHistory {
        entries: vec![NavigationEntry::new("https://tab1.test")].into_iter().collect(),
        current_index: Some(5),
    };
    let snapshot = StateSnapshot {
        tabs: vec![broken, record(2, 2)],
        active_tabs: vec![
            ActiveTabEntry {
                window_id: WindowId(1),
                tab_id: TabId(2),
            },
            ActiveTabEntry {
                window_id: WindowId(2),
                tab_id: TabId(2),
            },
        ],
    };
    let state = tab_lifecycle::init(&AppState::new(), &snapshot);
    assert_eq!(state.active_tabs.get(&WindowId(1)), None);
    assert_eq!(state.active_tabs.get(&WindowId(2)), Some(&TabId(2)));
    assert_eq!(state.tabs.get(&TabId(1)).unwrap().history.current_index, Some(0));
}

#[test]
fn test_init_snapshot_round_trips_through_state() {
    let mut state = seeded(vec![record(1, 1), record(2, 1), record(3, 2)]);
    tab_registry::set_active(&mut state, TabId(2)).unwrap();
    let snapshot = StateSnapshot::from(&state);
    let rebuilt = tab_lifecycle::init(&AppState::new(), &snapshot);
    assert_eq!(rebuilt.tabs, state.tabs);
    assert_eq!(rebuilt.tab_order, state.tab_order);
    assert_eq!(rebuilt.active_tabs, state.active_tabs);
}

// === create ===

#[test]
fn test_create_tab_uses_requested_placement() {
    let fx = Fixture::new();
    let mut state = seeded(vec![record(1, 1), record(2, 1)]);
    tab_registry::set_active(&mut state, TabId(1)).unwrap();
    let mut effects = Vec::new();
    let props = CreateProperties {
        url: Some("https://new.test".to_string()),
        index: Some(1),
        active: Some(false),
        partition_number: Some(3),
        ..CreateProperties::default()
    };
    let next = tab_lifecycle::create_tab(&state, &props, &fx.ctx(), &mut effects).unwrap();
    assert_eq!(order(&next, 1), vec![1, 3, 2]);
    assert_eq!(next.tabs.get(&TabId(3)).unwrap().partition_number, 3);
    assert_eq!(
        effects,
        vec![Effect::CreateSurface {
            tab_id: TabId(3),
            window_id: WindowId(1),
            url: "https://new.test".to_string(),
            partition_number: 3,
            active: false,
            index: 1,
        }]
    );
}

#[test]
fn test_create_tab_in_explicit_window() {
    let fx = Fixture::new();
    let mut effects = Vec::new();
    let props = CreateProperties {
        window_id: Some(WindowId(5)),
        pinned: Some(true),
        ..CreateProperties::default()
    };
    let next = tab_lifecycle::create_tab(&AppState::new(), &props, &fx.ctx(), &mut effects).unwrap();
    let tab = next.tabs.get(&TabId(1)).unwrap();
    assert_eq!(tab.window_id, WindowId(5));
    assert!(tab.pinned);
    assert_eq!(tab.url, fx.settings.default_url);
}

#[test]
fn test_maybe_create_tab_upsert_moves_to_new_window() {
    let fx = Fixture::new();
    let state = seeded(vec![record(1, 1), record(2, 1)]);
    let desc = TabDescriptor {
        window_id: Some(WindowId(4)),
        ..TabDescriptor::new(TabId(2))
    };
    let next = tab_lifecycle::maybe_create_tab(&state, &desc, &fx.ctx()).unwrap();
    assert_eq!(order(&next, 1), vec![1]);
    assert_eq!(order(&next, 4), vec![2]);
    // Only tab of the new window becomes its active tab.
    assert_eq!(next.active_tabs.get(&WindowId(4)), Some(&TabId(2)));
}

// === move ===

#[test]
fn test_move_after_sibling_by_frame_key() {
    let state = seeded(vec![record(1, 1), record(2, 1), record(3, 1), record(4, 1)]);
    let mut effects = Vec::new();
    let opts = FrameOpts {
        index_by_frame_key: Some(FrameKey(3)),
        ..FrameOpts::default()
    };
    let next = tab_lifecycle::move_to(&state, TabId(1), &opts, &BrowserOpts::default(), WindowId::NONE, &mut effects)
        .unwrap();
    assert_eq!(order(&next, 1), vec![2, 3, 1, 4]);
    assert!(effects.is_empty());
}

#[test]
fn test_move_before_sibling_by_frame_key() {
    let state = seeded(vec![record(1, 1), record(2, 1), record(3, 1), record(4, 1)]);
    let mut effects = Vec::new();
    let opts = FrameOpts {
        index_by_frame_key: Some(FrameKey(2)),
        prepend_index_by_frame_key: true,
        ..FrameOpts::default()
    };
    let next = tab_lifecycle::move_to(&state, TabId(4), &opts, &BrowserOpts::default(), WindowId(1), &mut effects)
        .unwrap();
    assert_eq!(order(&next, 1), vec![1, 4, 2, 3]);
}

#[test]
fn test_move_onto_itself_keeps_position() {
    let state = seeded(vec![record(1, 1), record(2, 1), record(3, 1)]);
    let mut effects = Vec::new();
    let opts = FrameOpts {
        index_by_frame_key: Some(FrameKey(2)),
        ..FrameOpts::default()
    };
    let next = tab_lifecycle::move_to(&state, TabId(2), &opts, &BrowserOpts::default(), WindowId(1), &mut effects)
        .unwrap();
    assert_eq!(next, state);
}

#[test]
fn test_move_to_new_window_attaches_surface() {
    let state = seeded(vec![record(1, 1), record(2, 1)]);
    let mut effects = Vec::new();
    let browser = BrowserOpts {
        position_by_mouse_cursor: true,
    };
    let next = tab_lifecycle::move_to(&state, TabId(2), &FrameOpts::default(), &browser, WindowId(9), &mut effects)
        .unwrap();
    assert_eq!(order(&next, 9), vec![2]);
    assert_eq!(next.active_tabs.get(&WindowId(9)), Some(&TabId(2)));
    assert_eq!(
        effects,
        vec![Effect::AttachToWindow {
            tab_id: TabId(2),
            window_id: WindowId(9),
            index: 0,
            position_by_mouse_cursor: true,
        }]
    );
}

#[test]
fn test_move_missing_tab_emits_nothing() {
    let state = seeded(vec![record(1, 1)]);
    let mut effects = Vec::new();
    let result = tab_lifecycle::move_to(
        &state,
        TabId(8),
        &FrameOpts::default(),
        &BrowserOpts::default(),
        WindowId(2),
        &mut effects,
    );
    assert_eq!(result, Err(TabError::NotFound(TabId(8))));
    assert!(effects.is_empty());
}

// === close / clone ===

#[test]
fn test_refused_close_emits_nothing() {
    let fx = Fixture::new();
    let mut pinned = record(1, 1);
    pinned.pinned = true;
    let state = seeded(vec![pinned]);
    let mut effects = Vec::new();
    let result = tab_lifecycle::close_tab(&state, TabId(1), false, &fx.ctx(), &mut effects);
    assert_eq!(result, Err(TabError::PinnedCloseRefused(TabId(1))));
    assert!(effects.is_empty());
}

#[test]
fn test_clone_resets_per_tab_flags() {
    let mut source = record(1, 1);
    source.pinned = true;
    source.audio_muted = true;
    source.dev_tools_open = true;
    source.message_box_detail = Some(MessageBoxDetail {
        title: None,
        message: "hi".to_string(),
        buttons: MessageBoxDetail::default_buttons(),
        cancel_id: None,
        show_suppress: false,
        suppress: false,
    });
    let state = seeded(vec![source, record(2, 1)]);
    let mut effects = Vec::new();
    let next = tab_lifecycle::clone_tab(&state, TabId(1), &CloneOptions::default(), &mut effects).unwrap();
    let clone = next.tabs.get(&TabId(3)).unwrap();
    assert!(!clone.pinned);
    assert!(!clone.audio_muted);
    assert!(!clone.dev_tools_open);
    assert!(clone.message_box_detail.is_none());
    assert_ne!(clone.frame_key, FrameKey(1));
    // Unpinned clone lands right after the pinned section.
    assert_eq!(order(&next, 1), vec![1, 3, 2]);
}

// === pin / mute / frame updates ===

#[test]
fn test_pin_with_explicit_value_is_idempotent() {
    let state = seeded(vec![record(1, 1), record(2, 1)]);
    let once = tab_lifecycle::pin(&state, TabId(2), Some(true)).unwrap();
    let twice = tab_lifecycle::pin(&once, TabId(2), Some(true)).unwrap();
    assert_eq!(order(&once, 1), vec![2, 1]);
    assert_eq!(once, twice);
}

#[test]
fn test_set_audio_muted_emits_effect_on_change_only() {
    let state = seeded(vec![record(1, 1)]);
    let mut effects = Vec::new();
    let muted = tab_lifecycle::set_audio_muted(&state, TabId(1), true, &mut effects).unwrap();
    let again = tab_lifecycle::set_audio_muted(&muted, TabId(1), true, &mut effects).unwrap();
    assert_eq!(muted, again);
    assert_eq!(
        effects,
        vec![Effect::SetAudioMuted {
            tab_id: TabId(1),
            muted: true
        }]
    );
}

#[test]
fn test_update_frame_applies_pin_change() {
    let state = seeded(vec![record(1, 1), record(2, 1)]);
    let frame = FrameUpdate {
        pinned: Some(true),
        key: Some(FrameKey(77)),
        ..FrameUpdate::new(TabId(2))
    };
    let next = tab_lifecycle::update_frame(&state, &frame).unwrap();
    assert!(next.tabs.get(&TabId(2)).unwrap().pinned);
    assert_eq!(next.tabs.get(&TabId(2)).unwrap().frame_key, FrameKey(77));
    assert_eq!(order(&next, 1), vec![2, 1]);
    assert_eq!(next.next_frame_key, 78);
}

#[test]
fn test_load_url_in_active_tab_without_active_tab() {
    let fx = Fixture::new();
    let state = seeded(vec![record(1, 1)]);
    let mut effects = Vec::new();
    let result = tab_lifecycle::load_url_in_active_tab(&state, WindowId::NONE, "https://x.test", &fx.ctx(), &mut effects);
    assert_eq!(result, Err(TabError::WindowNotFound(WindowId(1))));
}

// === message boxes ===

#[test]
fn test_message_box_response_for_cancel() {
    let detail = MessageBoxDetail {
        title: Some("Confirm".to_string()),
        message: "Leave?".to_string(),
        buttons: vec!["ok".to_string(), "cancel".to_string()],
        cancel_id: Some(1),
        show_suppress: true,
        suppress: true,
    };
    assert_eq!(
        detail.response_for(Some(1)),
        MessageBoxResponse {
            result: false,
            suppress: true
        }
    );
    assert!(!detail.response_for(None).result);
    assert!(detail.response_for(Some(0)).result);

    let no_cancel = MessageBoxDetail {
        cancel_id: None,
        ..detail
    };
    assert!(no_cancel.response_for(None).result);
}

#[test]
fn test_update_message_box_replaces_content() {
    let state = seeded(vec![record(1, 1)]);
    let first = MessageBoxDetail {
        title: None,
        message: "first".to_string(),
        buttons: MessageBoxDetail::default_buttons(),
        cancel_id: None,
        show_suppress: false,
        suppress: false,
    };
    let second = MessageBoxDetail {
        message: "second".to_string(),
        ..first.clone()
    };
    let shown = tab_lifecycle::show_message_box(&state, TabId(1), &first).unwrap();
    let updated = tab_lifecycle::update_message_box(&shown, TabId(1), &second).unwrap();
    assert_eq!(updated.tabs.get(&TabId(1)).unwrap().message_box_detail, Some(second));
}
