// Integration tests for account-admin

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use account_admin::api::{Account, AccountId, Gender, MemoryAccountApi, Operation};
use account_admin::app::update::{drain_events, handle_event, handle_key, refresh};
use account_admin::app::{AccountView, AppEvent, AppState, DeleteChoice, Exit, Keymap, Level, ModalState, Theme};
use account_admin::error::ApiError;
use account_admin::gate::{GateState, Ticker};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn sample_account() -> Account {
    let mut a = Account::new(AccountId::new("1"), "jdoe", "MEMBER");
    a.full_name = Some("Jane Doe".into());
    a.email = Some("jane@example.com".into());
    a.gender = Some(Gender::Female);
    a
}

fn backend() -> Arc<MemoryAccountApi> {
    Arc::new(MemoryAccountApi::with_accounts([sample_account()]))
}

/// App state whose real countdown timer never fires during a test; ticks are fed by hand.
fn app_with(api: Arc<MemoryAccountApi>) -> AppState {
    let mut app = AppState::new(AccountId::new("1"), api, Theme::dark(), Keymap::default());
    app.tick_period = Duration::from_secs(3600);
    app
}

fn wait_until(app: &mut AppState, pred: impl Fn(&AppState) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if pred(app) {
            return true;
        }
        if let Some(ev) = app.recv_event_timeout(Duration::from_millis(20)) {
            handle_event(app, ev);
        }
    }
    pred(app)
}

fn loaded_app(api: Arc<MemoryAccountApi>) -> AppState {
    let mut app = app_with(api);
    refresh(&mut app);
    assert!(wait_until(&mut app, |a| a.account.account().is_some()), "account did not load");
    app
}

fn press(app: &mut AppState, code: KeyCode) {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn tick(app: &mut AppState) {
    let id = app.delete_gate.timer().map(Ticker::id).expect("countdown timer running");
    handle_event(app, AppEvent::Tick(id));
}

fn latest_notice(app: &AppState) -> Option<(Level, String)> {
    app.notifications.latest(1).next().map(|n| (n.level, n.message.clone()))
}

#[test]
fn loads_account_on_refresh() {
    let app = loaded_app(backend());
    let account = app.account.account().expect("loaded");
    assert_eq!(account.username, "jdoe");
}

#[test]
fn missing_account_and_backend_errors_are_distinguished() {
    let api = Arc::new(MemoryAccountApi::new());
    let mut app = app_with(api.clone());
    refresh(&mut app);
    assert!(wait_until(&mut app, |a| matches!(a.account, AccountView::Missing)));

    api.insert(sample_account());
    api.fail_next(Operation::Fetch, "connection refused");
    refresh(&mut app);
    assert!(wait_until(&mut app, |a| matches!(a.account, AccountView::Failed(_))));
    if let AccountView::Failed(msg) = &app.account {
        assert!(msg.contains("connection refused"));
    }
}

#[test]
fn delete_requires_countdown_then_deletes_and_leaves() {
    let api = backend();
    let mut app = loaded_app(api.clone());

    press(&mut app, KeyCode::Delete);
    assert_eq!(
        app.delete_gate.state(),
        GateState {
            visible: true,
            remaining_seconds: 3,
            action_enabled: false
        }
    );

    // locked: neither shortcut nor button does anything yet
    press(&mut app, KeyCode::Char('y'));
    press(&mut app, KeyCode::Right);
    assert_eq!(app.delete_focus, DeleteChoice::Delete);
    press(&mut app, KeyCode::Enter);
    assert!(app.delete_gate.is_open());
    assert!(!app.delete_in_flight);

    tick(&mut app);
    assert_eq!(app.delete_gate.state().remaining_seconds, 2);
    tick(&mut app);
    tick(&mut app);
    assert!(app.delete_gate.state().action_enabled);

    press(&mut app, KeyCode::Enter);
    assert!(!app.delete_gate.is_open());
    assert!(app.delete_in_flight);

    assert!(wait_until(&mut app, |a| a.exit.is_some()));
    assert_eq!(app.exit, Some(Exit::Deleted(AccountId::new("1"))));
    assert_eq!(api.calls(Operation::Delete), 1);
    assert!(api.get(&AccountId::new("1")).is_none());
    assert_eq!(latest_notice(&app).map(|n| n.0), Some(Level::Success));
}

#[test]
fn failed_delete_notifies_and_keeps_gate_closed() {
    let api = backend();
    api.fail_next(Operation::Delete, "network down");
    let mut app = loaded_app(api.clone());

    press(&mut app, KeyCode::Char('d'));
    for _ in 0..3 {
        tick(&mut app);
    }
    press(&mut app, KeyCode::Char('y'));
    assert!(wait_until(&mut app, |a| !a.delete_in_flight));

    assert!(!app.delete_gate.is_open());
    assert_eq!(app.exit, None);
    assert!(api.get(&AccountId::new("1")).is_some());
    let (level, msg) = latest_notice(&app).expect("notice");
    assert_eq!(level, Level::Error);
    assert!(msg.contains("network down"));
    assert_eq!(api.calls(Operation::Delete), 1);
}

#[test]
fn late_tick_after_cancel_changes_nothing() {
    let mut app = loaded_app(backend());
    press(&mut app, KeyCode::Delete);
    let timer = app.delete_gate.timer().map(Ticker::id).expect("timer");
    tick(&mut app);
    press(&mut app, KeyCode::Esc);
    assert!(!app.delete_gate.is_open());

    let before = app.delete_gate.state();
    handle_event(&mut app, AppEvent::Tick(timer));
    assert_eq!(app.delete_gate.state(), before);
}

#[test]
fn tick_from_previous_opening_does_not_advance_new_countdown() {
    let mut app = loaded_app(backend());
    press(&mut app, KeyCode::Delete);
    let old = app.delete_gate.timer().map(Ticker::id).expect("timer");
    tick(&mut app);
    press(&mut app, KeyCode::Char('n'));

    press(&mut app, KeyCode::Delete);
    assert_eq!(app.delete_gate.state().remaining_seconds, 3);
    handle_event(&mut app, AppEvent::Tick(old));
    assert_eq!(app.delete_gate.state().remaining_seconds, 3);
    assert_eq!(app.delete_focus, DeleteChoice::Cancel);
}

#[test]
fn enter_on_cancel_button_closes_prompt() {
    let api = backend();
    let mut app = loaded_app(api.clone());
    press(&mut app, KeyCode::Delete);
    for _ in 0..3 {
        tick(&mut app);
    }
    press(&mut app, KeyCode::Enter);
    assert!(!app.delete_gate.is_open());
    assert!(!app.delete_in_flight);
    assert_eq!(api.calls(Operation::Delete), 0);
}

#[test]
fn delete_cannot_be_requested_again_while_in_flight() {
    let api = Arc::new(
        MemoryAccountApi::with_accounts([sample_account()]).with_latency(Duration::from_millis(200)),
    );
    let mut app = loaded_app(api.clone());
    press(&mut app, KeyCode::Delete);
    for _ in 0..3 {
        tick(&mut app);
    }
    press(&mut app, KeyCode::Char('y'));
    assert!(app.delete_in_flight);

    press(&mut app, KeyCode::Delete);
    assert!(!app.delete_gate.is_open());
    assert_eq!(latest_notice(&app).map(|n| n.0), Some(Level::Info));

    assert!(wait_until(&mut app, |a| a.exit.is_some()));
    assert_eq!(api.calls(Operation::Delete), 1);
}

#[test]
fn screen_keys_are_ignored_while_prompt_is_open() {
    let mut app = loaded_app(backend());
    press(&mut app, KeyCode::Delete);
    press(&mut app, KeyCode::Char('q'));
    press(&mut app, KeyCode::Char('a'));
    assert_eq!(app.exit, None);
    assert!(app.modal.is_none());
    assert!(app.delete_gate.is_open());
}

#[test]
fn delete_needs_a_loaded_account() {
    let mut app = app_with(backend());
    press(&mut app, KeyCode::Delete);
    assert!(!app.delete_gate.is_open());
}

#[test]
fn real_ticker_arms_the_gate() {
    let mut app = loaded_app(backend());
    app.tick_period = Duration::from_millis(20);
    press(&mut app, KeyCode::Delete);
    assert!(wait_until(&mut app, |a| a.delete_gate.is_ready()));
    assert_eq!(app.delete_gate.state().remaining_seconds, 0);
    assert!(app.delete_gate.timer().is_none());
}

#[test]
fn dropping_ticker_stops_its_thread() {
    let (tx, rx) = mpsc::channel();
    let ticker = Ticker::spawn(Duration::from_millis(10), tx, |id| id).expect("spawn ticker");
    let first = rx.recv_timeout(Duration::from_secs(2)).expect("first tick");
    assert_eq!(first, ticker.id());
    drop(ticker);
    // at most one tick can still be in flight; then the sender is gone
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_) if Instant::now() < deadline => continue,
            Ok(_) => panic!("ticker kept running after drop"),
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => panic!("ticker thread did not exit"),
        }
    }
}

#[test]
fn personal_update_round_trip() {
    let api = backend();
    let mut app = loaded_app(api.clone());

    press(&mut app, KeyCode::Char('p'));
    assert!(matches!(app.modal, Some(ModalState::UpdateForm(_))));
    // FullName -> Email
    press(&mut app, KeyCode::Down);
    for _ in 0.."jane@example.com".len() {
        press(&mut app, KeyCode::Backspace);
    }
    for c in "jane@corp.vn".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Enter);
    if let Some(ModalState::UpdateForm(form)) = &app.modal {
        assert!(form.submitting);
    }

    assert!(wait_until(&mut app, |a| a.modal.is_none()));
    let shown = app.account.account().expect("loaded");
    assert_eq!(shown.email.as_deref(), Some("jane@corp.vn"));
    assert_eq!(shown.full_name.as_deref(), Some("Jane Doe"));
    let stored = api.get(&AccountId::new("1")).expect("stored");
    assert_eq!(stored.email.as_deref(), Some("jane@corp.vn"));
    assert_eq!(latest_notice(&app).map(|n| n.0), Some(Level::Success));
}

#[test]
fn reopened_form_cannot_submit_while_update_in_flight() {
    let api = Arc::new(
        MemoryAccountApi::with_accounts([sample_account()]).with_latency(Duration::from_millis(200)),
    );
    let mut app = loaded_app(api.clone());
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Enter);
    assert!(app.update_in_flight);

    // throw the submitting form away and try again from a fresh one
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Enter);
    match &app.modal {
        Some(ModalState::UpdateForm(form)) => assert!(!form.submitting),
        other => panic!("second form should stay open, got {other:?}"),
    }
    assert_eq!(latest_notice(&app).map(|n| n.0), Some(Level::Info));

    assert!(wait_until(&mut app, |a| !a.update_in_flight));
    assert_eq!(api.calls(Operation::Update), 1);
    // the finished request does not close a form it did not submit
    assert!(matches!(app.modal, Some(ModalState::UpdateForm(_))));
    assert_eq!(latest_notice(&app).map(|n| n.0), Some(Level::Success));

    // once the first result is in, the open form submits normally
    press(&mut app, KeyCode::Enter);
    assert!(app.update_in_flight);
    assert!(wait_until(&mut app, |a| a.modal.is_none()));
    assert_eq!(api.calls(Operation::Update), 2);
}

#[test]
fn stale_fetch_results_are_dropped() {
    let mut app = loaded_app(backend());
    let loaded_generation = app.fetch_generation;

    // a result tagged with an older fetch never replaces the view
    handle_event(
        &mut app,
        AppEvent::AccountLoaded {
            generation: loaded_generation - 1,
            result: Err(ApiError::NotFound("1".into())),
        },
    );
    assert!(app.account.account().is_some());

    // a saved update overtakes a fetch that was still running
    refresh(&mut app);
    let pending = app.fetch_generation;
    let mut saved = sample_account();
    saved.role = "ADMIN".into();
    handle_event(&mut app, AppEvent::AccountUpdated(Ok(saved)));
    handle_event(
        &mut app,
        AppEvent::AccountLoaded {
            generation: pending,
            result: Ok(sample_account()),
        },
    );
    assert_eq!(app.account.account().map(|a| a.role.as_str()), Some("ADMIN"));

    // the worker's own reply for that fetch is dropped as well
    std::thread::sleep(Duration::from_millis(50));
    drain_events(&mut app);
    assert_eq!(app.account.account().map(|a| a.role.as_str()), Some("ADMIN"));
}

#[test]
fn invalid_update_is_not_sent() {
    let api = backend();
    let mut app = loaded_app(api.clone());
    press(&mut app, KeyCode::Char('a'));
    for _ in 0.."jdoe".len() {
        press(&mut app, KeyCode::Backspace);
    }
    press(&mut app, KeyCode::Enter);
    match &app.modal {
        Some(ModalState::UpdateForm(form)) => {
            assert!(!form.errors.is_empty());
            assert!(!form.submitting);
        }
        other => panic!("form should stay open, got {other:?}"),
    }
    assert_eq!(api.calls(Operation::Update), 0);
}

#[test]
fn failed_update_keeps_form_open() {
    let api = backend();
    api.fail_next(Operation::Update, "server busy");
    let mut app = loaded_app(api.clone());
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Char('x'));
    press(&mut app, KeyCode::Enter);

    assert!(wait_until(&mut app, |a| a.notifications.latest(1).next().is_some()));
    drain_events(&mut app);
    match &app.modal {
        Some(ModalState::UpdateForm(form)) => assert!(!form.submitting),
        other => panic!("form should stay open, got {other:?}"),
    }
    let (level, msg) = latest_notice(&app).expect("notice");
    assert_eq!(level, Level::Error);
    assert!(msg.contains("server busy"));
    assert_eq!(api.get(&AccountId::new("1")).map(|a| a.username), Some("jdoe".to_string()));
}

#[test]
fn help_and_back_navigation() {
    let mut app = loaded_app(backend());
    press(&mut app, KeyCode::Char('?'));
    assert!(matches!(app.modal, Some(ModalState::Help { .. })));
    press(&mut app, KeyCode::Esc);
    assert!(app.modal.is_none());
    assert_eq!(app.exit, None);
    // Esc on the bare screen leaves it
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.exit, Some(Exit::Back));
    app.exit = None;
    press(&mut app, KeyCode::Char('q'));
    assert_eq!(app.exit, Some(Exit::Back));
}

#[test]
fn esc_in_delete_prompt_cancels_without_leaving() {
    let mut app = loaded_app(backend());
    press(&mut app, KeyCode::Delete);
    press(&mut app, KeyCode::Esc);
    assert!(!app.delete_gate.is_open());
    assert_eq!(app.exit, None);
}

// Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use std::{fs, path::PathBuf, time::{SystemTime, UNIX_EPOCH}};

    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("acct_theme_{}_{}.conf", std::process::id(), nonce));
    let path_str = path.to_string_lossy().to_string();

    let t = Theme::dark();
    t.write_file(&path_str).expect("write theme");
    let t2 = Theme::from_file(&path_str).expect("read theme");
    // named colors are written as hex, so compare through a second roundtrip
    t2.write_file(&path_str).expect("rewrite theme");
    let t3 = Theme::from_file(&path_str).expect("reread theme");
    assert_eq!(t2, t3);
    assert_eq!(t3.danger, ratatui::style::Color::Rgb(0xFF, 0x00, 0x00));
    // unknown keys and bad colors fall back to the default palette
    assert_eq!(Theme::parse("bogus = #123456\ntext = nothex\n"), Theme::mocha());

    let mut p2 = PathBuf::from(&path_str);
    p2.set_file_name(format!("{}_init.conf", p2.file_stem().unwrap().to_string_lossy()));
    let p2_str = p2.to_string_lossy().to_string();
    let _ = fs::remove_file(&p2_str);
    let _created = Theme::load_or_init(&p2_str);

    let _ = fs::remove_file(&path_str);
    let _ = fs::remove_file(&p2_str);
}

#[test]
fn keymap_written_file_reloads_same_bindings() {
    use std::time::{SystemTime, UNIX_EPOCH};

    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("acct_keys_{}_{}.conf", std::process::id(), nonce));
    let path_str = path.to_string_lossy().to_string();

    let km = Keymap::parse("RequestDelete = x\n");
    km.write_file(&path_str).expect("write keymap");
    let reloaded = Keymap::from_file(&path_str).expect("read keymap");
    let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
    assert_eq!(reloaded.resolve(&x), km.resolve(&x));

    let _ = std::fs::remove_file(&path_str);
}

fn screen_text(app: &AppState) -> String {
    let backend = ratatui::backend::TestBackend::new(100, 30);
    let mut terminal = ratatui::Terminal::new(backend).expect("test terminal");
    terminal
        .draw(|f| account_admin::ui::render(f, app))
        .expect("draw frame");
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn rendered_prompt_shows_countdown_on_delete_button() {
    let mut app = loaded_app(backend());
    let screen = screen_text(&app);
    assert!(screen.contains("Account info"));
    assert!(screen.contains("Jane Doe"));

    press(&mut app, KeyCode::Char('d'));
    let screen = screen_text(&app);
    assert!(screen.contains("Confirm account deletion"));
    assert!(screen.contains("Delete (3)"));

    for _ in 0..3 {
        tick(&mut app);
    }
    let screen = screen_text(&app);
    assert!(!screen.contains("Delete ("));
    assert!(screen.contains("Delete"));
}
