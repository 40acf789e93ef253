use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::{Duration, Instant};

use crate::app::keymap::KeyAction;
use crate::app::{AccountView, AppEvent, AppState, DeleteChoice, Exit, FormKind, ModalState, UpdateForm, tasks};
use crate::gate::Ticker;
use crate::ui;

/// Drive the screen until the user leaves it or the account is deleted.
pub fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut AppState) -> Result<Exit> {
    refresh(app);

    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        drain_events(app);
        app.notifications.prune(Instant::now());
        if let Some(exit) = app.exit.take() {
            return Ok(exit);
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }
    }
}

/// Apply every event already queued by timers and workers.
pub fn drain_events(app: &mut AppState) {
    while let Some(ev) = app.try_recv_event() {
        handle_event(app, ev);
    }
}

pub fn handle_event(app: &mut AppState, ev: AppEvent) {
    match ev {
        AppEvent::Tick(id) => {
            if app.delete_gate.timer().map(Ticker::id) == Some(id) {
                app.delete_gate.tick();
            } else {
                tracing::trace!(?id, "stale tick ignored");
            }
        }
        AppEvent::AccountLoaded { generation, result } => {
            if generation != app.fetch_generation {
                tracing::debug!(generation, current = app.fetch_generation, "stale fetch result ignored");
                return;
            }
            app.account = match result {
                Ok(account) => AccountView::Loaded(account),
                Err(e) if e.is_not_found() => AccountView::Missing,
                Err(e) => AccountView::Failed(e.to_string()),
            };
        }
        AppEvent::AccountUpdated(result) => {
            app.update_in_flight = false;
            let submitting = matches!(&app.modal, Some(ModalState::UpdateForm(form)) if form.submitting);
            match result {
                Ok(account) => {
                    // the saved account is newer than any fetch still running
                    app.fetch_generation += 1;
                    app.account = AccountView::Loaded(account);
                    if submitting {
                        app.modal = None;
                    }
                    app.notifications.success("Account updated");
                }
                Err(e) => {
                    if let Some(ModalState::UpdateForm(form)) = &mut app.modal {
                        form.submitting = false;
                    }
                    app.notifications.error(format!("Update failed: {e}"));
                }
            }
        }
        AppEvent::AccountDeleted { id, result } => {
            app.delete_in_flight = false;
            match result {
                Ok(()) => {
                    app.notifications.success("Account deleted");
                    app.exit = Some(Exit::Deleted(id));
                }
                // The gate closed before the call; it stays closed and nothing is retried.
                Err(e) => app.notifications.error(format!("Delete failed: {e}")),
            }
        }
    }
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    if app.delete_gate.is_open() {
        handle_delete_key(app, key.code);
        return;
    }
    if app.modal.is_some() {
        handle_modal_key(app, key);
        return;
    }
    match app.keymap.resolve(&key) {
        Some(KeyAction::Back) => app.exit = Some(Exit::Back),
        Some(KeyAction::Refresh) => refresh(app),
        Some(KeyAction::EditAccount) => open_update_form(app, FormKind::Account),
        Some(KeyAction::EditPersonal) => open_update_form(app, FormKind::Personal),
        Some(KeyAction::RequestDelete) => request_delete(app),
        Some(KeyAction::OpenHelp) => app.modal = Some(ModalState::Help { scroll: 0 }),
        Some(KeyAction::Ignore) | None => {}
    }
}

fn handle_delete_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('n') => cancel_delete(app),
        KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
            app.delete_focus = match app.delete_focus {
                DeleteChoice::Cancel => DeleteChoice::Delete,
                DeleteChoice::Delete => DeleteChoice::Cancel,
            };
        }
        KeyCode::Char('y') => confirm_delete(app),
        KeyCode::Enter => match app.delete_focus {
            DeleteChoice::Cancel => cancel_delete(app),
            DeleteChoice::Delete => confirm_delete(app),
        },
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) {
    match &mut app.modal {
        Some(ModalState::Help { scroll }) => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => app.modal = None,
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            _ => {}
        },
        Some(ModalState::UpdateForm(form)) => match key.code {
            KeyCode::Esc => app.modal = None,
            KeyCode::Up | KeyCode::BackTab => form.select_prev(),
            KeyCode::Down | KeyCode::Tab => form.select_next(),
            KeyCode::Left | KeyCode::Right => form.toggle(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => submit_update(app),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.input_char(c),
            _ => {}
        },
        None => {}
    }
}

/// Start (or restart) loading the account.
pub fn refresh(app: &mut AppState) {
    app.account = AccountView::Loading;
    app.fetch_generation += 1;
    let generation = app.fetch_generation;
    if let Err(e) = tasks::spawn_fetch(app.api.clone(), app.account_id.clone(), generation, app.event_sender()) {
        app.account = AccountView::Failed(format!("could not start request: {e}"));
    }
}

pub fn open_update_form(app: &mut AppState, kind: FormKind) {
    if let Some(account) = app.account.account() {
        app.modal = Some(ModalState::UpdateForm(UpdateForm::new(kind, account)));
    }
}

/// Validate the open form and send the merged account to the backend.
pub fn submit_update(app: &mut AppState) {
    let Some(ModalState::UpdateForm(form)) = &mut app.modal else {
        return;
    };
    let Some(current) = app.account.account() else {
        return;
    };
    if form.submitting {
        return;
    }
    if app.update_in_flight {
        app.notifications.info("Update already in progress");
        return;
    }
    match form.apply_to(current) {
        Ok(payload) => {
            form.errors.clear();
            form.submitting = true;
            app.update_in_flight = true;
            let id = current.user_id.clone();
            if let Err(e) = tasks::spawn_update(app.api.clone(), id, payload, app.events_tx.clone()) {
                form.submitting = false;
                app.update_in_flight = false;
                app.notifications.error(format!("Update failed: {e}"));
            }
        }
        Err(errors) => form.errors = errors,
    }
}

/// Open the delete prompt with a fresh countdown.
pub fn request_delete(app: &mut AppState) {
    if app.account.account().is_none() {
        return;
    }
    if app.delete_in_flight {
        app.notifications.info("Delete already in progress");
        return;
    }
    let events = app.event_sender();
    let period = app.tick_period;
    if let Err(e) = app.delete_gate.try_open(|| Ticker::spawn(period, events, AppEvent::Tick)) {
        tracing::error!(error = %e, "could not start delete countdown");
        app.notifications.error(format!("Could not start countdown: {e}"));
        return;
    }
    app.delete_focus = DeleteChoice::Cancel;
}

pub fn cancel_delete(app: &mut AppState) {
    app.delete_gate.cancel();
}

/// Run the delete if the gate allows it; otherwise nothing happens.
pub fn confirm_delete(app: &mut AppState) {
    if app.delete_in_flight || !app.delete_gate.confirm() {
        return;
    }
    app.delete_in_flight = true;
    let id = app.account_id.clone();
    tracing::info!(%id, "deleting account");
    if let Err(e) = tasks::spawn_delete(app.api.clone(), id, app.event_sender()) {
        app.delete_in_flight = false;
        app.notifications.error(format!("Delete failed: {e}"));
    }
}
