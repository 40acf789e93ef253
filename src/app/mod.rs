//! Application state types and entry glue.
//!
//! Defines the state of the account detail screen and the messages that
//! worker threads and timers post back to the event loop (re-exported as `run`).
//!
pub mod form;
pub mod keymap;
pub mod notify;
pub mod tasks;
pub mod theme;
pub mod update;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use crate::api::{Account, AccountApi, AccountId};
use crate::error::ApiError;
use crate::gate::{DeleteGate, Ticker, TimerId};

pub use form::{FormKind, UpdateForm};
pub use keymap::Keymap;
pub use notify::{Level, Notifications};
pub use theme::Theme;

/// What the screen currently knows about the account.
#[derive(Clone, Debug)]
pub enum AccountView {
    Loading,
    Failed(String),
    Missing,
    Loaded(Account),
}

impl AccountView {
    pub fn account(&self) -> Option<&Account> {
        match self {
            AccountView::Loaded(a) => Some(a),
            _ => None,
        }
    }
}

/// Modal dialogs other than the delete prompt, which lives in [`DeleteGate`].
#[derive(Clone, Debug)]
pub enum ModalState {
    UpdateForm(UpdateForm),
    Help { scroll: u16 },
}

/// Focused button inside the delete prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteChoice {
    Cancel,
    Delete,
}

/// Why the screen was left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Exit {
    Back,
    Deleted(AccountId),
}

/// Messages delivered to the event loop from timers and worker threads.
#[derive(Debug)]
pub enum AppEvent {
    Tick(TimerId),
    /// `generation` is the value of [`AppState::fetch_generation`] when the fetch started.
    AccountLoaded {
        generation: u64,
        result: Result<Account, ApiError>,
    },
    AccountUpdated(Result<Account, ApiError>),
    AccountDeleted {
        id: AccountId,
        result: Result<(), ApiError>,
    },
}

pub struct AppState {
    pub account_id: AccountId,
    pub account: AccountView,
    pub api: Arc<dyn AccountApi>,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub delete_gate: DeleteGate<Ticker>,
    pub delete_focus: DeleteChoice,
    /// Set from confirm until the delete result arrives.
    pub delete_in_flight: bool,
    /// Set from submit until the update result arrives.
    pub update_in_flight: bool,
    /// Bumped by every fetch and every applied update; older fetch results are dropped.
    pub fetch_generation: u64,
    pub tick_period: Duration,
    pub notifications: Notifications,
    pub exit: Option<Exit>,
    events_tx: Sender<AppEvent>,
    events_rx: Receiver<AppEvent>,
}

impl AppState {
    pub fn new(account_id: AccountId, api: Arc<dyn AccountApi>, theme: Theme, keymap: Keymap) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            account_id,
            account: AccountView::Loading,
            api,
            theme,
            keymap,
            modal: None,
            delete_gate: DeleteGate::new(),
            delete_focus: DeleteChoice::Cancel,
            delete_in_flight: false,
            update_in_flight: false,
            fetch_generation: 0,
            tick_period: Duration::from_secs(1),
            notifications: Notifications::default(),
            exit: None,
            events_tx,
            events_rx,
        }
    }

    /// Sender for posting [`AppEvent`]s into this state's event queue.
    pub fn event_sender(&self) -> Sender<AppEvent> {
        self.events_tx.clone()
    }

    pub fn try_recv_event(&self) -> Option<AppEvent> {
        match self.events_rx.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<AppEvent> {
        match self.events_rx.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Look for an existing config file under the user's config directories.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        candidates.push(PathBuf::from(xdg).join("account-admin").join(name));
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        candidates.push(PathBuf::from(home).join(".config").join("account-admin").join(name));
    }
    candidates
        .into_iter()
        .find(|p| p.is_file())
        .map(|p| p.to_string_lossy().into_owned())
}

/// Where a config file should live when no path was given: the user's
/// `account-admin` config directory, or the bare file name when neither
/// `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn config_file_default_path(name: &str) -> String {
    let dir = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .filter(|v| !v.is_empty())
                .map(|home| PathBuf::from(home).join(".config"))
        });
    match dir {
        Some(dir) => dir.join("account-admin").join(name).to_string_lossy().into_owned(),
        None => name.to_string(),
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
