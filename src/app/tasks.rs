//! Background API calls.
//!
//! Each call runs on its own named thread and posts exactly one [`AppEvent`]
//! back to the event loop when it finishes.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use super::AppEvent;
use crate::api::{Account, AccountApi, AccountId};

fn spawn<F>(name: &str, events: Sender<AppEvent>, job: F) -> std::io::Result<()>
where
    F: FnOnce() -> AppEvent + Send + 'static,
{
    thread::Builder::new()
        .name(format!("api-{name}"))
        .spawn(move || {
            // receiver gone means the screen was closed; nothing to report to
            let _ = events.send(job());
        })
        .map(|_| ())
}

pub fn spawn_fetch(
    api: Arc<dyn AccountApi>,
    id: AccountId,
    generation: u64,
    events: Sender<AppEvent>,
) -> std::io::Result<()> {
    spawn("fetch", events, move || {
        let result = api.fetch_account(&id);
        if let Err(e) = &result {
            tracing::warn!(%id, error = %e, "fetch account failed");
        }
        AppEvent::AccountLoaded { generation, result }
    })
}

pub fn spawn_update(
    api: Arc<dyn AccountApi>,
    id: AccountId,
    payload: Account,
    events: Sender<AppEvent>,
) -> std::io::Result<()> {
    spawn("update", events, move || {
        let result = api.update_account(&id, &payload);
        match &result {
            Ok(_) => tracing::info!(%id, "account updated"),
            Err(e) => tracing::warn!(%id, error = %e, "update account failed"),
        }
        AppEvent::AccountUpdated(result)
    })
}

pub fn spawn_delete(api: Arc<dyn AccountApi>, id: AccountId, events: Sender<AppEvent>) -> std::io::Result<()> {
    spawn("delete", events, move || {
        let result = api.delete_account(&id);
        match &result {
            Ok(()) => tracing::info!(%id, "account deleted"),
            Err(e) => tracing::error!(%id, error = %e, "delete account failed"),
        }
        AppEvent::AccountDeleted { id, result }
    })
}
