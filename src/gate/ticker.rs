use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies the ticker that produced a tick message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Periodic timer running on its own thread.
///
/// Every `period` it sends `make_msg(id)` into the given channel. Dropping the
/// handle disconnects the stop channel, which wakes the thread and ends it
/// without waiting for the next period.
#[derive(Debug)]
pub struct Ticker {
    id: TimerId,
    _stop: Sender<()>,
}

impl Ticker {
    /// Start the timer thread. Fails only when the OS refuses a new thread.
    pub fn spawn<M, F>(period: Duration, events: Sender<M>, make_msg: F) -> std::io::Result<Self>
    where
        M: Send + 'static,
        F: Fn(TimerId) -> M + Send + 'static,
    {
        let id = TimerId(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        thread::Builder::new()
            .name(format!("ticker-{}", id.0))
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {
                            if events.send(make_msg(id)).is_err() {
                                break;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::trace!(?id, "ticker stopped");
            })?;
        Ok(Self { id, _stop: stop_tx })
    }

    pub fn id(&self) -> TimerId {
        self.id
    }
}
