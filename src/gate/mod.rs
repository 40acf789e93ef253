//! Delete confirmation gate.
//!
//! A destructive action stays locked for [`COUNTDOWN_SECS`] seconds after the
//! confirmation prompt opens. The gate is a tagged state machine:
//!
//! ```text
//! Closed --open--> CountingDown --tick (0 left)--> Ready --confirm--> Closed
//!                  |  ^ tick (n left)               |
//!                  +--+                             |
//! CountingDown / Ready --cancel--> Closed <---------+
//! ```
//!
//! The periodic timer driving `tick` is owned by the `CountingDown` variant,
//! so every transition out of it drops (and thereby stops) the timer.
pub mod ticker;

pub use ticker::{Ticker, TimerId};

/// Initial countdown value shown when the gate opens.
pub const COUNTDOWN_SECS: u32 = 3;

/// Observable snapshot of a [`DeleteGate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateState {
    pub visible: bool,
    pub remaining_seconds: u32,
    pub action_enabled: bool,
}

#[derive(Debug)]
enum Phase<T> {
    Closed,
    CountingDown { remaining: u32, timer: T },
    Ready,
}

/// Countdown gate in front of a destructive action.
///
/// `T` is the timer handle kept alive while counting down; the app uses
/// [`Ticker`], tests use anything whose `Drop` they can observe.
#[derive(Debug)]
pub struct DeleteGate<T> {
    phase: Phase<T>,
}

impl<T> DeleteGate<T> {
    pub fn new() -> Self {
        Self {
            phase: Phase::Closed,
        }
    }

    /// Show the prompt and restart the countdown.
    ///
    /// Any timer still held from a previous opening is dropped before
    /// `start_timer` runs, so at most one timer exists per gate.
    pub fn open<F: FnOnce() -> T>(&mut self, start_timer: F) {
        let Ok(()) = self.try_open(|| Ok::<T, std::convert::Infallible>(start_timer()));
    }

    /// Like [`open`](Self::open), for timers that can fail to start.
    ///
    /// On error the gate stays closed and no countdown runs.
    pub fn try_open<E, F>(&mut self, start_timer: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.phase = Phase::Closed;
        let timer = start_timer()?;
        self.phase = Phase::CountingDown {
            remaining: COUNTDOWN_SECS,
            timer,
        };
        tracing::debug!(seconds = COUNTDOWN_SECS, "delete gate opened");
        Ok(())
    }

    /// Advance the countdown by one second. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        let Phase::CountingDown { remaining, .. } = &mut self.phase else {
            return false;
        };
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            // drops the timer
            self.phase = Phase::Ready;
            tracing::debug!("delete gate armed");
        }
        true
    }

    /// Close the prompt without running the action. Returns whether it was open.
    pub fn cancel(&mut self) -> bool {
        let was_open = self.is_open();
        self.phase = Phase::Closed;
        if was_open {
            tracing::debug!("delete gate cancelled");
        }
        was_open
    }

    /// Close the prompt and report whether the guarded action should run now.
    ///
    /// Only succeeds in the `Ready` state; otherwise nothing changes.
    pub fn confirm(&mut self) -> bool {
        if !matches!(self.phase, Phase::Ready) {
            return false;
        }
        self.phase = Phase::Closed;
        tracing::debug!("delete gate confirmed");
        true
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.phase, Phase::Closed)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready)
    }

    /// Timer currently driving the countdown, if any.
    pub fn timer(&self) -> Option<&T> {
        match &self.phase {
            Phase::CountingDown { timer, .. } => Some(timer),
            _ => None,
        }
    }

    pub fn state(&self) -> GateState {
        match &self.phase {
            Phase::Closed => GateState {
                visible: false,
                remaining_seconds: COUNTDOWN_SECS,
                action_enabled: false,
            },
            Phase::CountingDown { remaining, .. } => GateState {
                visible: true,
                remaining_seconds: *remaining,
                action_enabled: false,
            },
            Phase::Ready => GateState {
                visible: true,
                remaining_seconds: 0,
                action_enabled: true,
            },
        }
    }
}

impl<T> Default for DeleteGate<T> {
    fn default() -> Self {
        Self::new()
    }
}
