//! Transient toast notifications.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const NOTICE_TTL: Duration = Duration::from_secs(4);
const MAX_QUEUED: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug)]
pub struct Notice {
    pub level: Level,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Clone, Debug)]
pub struct Notifications {
    items: VecDeque<Notice>,
    ttl: Duration,
}

impl Notifications {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        let message = message.into();
        match level {
            Level::Error => tracing::warn!(%message, "notify"),
            Level::Success | Level::Info => tracing::info!(%message, "notify"),
        }
        if self.items.len() == MAX_QUEUED {
            self.items.pop_front();
        }
        self.items.push_back(Notice {
            level,
            message,
            expires_at: Instant::now() + self.ttl,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Level::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message);
    }

    /// Drop notices that expired at or before `now`.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|n| n.expires_at > now);
    }

    /// Up to `n` notices, newest first.
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &Notice> {
        self.items.iter().rev().take(n)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::with_ttl(NOTICE_TTL)
    }
}
