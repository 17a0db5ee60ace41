/// Notification slot: at most one transient message.
///
/// `show` overwrites the slot and its expiry. Expiry timers are
/// fire-and-forget; `expire` clears only when the slot's own deadline
/// has passed, so a timer armed for an older message never removes a
/// newer one.

use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct Toast {
    ttl: Duration,
    current: Option<Notification>,
}

impl Toast {
    pub fn new(ttl: Duration) -> Self {
        Toast { ttl, current: None }
    }

    /// Store `text`, replacing any active message. Returns the deadline
    /// the caller should arm a timer for.
    pub fn show(&mut self, text: impl Into<String>, now: Instant) -> Instant {
        let expires_at = now + self.ttl;
        self.current = Some(Notification { text: text.into(), expires_at });
        expires_at
    }

    /// Timer callback. Returns true if the slot was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(n) if now >= n.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|n| n.text.as_str())
    }
}
