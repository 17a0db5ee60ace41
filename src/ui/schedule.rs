/// One-shot timers for presentation effects.
///
/// The controller knows nothing about time. The main loop schedules
/// timers here in response to effects and applies whatever has come due
/// each frame. Timers are fire-and-forget: the handler for a fired timer
/// re-checks the state it acts on, so a stale timer is harmless.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Timer {
    /// Reveal the next character of the quit warning.
    Typewriter,
    /// Clear the notification if its own deadline has passed.
    NotificationExpiry,
    RainEnd,
    PowerOnEnd,
}

#[derive(Default)]
pub struct Scheduler {
    pending: Vec<(Instant, Timer)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler::default()
    }

    pub fn schedule(&mut self, at: Instant, timer: Timer) {
        self.pending.push((at, timer));
    }

    pub fn schedule_in(&mut self, now: Instant, delay: Duration, timer: Timer) {
        self.schedule(now + delay, timer);
    }

    /// Drop every pending instance of `timer`.
    pub fn cancel(&mut self, timer: Timer) {
        self.pending.retain(|(_, t)| *t != timer);
    }

    #[cfg(test)]
    pub fn is_pending(&self, timer: Timer) -> bool {
        self.pending.iter().any(|(_, t)| *t == timer)
    }

    /// Remove and return timers due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<Timer> {
        let mut due: Vec<(Instant, Timer)> = Vec::new();
        self.pending.retain(|&(at, t)| {
            if at <= now {
                due.push((at, t));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, t)| t).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_only_when_due_in_order() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.schedule_in(t0, ms(50), Timer::RainEnd);
        s.schedule_in(t0, ms(10), Timer::Typewriter);
        assert!(s.take_due(t0).is_empty());
        assert_eq!(s.take_due(t0 + ms(60)), vec![Timer::Typewriter, Timer::RainEnd]);
        assert!(s.take_due(t0 + ms(10_000)).is_empty());
    }

    #[test]
    fn cancel_removes_all_instances() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.schedule_in(t0, ms(5), Timer::Typewriter);
        s.schedule_in(t0, ms(9), Timer::Typewriter);
        s.schedule_in(t0, ms(9), Timer::NotificationExpiry);
        s.cancel(Timer::Typewriter);
        assert!(!s.is_pending(Timer::Typewriter));
        assert!(s.is_pending(Timer::NotificationExpiry));
        assert_eq!(s.take_due(t0 + ms(100)), vec![Timer::NotificationExpiry]);
    }

    #[test]
    fn duplicate_timers_each_fire() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.schedule_in(t0, ms(1), Timer::NotificationExpiry);
        s.schedule_in(t0, ms(2), Timer::NotificationExpiry);
        assert_eq!(s.take_due(t0 + ms(3)).len(), 2);
    }
}
