//! Loading message ticker
//!
//! Rotates through a list of loading messages at a fixed interval while a
//! request is in flight. The ticker lives in an `Option` next to the view's
//! loading flag: starting a request creates it, finishing drops it.
//!
//! The ticker only tracks which message is current. The message table is
//! passed in on every call, so switching languages mid-request takes effect
//! on the next frame.

use std::time::{Duration, Instant};

use rand::Rng;

/// Periodic loading message rotation
#[derive(Debug, Clone)]
pub struct LoadingTicker {
    current: usize,
    interval: Duration,
    next_at: Instant,
}

impl LoadingTicker {
    /// Start on the first message
    pub fn start(interval: Duration, now: Instant) -> Self {
        Self {
            current: 0,
            interval,
            next_at: now + interval,
        }
    }

    /// Message to show right now
    pub fn message<'a>(&self, messages: &[&'a str]) -> &'a str {
        if messages.is_empty() {
            return "";
        }
        messages[self.current % messages.len()]
    }

    /// When the next rotation is due
    pub fn next_deadline(&self) -> Instant {
        self.next_at
    }

    /// Advance if the interval has elapsed; returns true when the message changed
    pub fn poll(&mut self, now: Instant, count: usize) -> bool {
        self.poll_with(now, count, &mut rand::thread_rng())
    }

    /// `poll` with an explicit random source
    pub fn poll_with<R: Rng + ?Sized>(&mut self, now: Instant, count: usize, rng: &mut R) -> bool {
        if now < self.next_at {
            return false;
        }
        self.next_at = now + self.interval;

        if count < 2 {
            return false;
        }

        // Pick uniformly among the other messages
        let current = self.current % count;
        let mut next = rng.gen_range(0..count - 1);
        if next >= current {
            next += 1;
        }
        self.current = next;
        true
    }
}
