use std::fmt;
use std::time::{Duration, Instant};

use super::input::KeyInput;

/// How long a pending `g` waits for its second key.
pub const CHORD_TIMEOUT: Duration = Duration::from_millis(700);

const LEADER: char = 'g';

/// A completed multi-key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sequence {
    Gg,
    Gt,
    Gp,
    Ga,
}

impl Sequence {
    /// Second keys that complete a `g` chord (besides `g` itself).
    fn continuation(c: char) -> Option<Self> {
        match c {
            't' => Some(Sequence::Gt),
            'p' => Some(Sequence::Gp),
            'a' => Some(Sequence::Ga),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sequence::Gg => "gg",
            Sequence::Gt => "gt",
            Sequence::Gp => "gp",
            Sequence::Ga => "ga",
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recently pressed keys that may still grow into a chord.
///
/// Expiry is checked lazily on the next key, so there is never a timer to
/// cancel.
#[derive(Debug, Clone)]
pub struct ChordBuffer {
    pending: Option<char>,
    started_at: Option<Instant>,
    timeout: Duration,
}

impl Default for ChordBuffer {
    fn default() -> Self {
        ChordBuffer::new(CHORD_TIMEOUT)
    }
}

impl ChordBuffer {
    pub fn new(timeout: Duration) -> Self {
        ChordBuffer {
            pending: None,
            started_at: None,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The key waiting for a continuation, if it has not expired at `now`.
    pub fn pending(&self, now: Instant) -> Option<char> {
        self.pending.filter(|_| self.is_fresh(now))
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.started_at = None;
    }

    fn is_fresh(&self, now: Instant) -> bool {
        self.started_at
            .is_some_and(|t| now.saturating_duration_since(t) < self.timeout)
    }

    /// Feed one key press. Returns the chord it completes, if any.
    ///
    /// Keys held with ctrl/alt/meta never take part in chords and leave the
    /// buffer untouched.
    pub fn feed(&mut self, input: &KeyInput, now: Instant) -> Option<Sequence> {
        if input.has_command_modifier() {
            return None;
        }
        if self.pending.is_some() && !self.is_fresh(now) {
            self.reset();
        }

        let c = input.char().map(|c| c.to_ascii_lowercase());
        if c == Some(LEADER) {
            if self.pending == Some(LEADER) {
                self.reset();
                return Some(Sequence::Gg);
            }
            self.pending = Some(LEADER);
            self.started_at = Some(now);
            return None;
        }

        if self.pending.is_some() {
            // Anything else ends the chord; unknown continuations are dropped
            // and the key is processed on its own.
            self.reset();
            return c.and_then(Sequence::continuation);
        }
        None
    }
}
