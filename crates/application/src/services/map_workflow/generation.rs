//! Generation tokens for superseded-response detection

use std::fmt;

/// Monotonic token identifying one request against a state slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-slot counter handing out generations
///
/// A response may be applied only while the generation it was issued with
/// is still the slot's current one.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    /// Supersede everything issued so far and return the new generation
    pub fn advance(&mut self) -> Generation {
        self.current = Generation(self.current.0.saturating_add(1));
        self.current
    }

    /// Generation of the latest request
    pub const fn current(&self) -> Generation {
        self.current
    }

    /// Whether `generation` has not been superseded
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current == generation
    }
}

/// What happened to the response of an async workflow operation
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The response updated the session
    Applied(T),
    /// A newer request superseded this one; the response was dropped
    Discarded,
}

impl<T> Outcome<T> {
    /// The applied value, if any
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Discarded => None,
        }
    }

    /// Whether the response was applied
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Whether the response was dropped as stale
    pub const fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded)
    }

    /// Transform the applied value
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Applied(value) => Outcome::Applied(f(value)),
            Self::Discarded => Outcome::Discarded,
        }
    }
}
