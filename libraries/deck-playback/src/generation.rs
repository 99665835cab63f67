//! Generation counters for discarding stale asynchronous results
//!
//! Every asynchronous operation class (engine loads, search queries) owns one
//! counter. Issuing an operation advances the counter and stamps the
//! operation with the new value; a completion is applied only if its stamp
//! still equals the counter's current value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag identifying one issued asynchronous operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic counter; starts at generation 0, which no operation carries
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new generation, making every earlier one stale
    pub fn advance(&mut self) -> Generation {
        self.current = Generation(self.current.0.wrapping_add(1));
        self.current
    }

    /// Most recently issued generation
    pub fn current(&self) -> Generation {
        self.current
    }

    /// Whether `generation` belongs to the most recently issued operation
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_supersedes_previous() {
        let mut counter = GenerationCounter::new();
        let first = counter.advance();
        assert!(counter.is_current(first));

        let second = counter.advance();
        assert!(second > first);
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
    }

    #[test]
    fn initial_generation_is_never_issued() {
        let mut counter = GenerationCounter::new();
        let initial = counter.current();
        let issued = counter.advance();
        assert_ne!(initial, issued);
        assert_eq!(issued.value(), 1);
        assert_eq!(issued.to_string(), "#1");
    }
}
