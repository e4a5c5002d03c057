//! Clock edge detection shared by counters and toggle switches

use serde::{Deserialize, Serialize};

/// Clock transition that counts as an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockEdge {
    #[default]
    Rising,
    Falling,
    Both,
}

/// Remembers the previous clock level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    /// Primes the detector with the current level so no edge is reported
    /// on the next sample.
    pub fn prime(&mut self, level: bool) {
        self.last = level;
    }

    /// Samples the clock and returns true if a qualifying edge occurred.
    pub fn sample(&mut self, level: bool, edge: ClockEdge) -> bool {
        let previous = core::mem::replace(&mut self.last, level);
        match edge {
            ClockEdge::Rising => level && !previous,
            ClockEdge::Falling => !level && previous,
            ClockEdge::Both => level != previous,
        }
    }
}
