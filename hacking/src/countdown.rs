use serde::{Deserialize, Serialize};

/// Whole-second countdown for timed hacks. It never goes below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    left: u32,
    ran_out: bool,
}

impl Countdown {
    pub fn start(&mut self, seconds: u32) {
        self.left = seconds;
        self.ran_out = false;
    }

    pub fn stop(&mut self) {
        self.left = 0;
        self.ran_out = false;
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    /// True only when ticking brought the clock to zero, not when it was stopped.
    pub fn ran_out(&self) -> bool {
        self.ran_out
    }

    pub fn is_up(&self) -> bool {
        self.left == 0
    }

    /// Takes one second off when `running`. Returns whether anything changed.
    pub fn tick_if_running(&mut self, running: bool) -> bool {
        if !running || self.is_up() {
            return false;
        }
        self.left -= 1;
        self.ran_out = self.left == 0;
        true
    }
}
