//! Debounced saving
//!
//! Each change pushes the pending save back; the save only happens once the
//! state has been quiet for the whole delay.

use std::time::Duration;

use tokio::time::Instant;

/// Debounce deadline for a pending save
#[derive(Debug, Clone)]
pub struct Autosave {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Autosave {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// Discard any pending save and schedule a new one
    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Clear and report a save whose deadline has passed
    pub fn take_due(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
