//! Started/stopped flag shared by appenders and filters

use std::sync::atomic::{AtomicBool, Ordering};

/// Lifecycle state
#[derive(Debug, Default)]
pub struct LifeCycle {
    started: AtomicBool,
}

impl LifeCycle {
    /// Create a stopped lifecycle
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark started; returns false if it already was
    pub fn start(&self) -> bool {
        !self.started.swap(true, Ordering::SeqCst)
    }

    /// Mark stopped; returns false if it already was
    pub fn stop(&self) -> bool {
        self.started.swap(false, Ordering::SeqCst)
    }

    /// Whether currently started
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}
