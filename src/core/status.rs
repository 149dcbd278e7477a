use crate::core::StatusArea;
use std::sync::{Arc, Mutex};

/// Status area for the terminal: every non-empty message goes to stdout.
#[derive(Debug, Clone, Default)]
pub struct ConsoleStatus {
    last: Arc<Mutex<String>>,
}

impl ConsoleStatus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusArea for ConsoleStatus {
    fn clear(&self) {
        if let Ok(mut last) = self.last.lock() {
            last.clear();
        }
    }

    fn show(&self, message: &str) {
        if let Ok(mut last) = self.last.lock() {
            *last = message.to_string();
        }
        if !message.is_empty() {
            tracing::debug!("status: {}", message);
            println!("{}", message);
        }
    }

    fn current(&self) -> String {
        self.last.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

/// Keeps the last message in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatus {
    last: Arc<Mutex<String>>,
}

impl MemoryStatus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusArea for MemoryStatus {
    fn clear(&self) {
        if let Ok(mut last) = self.last.lock() {
            last.clear();
        }
    }

    fn show(&self, message: &str) {
        if let Ok(mut last) = self.last.lock() {
            *last = message.to_string();
        }
    }

    fn current(&self) -> String {
        self.last.lock().map(|m| m.clone()).unwrap_or_default()
    }
}
