use std::env;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;

pub static DEBUG_ENABLED: Lazy<bool> = Lazy::new(|| {
    env::var("TRANSFORM_FILTER_DEBUG")
        .map_or(false, |log_level| log_level.eq("true") || log_level.eq("1"))
});

pub fn is_debug_enabled() -> bool {
    *DEBUG_ENABLED
}

/// Builds a diagnostic message, appending the details only when debug output is enabled.
///
/// # Arguments
///
/// * `message` - The main message to log.
/// * `details` - Additional details to include in the log.
///
/// # Returns
///
/// A formatted string containing the message and details.
pub fn debug_message<M, D>(message: M, details: D) -> String
where
    M: AsRef<str>,
    D: AsRef<str>,
{
    if is_debug_enabled() {
        format!("{}{}", message.as_ref(), details.as_ref())
    } else {
        message.as_ref().to_string()
    }
}

/// Destination for the non-fatal warnings raised while resolving and applying transformers.
///
/// Emission is fire-and-forget: implementations must never fail or block the caller.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, message: &str);
}

/// Forwards diagnostics to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, message: &str) {
        tracing::warn!(target: "transform_filter", "{}", message);
    }
}

/// Keeps every emitted diagnostic in memory.
///
/// # Examples
///
/// ```
/// use transform_filter::log::{DiagnosticSink, MemorySink};
///
/// let sink = MemorySink::new();
/// sink.emit("Invalid transformer configuration");
/// assert_eq!(sink.messages(), vec!["Invalid transformer configuration"]);
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means a previous writer panicked, the list is still usable
    fn guard(&self) -> MutexGuard<'_, Vec<String>> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a copy of the messages emitted so far
    pub fn messages(&self) -> Vec<String> {
        self.guard().clone()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, message: &str) {
        self.guard().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.emit("first");
        sink.emit("second");
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_memory_sink_survives_poisoned_lock() {
        let sink = std::sync::Arc::new(MemorySink::new());
        sink.emit("before");
        let poisoner = sink.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.messages.lock().unwrap();
            panic!("writer panicked");
        })
        .join();
        assert!(sink.messages.is_poisoned());
        sink.emit("after");
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.messages(), vec!["before", "after"]);
    }

    #[test]
    fn test_debug_message_follows_debug_flag() {
        let message = debug_message("Invalid transformer configuration", " (details)");
        if is_debug_enabled() {
            assert_eq!(message, "Invalid transformer configuration (details)");
        } else {
            assert_eq!(message, "Invalid transformer configuration");
        }
    }

    #[test]
    fn test_debug_message_always_keeps_main_message() {
        let message = debug_message("Invalid transformer configuration", " : {\"a\":1}");
        assert!(message.starts_with("Invalid transformer configuration"));
    }
}
