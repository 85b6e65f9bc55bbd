//! Span helpers for command execution.

use tracing::{info_span, Span};

/// Create a span for a top-level command.
pub fn command_span(command: &str, target: &str) -> Span {
    info_span!("command", name = %command, target = %target)
}

/// Timing utility for operations.
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Milliseconds since the timer started.
    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    /// Complete the timer and record duration.
    pub fn finish(self) {
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %self.elapsed_ms(),
            "operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_measures_elapsed() {
        let timer = Timer::start("explode");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.elapsed_ms() >= 5);
        timer.finish();
    }

    #[test]
    fn test_command_span_without_subscriber() {
        let span = command_span("implode", "out/");
        let _guard = span.enter();
    }
}
