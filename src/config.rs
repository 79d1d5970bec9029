//! Configuration for the WebSocket client handshake.

use std::time::Duration;

/// Polling budget used while waiting for the server's handshake response.
///
/// `open()` blocks the calling thread for at most
/// `max_attempts × delay` before reporting a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponsePolling {
    /// Maximum number of availability checks.
    ///
    /// Default: 300
    pub max_attempts: u16,

    /// Pause between two availability checks.
    ///
    /// Default: 10 ms
    pub delay: Duration,
}

impl Default for ResponsePolling {
    fn default() -> Self {
        Self {
            max_attempts: 300,
            delay: Duration::from_millis(10),
        }
    }
}

impl ResponsePolling {
    /// Create a polling budget with custom values.
    #[must_use]
    pub const fn new(max_attempts: u16, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Worst-case time spent waiting for a response.
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.delay * u32::from(self.max_attempts)
    }
}

/// WebSocket client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Response polling budget for the opening handshake.
    pub polling: ResponsePolling,
}

impl Config {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration suitable for small embedded targets.
    ///
    /// - Poll attempts: 100
    /// - Delay per attempt: 10 ms
    #[must_use]
    pub const fn embedded() -> Self {
        Self {
            polling: ResponsePolling::new(100, Duration::from_millis(10)),
        }
    }

    /// Set the response polling budget.
    #[must_use]
    pub const fn with_polling(mut self, polling: ResponsePolling) -> Self {
        self.polling = polling;
        self
    }

    /// Set the maximum number of response polling attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u16) -> Self {
        self.polling.max_attempts = max_attempts;
        self
    }

    /// Set the delay between response polling attempts.
    #[must_use]
    pub const fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.polling.delay = delay;
        self
    }
}
