//! Low-level connection options set immediately before dispatch.

use std::time::Duration;

/// Mutable view of the options a transport applies when it opens the
/// connection. Pre-dispatch actions receive this.
pub trait TransportHandle {
    fn connect_timeout(&self) -> Duration;
    fn total_timeout(&self) -> Duration;
    fn set_connect_timeout(&mut self, timeout: Duration);
    fn set_total_timeout(&mut self, timeout: Duration);
}

/// Option set used by `HttpTransport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    connect_timeout: Duration,
    total_timeout: Duration,
}

impl TransportOptions {
    /// Both phases start from the request's resolved timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            connect_timeout: timeout,
            total_timeout: timeout,
        }
    }
}

impl TransportHandle for TransportOptions {
    fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    fn total_timeout(&self) -> Duration {
        self.total_timeout
    }

    fn set_connect_timeout(&mut self, timeout: Duration) {
        self.connect_timeout = timeout;
    }

    fn set_total_timeout(&mut self, timeout: Duration) {
        self.total_timeout = timeout;
    }
}
