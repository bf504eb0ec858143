//! Timeout floor enforcement.
//!
//! # Responsibilities
//! - Raise the transport's default timeout to the floor
//! - Raise per-request timeouts to the floor
//! - Force the floor on the connection options right before dispatch
//! - Report completed calls to the diagnostics sink
//!
//! # Design Decisions
//! - The first two stages never lower a timeout another collaborator raised
//! - The pre-dispatch stage always writes the floor, even over a longer
//!   timeout; callers relying on longer timeouts lose them at this point
//! - Diagnostics failures are logged and dropped

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::observability::metrics;
use crate::policy::diagnostics::DiagnosticsSink;
use crate::policy::settings::PolicySettings;
use crate::transport::args::RequestArgs;
use crate::transport::handle::TransportHandle;
use crate::transport::hooks::{DebugEvent, HookRegistry, DEFAULT_PRIORITY};

/// Pre-dispatch priority; runs after collaborators at the default priority.
pub const ENFORCE_PRIORITY: i32 = 100;

/// Raises outbound request timeouts to a configured floor.
pub struct TimeoutPolicy {
    settings: PolicySettings,
    sink: Arc<dyn DiagnosticsSink>,
}

impl TimeoutPolicy {
    pub fn new(settings: PolicySettings, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self { settings, sink }
    }

    pub fn settings(&self) -> &PolicySettings {
        &self.settings
    }

    pub fn floor(&self) -> Duration {
        self.settings.floor()
    }

    /// `max(current, floor)`.
    pub fn resolve_default_timeout(&self, current: Duration) -> Duration {
        if current < self.floor() {
            tracing::debug!(
                from_secs = current.as_secs_f64(),
                floor_secs = self.floor().as_secs_f64(),
                stage = "default",
                "Raised default timeout to floor"
            );
            metrics::record_adjustment("default");
            self.floor()
        } else {
            current
        }
    }

    /// Raise `args.timeout` to the floor. The URL is not consulted.
    pub fn resolve_request_args(&self, mut args: RequestArgs, _url: &str) -> RequestArgs {
        if args.timeout < self.floor() {
            tracing::debug!(
                from_secs = args.timeout.as_secs_f64(),
                floor_secs = self.floor().as_secs_f64(),
                stage = "args",
                "Raised request timeout to floor"
            );
            metrics::record_adjustment("args");
            args.timeout = self.floor();
        }
        args
    }

    /// Set connect and total timeouts to exactly the floor.
    pub fn enforce_transport_options(&self, handle: &mut dyn TransportHandle) {
        let floor = self.floor();
        let previous = handle.total_timeout().max(handle.connect_timeout());
        if previous > floor {
            tracing::debug!(
                from_secs = previous.as_secs_f64(),
                floor_secs = floor.as_secs_f64(),
                stage = "transport",
                "Pre-dispatch override lowered a longer timeout to the floor"
            );
        }

        handle.set_connect_timeout(floor);
        handle.set_total_timeout(floor);
        metrics::record_adjustment("transport");
    }

    /// Write the completed call to the diagnostics sink.
    ///
    /// Silent unless both debug mode and diagnostics are enabled.
    pub fn log_diagnostics(&self, event: &DebugEvent) {
        if !self.settings.diagnostics_enabled() {
            return;
        }

        let records = [
            ("response", to_pretty_json(&event.response)),
            ("string", Some(event.context.to_string())),
            ("class", Some(event.transport.to_string())),
            ("args", to_pretty_json(&event.args)),
            ("url", Some(event.url.clone())),
        ];

        for (label, value) in records {
            let Some(value) = value else {
                continue;
            };
            if let Err(e) = self.sink.write(&format!("HTTP {}: {}", label, value)) {
                tracing::warn!(
                    request_id = %event.request_id,
                    record = label,
                    error = %e,
                    "Failed to write diagnostics"
                );
            }
        }
    }

    /// Register every interception point on `hooks`.
    pub fn attach(self: &Arc<Self>, hooks: &mut HookRegistry) {
        let policy = Arc::clone(self);
        hooks.on_default_timeout(DEFAULT_PRIORITY, move |t| policy.resolve_default_timeout(t));

        let policy = Arc::clone(self);
        hooks.on_request_args(DEFAULT_PRIORITY, move |args, url| policy.resolve_request_args(args, url));

        let policy = Arc::clone(self);
        hooks.on_pre_dispatch(ENFORCE_PRIORITY, move |handle| policy.enforce_transport_options(handle));

        let policy = Arc::clone(self);
        hooks.on_debug(DEFAULT_PRIORITY, move |event| policy.log_diagnostics(event));

        tracing::info!(floor_secs = self.floor().as_secs_f64(), "Timeout floor attached");
    }
}

impl std::fmt::Debug for TimeoutPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeoutPolicy")
            .field("settings", &self.settings)
            .finish()
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize diagnostics record");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::diagnostics::{MemorySink, SinkError};
    use crate::transport::handle::TransportOptions;
    use crate::transport::hooks::DebugResponse;
    use uuid::Uuid;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn policy(floor: u64) -> TimeoutPolicy {
        TimeoutPolicy::new(PolicySettings::new(secs(floor)), Arc::new(MemorySink::new()))
    }

    fn event() -> DebugEvent {
        DebugEvent {
            request_id: Uuid::new_v4(),
            response: DebugResponse::Error {
                message: "connection refused".into(),
            },
            context: "response",
            transport: "reqwest",
            args: RequestArgs::new("GET", secs(15)),
            url: "http://example.test/".into(),
        }
    }

    #[test]
    fn test_default_raised_to_floor() {
        let p = policy(15);
        assert_eq!(p.resolve_default_timeout(secs(5)), secs(15));
        assert_eq!(p.resolve_default_timeout(Duration::ZERO), secs(15));
    }

    #[test]
    fn test_default_never_lowered() {
        let p = policy(15);
        assert_eq!(p.resolve_default_timeout(secs(15)), secs(15));
        assert_eq!(p.resolve_default_timeout(secs(30)), secs(30));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let p = policy(15);
        for s in [0, 5, 15, 30] {
            let once = p.resolve_default_timeout(secs(s));
            assert_eq!(p.resolve_default_timeout(once), once);

            let args = p.resolve_request_args(RequestArgs::new("GET", secs(s)), "");
            assert_eq!(p.resolve_request_args(args.clone(), ""), args);
        }
    }

    #[test]
    fn test_request_args_only_touch_timeout() {
        let p = policy(15);
        let mut args = RequestArgs::new("PUT", secs(3));
        args.body = Some("payload".into());
        args.headers.insert("x-trace".into(), "abc".into());
        args.redirection = 2;

        let out = p.resolve_request_args(args.clone(), "http://example.test/");
        assert_eq!(out.timeout, secs(15));
        assert_eq!(RequestArgs { timeout: args.timeout, ..out }, args);
    }

    #[test]
    fn test_request_args_keep_longer_timeout() {
        let p = policy(15);
        let out = p.resolve_request_args(RequestArgs::new("GET", secs(45)), "http://example.test/");
        assert_eq!(out.timeout, secs(45));
    }

    #[test]
    fn test_enforce_overrides_lower_and_higher() {
        let p = policy(15);
        for s in [1, 15, 30] {
            let mut handle = TransportOptions::new(secs(s));
            p.enforce_transport_options(&mut handle);
            assert_eq!(handle.connect_timeout(), secs(15));
            assert_eq!(handle.total_timeout(), secs(15));
        }
    }

    #[test]
    fn test_diagnostics_silent_without_both_flags() {
        for (debug_mode, diagnostics) in [(false, false), (false, true), (true, false)] {
            let sink = Arc::new(MemorySink::new());
            let settings = PolicySettings::default().with_diagnostics(debug_mode, diagnostics);
            let p = TimeoutPolicy::new(settings, sink.clone());
            p.log_diagnostics(&event());
            assert!(sink.lines().is_empty());
        }
    }

    #[test]
    fn test_diagnostics_write_five_records() {
        let sink = Arc::new(MemorySink::new());
        let settings = PolicySettings::default().with_diagnostics(true, true);
        let p = TimeoutPolicy::new(settings, sink.clone());
        p.log_diagnostics(&event());

        let lines = sink.lines();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("HTTP response: "));
        assert!(lines[0].contains("connection refused"));
        assert_eq!(lines[1], "HTTP string: response");
        assert_eq!(lines[2], "HTTP class: reqwest");
        assert!(lines[3].contains("\"timeout_secs\": 15.0"));
        assert_eq!(lines[4], "HTTP url: http://example.test/");
    }

    struct BrokenSink;

    impl DiagnosticsSink for BrokenSink {
        fn write(&self, _line: &str) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("disk full".into()))
        }
    }

    #[test]
    fn test_sink_failure_is_swallowed() {
        let settings = PolicySettings::default().with_diagnostics(true, true);
        let p = TimeoutPolicy::new(settings, Arc::new(BrokenSink));
        p.log_diagnostics(&event());
    }

    #[test]
    fn test_attach_registers_all_points() {
        let p = Arc::new(policy(15));
        let mut hooks = HookRegistry::new();
        p.attach(&mut hooks);
        assert_eq!(hooks.len(), 4);
        assert_eq!(hooks.apply_default_timeout(secs(5)), secs(15));
    }
}
