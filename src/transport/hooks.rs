//! Extension points exposed by the transport.
//!
//! # Responsibilities
//! - Hold typed callbacks for each interception point
//! - Run them in priority order (lower first, ties in registration order)
//!
//! # Interception points
//! - `default_timeout`: filter over the transport's default timeout
//! - `request_args`: filter over the assembled `RequestArgs`
//! - `pre_dispatch`: action over the `TransportHandle` right before I/O
//! - `debug`: action over the `DebugEvent` after the call completes

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::transport::args::RequestArgs;
use crate::transport::handle::TransportHandle;

/// Priority used when a collaborator has no ordering preference.
pub const DEFAULT_PRIORITY: i32 = 10;

pub type DefaultTimeoutFilter = Arc<dyn Fn(Duration) -> Duration + Send + Sync>;
pub type RequestArgsFilter = Arc<dyn Fn(RequestArgs, &str) -> RequestArgs + Send + Sync>;
pub type PreDispatchAction = Arc<dyn Fn(&mut dyn TransportHandle) + Send + Sync>;
pub type DebugAction = Arc<dyn Fn(&DebugEvent) + Send + Sync>;

/// Outcome of a completed call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DebugResponse {
    Success {
        status: u16,
        headers: BTreeMap<String, String>,
        body_bytes: usize,
    },
    Error {
        message: String,
    },
}

/// Everything the transport knows about a call once it has finished.
#[derive(Debug, Clone)]
pub struct DebugEvent {
    pub request_id: Uuid,
    pub response: DebugResponse,
    /// What stage produced the event, e.g. "response".
    pub context: &'static str,
    /// Transport implementation identifier.
    pub transport: &'static str,
    pub args: RequestArgs,
    pub url: String,
}

struct Hook<F> {
    priority: i32,
    callback: F,
}

fn insert_sorted<F>(hooks: &mut Vec<Hook<F>>, priority: i32, callback: F) {
    let at = hooks.partition_point(|h| h.priority <= priority);
    hooks.insert(at, Hook { priority, callback });
}

/// Registry of callbacks for every interception point.
#[derive(Default)]
pub struct HookRegistry {
    default_timeout: Vec<Hook<DefaultTimeoutFilter>>,
    request_args: Vec<Hook<RequestArgsFilter>>,
    pre_dispatch: Vec<Hook<PreDispatchAction>>,
    debug: Vec<Hook<DebugAction>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_default_timeout<F>(&mut self, priority: i32, filter: F)
    where
        F: Fn(Duration) -> Duration + Send + Sync + 'static,
    {
        let filter: DefaultTimeoutFilter = Arc::new(filter);
        insert_sorted(&mut self.default_timeout, priority, filter);
    }

    pub fn on_request_args<F>(&mut self, priority: i32, filter: F)
    where
        F: Fn(RequestArgs, &str) -> RequestArgs + Send + Sync + 'static,
    {
        let filter: RequestArgsFilter = Arc::new(filter);
        insert_sorted(&mut self.request_args, priority, filter);
    }

    pub fn on_pre_dispatch<F>(&mut self, priority: i32, action: F)
    where
        F: Fn(&mut dyn TransportHandle) + Send + Sync + 'static,
    {
        let action: PreDispatchAction = Arc::new(action);
        insert_sorted(&mut self.pre_dispatch, priority, action);
    }

    pub fn on_debug<F>(&mut self, priority: i32, action: F)
    where
        F: Fn(&DebugEvent) + Send + Sync + 'static,
    {
        let action: DebugAction = Arc::new(action);
        insert_sorted(&mut self.debug, priority, action);
    }

    pub fn apply_default_timeout(&self, timeout: Duration) -> Duration {
        self.default_timeout
            .iter()
            .fold(timeout, |acc, hook| (hook.callback)(acc))
    }

    pub fn apply_request_args(&self, args: RequestArgs, url: &str) -> RequestArgs {
        self.request_args
            .iter()
            .fold(args, |acc, hook| (hook.callback)(acc, url))
    }

    pub fn run_pre_dispatch(&self, handle: &mut dyn TransportHandle) {
        for hook in &self.pre_dispatch {
            (hook.callback)(handle);
        }
    }

    pub fn run_debug(&self, event: &DebugEvent) {
        for hook in &self.debug {
            (hook.callback)(event);
        }
    }

    /// Total number of registered callbacks across all points.
    pub fn len(&self) -> usize {
        self.default_timeout.len() + self.request_args.len() + self.pre_dispatch.len() + self.debug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("default_timeout", &self.default_timeout.len())
            .field("request_args", &self.request_args.len())
            .field("pre_dispatch", &self.pre_dispatch.len())
            .field("debug", &self.debug.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::handle::TransportOptions;
    use std::sync::Mutex;

    #[test]
    fn test_filters_run_in_priority_order() {
        let mut hooks = HookRegistry::new();
        hooks.on_default_timeout(20, |t| t * 2);
        hooks.on_default_timeout(5, |t| t + Duration::from_secs(1));

        // (1 + 1) * 2, not 1 * 2 + 1
        assert_eq!(hooks.apply_default_timeout(Duration::from_secs(1)), Duration::from_secs(4));
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = HookRegistry::new();
        for name in ["first", "second", "third"] {
            let order = order.clone();
            hooks.on_pre_dispatch(DEFAULT_PRIORITY, move |_| order.lock().unwrap().push(name));
        }

        let mut handle = TransportOptions::new(Duration::from_secs(1));
        hooks.run_pre_dispatch(&mut handle);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_request_args_filter_sees_url() {
        let mut hooks = HookRegistry::new();
        hooks.on_request_args(DEFAULT_PRIORITY, |mut args, url| {
            args.headers.insert("x-url".into(), url.to_string());
            args
        });

        let args = RequestArgs::new("GET", Duration::from_secs(5));
        let args = hooks.apply_request_args(args, "http://example.test/");
        assert_eq!(args.headers["x-url"], "http://example.test/");
    }

    #[test]
    fn test_empty_registry_is_identity() {
        let hooks = HookRegistry::new();
        assert!(hooks.is_empty());
        assert_eq!(hooks.apply_default_timeout(Duration::from_secs(5)), Duration::from_secs(5));
    }

    #[test]
    fn test_len_counts_every_point() {
        let mut hooks = HookRegistry::new();
        hooks.on_default_timeout(DEFAULT_PRIORITY, |t| t);
        hooks.on_request_args(DEFAULT_PRIORITY, |a, _| a);
        hooks.on_pre_dispatch(DEFAULT_PRIORITY, |_| {});
        hooks.on_debug(DEFAULT_PRIORITY, |_| {});
        assert_eq!(hooks.len(), 4);
    }
}
