//! Activation gate.
//!
//! The policy only attaches in the administrative context unless the
//! activate-everywhere override is on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::policy::{DiagnosticsSink, PolicySettings, TimeoutPolicy};
use crate::transport::HookRegistry;

/// Where the hosting process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    /// Administrative / internal requests.
    Admin,
    /// Public-facing requests.
    Public,
    /// Command line or scheduled work.
    Cli,
}

impl ExecutionContext {
    pub fn is_admin(self) -> bool {
        matches!(self, ExecutionContext::Admin)
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionContext::Admin => "admin",
            ExecutionContext::Public => "public",
            ExecutionContext::Cli => "cli",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("unknown execution context '{0}' (expected admin, public or cli)")]
pub struct UnknownContext(String);

impl FromStr for ExecutionContext {
    type Err = UnknownContext;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(ExecutionContext::Admin),
            "public" => Ok(ExecutionContext::Public),
            "cli" => Ok(ExecutionContext::Cli),
            _ => Err(UnknownContext(s.to_string())),
        }
    }
}

/// Whether the policy should attach in `context`.
pub fn should_activate(context: ExecutionContext, settings: &PolicySettings) -> bool {
    context.is_admin() || settings.activate_everywhere()
}

/// Attach the policy to `hooks` if the gate allows it.
///
/// Returns `None` and registers nothing when the gate is closed.
pub fn install(
    hooks: &mut HookRegistry,
    settings: PolicySettings,
    context: ExecutionContext,
    sink: Arc<dyn DiagnosticsSink>,
) -> Option<Arc<TimeoutPolicy>> {
    if !should_activate(context, &settings) {
        tracing::info!(context = %context, "Timeout floor inactive in this context");
        return None;
    }

    let policy = Arc::new(TimeoutPolicy::new(settings, sink));
    policy.attach(hooks);
    Some(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::MemorySink;

    #[test]
    fn test_admin_activates() {
        let mut hooks = HookRegistry::new();
        let policy = install(
            &mut hooks,
            PolicySettings::default(),
            ExecutionContext::Admin,
            Arc::new(MemorySink::new()),
        );
        assert!(policy.is_some());
        assert_eq!(hooks.len(), 4);
    }

    #[test]
    fn test_gate_closed_registers_nothing() {
        for context in [ExecutionContext::Public, ExecutionContext::Cli] {
            let mut hooks = HookRegistry::new();
            let policy = install(
                &mut hooks,
                PolicySettings::default(),
                context,
                Arc::new(MemorySink::new()),
            );
            assert!(policy.is_none());
            assert!(hooks.is_empty());
        }
    }

    #[test]
    fn test_override_opens_gate() {
        let mut hooks = HookRegistry::new();
        let settings = PolicySettings::default().with_activate_everywhere(true);
        let policy = install(&mut hooks, settings, ExecutionContext::Public, Arc::new(MemorySink::new()));
        assert!(policy.is_some());
        assert_eq!(hooks.len(), 4);
    }

    #[test]
    fn test_parse_context() {
        assert_eq!("Admin".parse::<ExecutionContext>().unwrap(), ExecutionContext::Admin);
        assert_eq!("cli".parse::<ExecutionContext>().unwrap(), ExecutionContext::Cli);
        assert!("backend".parse::<ExecutionContext>().is_err());
    }
}
