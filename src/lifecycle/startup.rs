//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve policy settings from config and overrides
//! - Build the hook registry and run the activation gate
//! - Hand the registry to the transport
//!
//! # Design Decisions
//! - Fail fast: any settings error is fatal
//! - The policy attaches before the transport exists, so no request can
//!   bypass it

use std::sync::Arc;

use crate::config::{ConfigError, FloorConfig, SettingsOverride};
use crate::lifecycle::activation::{install, ExecutionContext};
use crate::policy::{DiagnosticsSink, PolicySettings, TimeoutPolicy};
use crate::transport::{HookRegistry, HttpTransport};

/// Everything produced at startup.
#[derive(Debug)]
pub struct Bootstrap {
    pub settings: PolicySettings,
    /// `None` when the activation gate stayed closed.
    pub policy: Option<Arc<TimeoutPolicy>>,
    pub transport: HttpTransport,
}

/// Resolve settings, install the policy and build the transport.
pub fn bootstrap(
    config: &FloorConfig,
    context: ExecutionContext,
    overrides: &[&dyn SettingsOverride],
    sink: Arc<dyn DiagnosticsSink>,
) -> Result<Bootstrap, ConfigError> {
    let settings = PolicySettings::resolve(config, overrides)?;

    let mut hooks = HookRegistry::new();
    let policy = install(&mut hooks, settings, context, sink);

    let transport = HttpTransport::from_config(&config.transport, hooks)
        .map_err(|e| ConfigError::Validation(vec![e]))?;

    tracing::info!(
        context = %context,
        active = policy.is_some(),
        "Startup complete"
    );

    Ok(Bootstrap {
        settings,
        policy,
        transport,
    })
}
