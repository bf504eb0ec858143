//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the timeout
//! floor. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FloorConfig {
    /// Timeout floor policy.
    pub policy: PolicyConfig,

    /// Post-request diagnostics.
    pub diagnostics: DiagnosticsConfig,

    /// Reference transport settings.
    pub transport: TransportConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Timeout floor policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Minimum timeout in seconds applied to every outbound request.
    pub floor_secs: f64,

    /// Install the policy outside the administrative context too.
    pub activate_everywhere: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            floor_secs: 15.0,
            activate_everywhere: false,
        }
    }
}

/// Diagnostics configuration.
///
/// Both flags must be on before anything reaches the diagnostics sink.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Process-wide debug mode.
    pub debug_mode: bool,

    /// Per-request diagnostics for the timeout floor.
    pub enabled: bool,
}

/// Settings for the bundled HTTP transport.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Default request timeout in seconds before any policy runs.
    pub default_timeout_secs: f64,

    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Maximum number of redirects to follow.
    pub max_redirects: u32,

    /// Honour HTTP_PROXY / HTTPS_PROXY from the environment.
    pub use_system_proxy: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 5.0,
            user_agent: format!("timeout-floor/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 5,
            use_system_proxy: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
