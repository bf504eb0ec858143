//! Resolved, immutable policy settings.

use serde::Serialize;
use std::time::Duration;

use crate::config::overrides::SettingsOverride;
use crate::config::schema::FloorConfig;
use crate::config::validation::secs_to_duration;
use crate::config::ConfigError;
use crate::transport::args::serialize_secs;

/// Default timeout floor in seconds.
pub const DEFAULT_FLOOR_SECS: f64 = 15.0;

/// Settings the policy reads on every call. Built once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicySettings {
    #[serde(rename = "floor_secs", serialize_with = "serialize_secs")]
    floor: Duration,
    diagnostics: bool,
    debug_mode: bool,
    activate_everywhere: bool,
}

impl PolicySettings {
    /// Settings with the given floor and every flag off.
    pub fn new(floor: Duration) -> Self {
        Self {
            floor,
            diagnostics: false,
            debug_mode: false,
            activate_everywhere: false,
        }
    }

    pub fn with_diagnostics(mut self, debug_mode: bool, diagnostics: bool) -> Self {
        self.debug_mode = debug_mode;
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_activate_everywhere(mut self, enabled: bool) -> Self {
        self.activate_everywhere = enabled;
        self
    }

    /// Resolve settings from a loaded config, then each override in turn.
    pub fn resolve(
        config: &FloorConfig,
        overrides: &[&dyn SettingsOverride],
    ) -> Result<Self, ConfigError> {
        let mut floor_secs = config.policy.floor_secs;
        let mut diagnostics = config.diagnostics.enabled;
        let mut debug_mode = config.diagnostics.debug_mode;
        let mut activate_everywhere = config.policy.activate_everywhere;

        for o in overrides {
            floor_secs = o.floor_secs(floor_secs);
            diagnostics = o.diagnostics(diagnostics);
            debug_mode = o.debug_mode(debug_mode);
            activate_everywhere = o.activate_everywhere(activate_everywhere);
        }

        let floor = secs_to_duration("policy.floor_secs", floor_secs)
            .map_err(|e| ConfigError::Validation(vec![e]))?;

        tracing::info!(
            floor_secs,
            diagnostics,
            debug_mode,
            activate_everywhere,
            "Timeout floor settings resolved"
        );

        Ok(Self {
            floor,
            diagnostics,
            debug_mode,
            activate_everywhere,
        })
    }

    pub fn floor(&self) -> Duration {
        self.floor
    }

    /// Both the global debug flag and the diagnostics flag are on.
    pub fn diagnostics_enabled(&self) -> bool {
        self.debug_mode && self.diagnostics
    }

    pub fn activate_everywhere(&self) -> bool {
        self.activate_everywhere
    }
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self::new(Duration::from_secs_f64(DEFAULT_FLOOR_SECS))
    }
}
