//! Pluggable overrides for the policy settings.
//!
//! Each override receives the value resolved so far and returns the value to
//! use. Overrides run once at startup, in the order they are given.

/// An extension point consulted once while resolving `PolicySettings`.
pub trait SettingsOverride: Send + Sync {
    fn floor_secs(&self, current: f64) -> f64 {
        current
    }

    fn diagnostics(&self, current: bool) -> bool {
        current
    }

    fn debug_mode(&self, current: bool) -> bool {
        current
    }

    fn activate_everywhere(&self, current: bool) -> bool {
        current
    }
}

pub const ENV_FLOOR_SECONDS: &str = "TIMEOUT_FLOOR_SECONDS";
pub const ENV_DIAGNOSTICS: &str = "TIMEOUT_FLOOR_DIAGNOSTICS";
pub const ENV_DEBUG: &str = "TIMEOUT_FLOOR_DEBUG";
pub const ENV_EVERYWHERE: &str = "TIMEOUT_FLOOR_EVERYWHERE";

/// Overrides read from environment variables.
///
/// Values that fail to parse are ignored with a warning.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    floor_secs: Option<f64>,
    diagnostics: Option<bool>,
    debug_mode: Option<bool>,
    activate_everywhere: Option<bool>,
}

impl EnvOverrides {
    /// Snapshot the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            floor_secs: lookup(ENV_FLOOR_SECONDS).and_then(|v| parse_secs(ENV_FLOOR_SECONDS, &v)),
            diagnostics: lookup(ENV_DIAGNOSTICS).and_then(|v| parse_flag(ENV_DIAGNOSTICS, &v)),
            debug_mode: lookup(ENV_DEBUG).and_then(|v| parse_flag(ENV_DEBUG, &v)),
            activate_everywhere: lookup(ENV_EVERYWHERE).and_then(|v| parse_flag(ENV_EVERYWHERE, &v)),
        }
    }
}

impl SettingsOverride for EnvOverrides {
    fn floor_secs(&self, current: f64) -> f64 {
        self.floor_secs.unwrap_or(current)
    }

    fn diagnostics(&self, current: bool) -> bool {
        self.diagnostics.unwrap_or(current)
    }

    fn debug_mode(&self, current: bool) -> bool {
        self.debug_mode.unwrap_or(current)
    }

    fn activate_everywhere(&self, current: bool) -> bool {
        self.activate_everywhere.unwrap_or(current)
    }
}

fn parse_secs(key: &str, raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(secs) => Some(secs),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring non-numeric override");
            None
        }
    }
}

fn parse_flag(key: &str, raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => {
            tracing::warn!(key, value = %raw, "Ignoring non-boolean override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_unset_passes_through() {
        let env = EnvOverrides::from_lookup(lookup(&[]));
        assert_eq!(env.floor_secs(15.0), 15.0);
        assert!(!env.diagnostics(false));
        assert!(env.activate_everywhere(true));
    }

    #[test]
    fn test_values_applied() {
        let env = EnvOverrides::from_lookup(lookup(&[
            (ENV_FLOOR_SECONDS, "42"),
            (ENV_DIAGNOSTICS, "yes"),
            (ENV_DEBUG, "TRUE"),
            (ENV_EVERYWHERE, "0"),
        ]));
        assert_eq!(env.floor_secs(15.0), 42.0);
        assert!(env.diagnostics(false));
        assert!(env.debug_mode(false));
        assert!(!env.activate_everywhere(true));
    }

    #[test]
    fn test_garbage_ignored() {
        let env = EnvOverrides::from_lookup(lookup(&[
            (ENV_FLOOR_SECONDS, "fifteen"),
            (ENV_DIAGNOSTICS, "maybe"),
        ]));
        assert_eq!(env.floor_secs(15.0), 15.0);
        assert!(!env.diagnostics(false));
    }
}
