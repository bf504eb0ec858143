//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FloorConfig (validated, immutable)
//!     → overrides.rs (environment and caller-supplied overrides)
//!     → PolicySettings (resolved once, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod overrides;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use overrides::{EnvOverrides, SettingsOverride};
pub use schema::{DiagnosticsConfig, FloorConfig, ObservabilityConfig, PolicyConfig, TransportConfig};
pub use validation::ValidationError;
