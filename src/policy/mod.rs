//! Timeout floor policy.
//!
//! # Data Flow
//! ```text
//! FloorConfig + overrides
//!     → settings.rs (PolicySettings, resolved once)
//!     → resolver.rs (TimeoutPolicy, shared via Arc)
//!     → attached to transport::HookRegistry:
//!         default_timeout  → resolve_default_timeout   (raise only)
//!         request_args     → resolve_request_args      (raise only)
//!         pre_dispatch     → enforce_transport_options (always floor)
//!         debug            → log_diagnostics → diagnostics.rs sink
//! ```
//!
//! # Design Decisions
//! - Settings are immutable after startup; no locks on the request path
//! - Every operation is synchronous and reentrant

pub mod diagnostics;
pub mod resolver;
pub mod settings;

pub use diagnostics::{DiagnosticsSink, MemorySink, SinkError, TracingSink};
pub use resolver::{TimeoutPolicy, ENFORCE_PRIORITY};
pub use settings::PolicySettings;
