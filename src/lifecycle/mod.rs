//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     FloorConfig → PolicySettings → activation gate → HttpTransport
//!
//! Activation (activation.rs):
//!     ExecutionContext::Admin or activate_everywhere → attach policy
//!     otherwise → attach nothing
//! ```
//!
//! # Design Decisions
//! - Ordered startup: settings first, then hooks, then transport
//! - The gate is decided once; there is no later attach or detach

pub mod activation;
pub mod startup;

pub use activation::{install, should_activate, ExecutionContext};
pub use startup::{bootstrap, Bootstrap};
