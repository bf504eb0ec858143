//! Request timeout floor for outbound HTTP calls.
//!
//! Attaches to a transport's interception points and makes sure no request
//! leaves with a timeout below the configured floor.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod policy;
pub mod transport;

pub use config::FloorConfig;
pub use lifecycle::{bootstrap, ExecutionContext};
pub use policy::{PolicySettings, TimeoutPolicy};
pub use transport::{HookRegistry, HttpTransport};
