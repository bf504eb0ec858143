//! Outbound HTTP transport and its extension points.
//!
//! # Data Flow
//! ```text
//! HttpTransport::request(method, url, options)
//!     → hooks.rs default_timeout filters (transport default, 5s)
//!     → args.rs RequestArgs assembled
//!     → hooks.rs request_args filters
//!     → handle.rs TransportOptions (connect/total timeout)
//!     → hooks.rs pre_dispatch actions
//!     → client.rs reqwest dispatch
//!     → hooks.rs debug actions (success or error)
//! ```
//!
//! # Design Decisions
//! - Collaborators attach typed callbacks; the transport knows nothing about them
//! - Every interception point runs on the caller's task, synchronously

use std::time::Duration;
use thiserror::Error;

pub mod args;
pub mod client;
pub mod handle;
pub mod hooks;

pub use args::RequestArgs;
pub use client::{HttpTransport, PreparedRequest, RequestOptions, TransportResponse};
pub use handle::{TransportHandle, TransportOptions};
pub use hooks::{DebugEvent, DebugResponse, HookRegistry, DEFAULT_PRIORITY};

/// Errors returned by `HttpTransport`.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("Invalid header '{0}'")]
    InvalidHeader(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),
}
