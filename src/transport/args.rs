//! Per-request argument set assembled by the transport.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

/// One outbound HTTP call, as seen by request-argument filters.
///
/// Only `timeout` is interpreted by the timeout floor; every other field is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestArgs {
    pub method: String,

    #[serde(rename = "timeout_secs", serialize_with = "serialize_secs")]
    pub timeout: Duration,

    /// Maximum number of redirects to follow.
    pub redirection: u32,

    pub user_agent: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl RequestArgs {
    pub fn new(method: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: method.into(),
            timeout,
            redirection: 5,
            user_agent: String::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }
}

/// Serialize a `Duration` as fractional seconds.
pub(crate) fn serialize_secs<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}
