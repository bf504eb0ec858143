//! HTTP transport that runs the registered hooks around every call.
//!
//! # Responsibilities
//! - Resolve the default timeout through the `default_timeout` filters
//! - Assemble `RequestArgs` and pass them through the `request_args` filters
//! - Build the connection options and run the `pre_dispatch` actions
//! - Dispatch with reqwest, then report the outcome to the `debug` actions
//!
//! # Design Decisions
//! - A client is built per call so the connect timeout from the handle applies
//! - Invalid input is rejected before any hook that expects a real call runs

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use url::Url;
use uuid::Uuid;

use crate::config::schema::TransportConfig;
use crate::config::validation::{secs_to_duration, ValidationError};
use crate::observability::metrics;
use crate::transport::args::RequestArgs;
use crate::transport::handle::{TransportHandle, TransportOptions};
use crate::transport::hooks::{DebugEvent, DebugResponse, HookRegistry};
use crate::transport::TransportError;

/// Identifier reported to debug actions.
pub const TRANSPORT_NAME: &str = "reqwest";

/// Default timeout before any filter runs.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Caller-supplied request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Explicit timeout; overrides the filtered default when set.
    pub timeout: Option<Duration>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

/// A request that has passed every pre-dispatch stage.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub url: Url,
    pub method: Method,
    /// Default timeout after the `default_timeout` filters.
    pub default_timeout: Duration,
    pub args: RequestArgs,
    pub options: TransportOptions,
}

/// Response returned to the caller.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Outbound HTTP transport with interception points.
#[derive(Debug)]
pub struct HttpTransport {
    hooks: HookRegistry,
    default_timeout: Duration,
    user_agent: String,
    max_redirects: u32,
    use_system_proxy: bool,
}

impl HttpTransport {
    /// Create a transport with built-in defaults.
    pub fn new(hooks: HookRegistry) -> Self {
        let defaults = TransportConfig::default();
        Self {
            hooks,
            default_timeout: DEFAULT_TIMEOUT,
            user_agent: defaults.user_agent,
            max_redirects: defaults.max_redirects,
            use_system_proxy: defaults.use_system_proxy,
        }
    }

    /// Create a transport from configuration.
    pub fn from_config(config: &TransportConfig, hooks: HookRegistry) -> Result<Self, ValidationError> {
        let default_timeout =
            secs_to_duration("transport.default_timeout_secs", config.default_timeout_secs)?;
        Ok(Self {
            hooks,
            default_timeout,
            user_agent: config.user_agent.clone(),
            max_redirects: config.max_redirects,
            use_system_proxy: config.use_system_proxy,
        })
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_system_proxy(mut self, enabled: bool) -> Self {
        self.use_system_proxy = enabled;
        self
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Run every pre-dispatch stage without touching the network.
    pub fn prepare(
        &self,
        method: &str,
        url: &str,
        options: RequestOptions,
    ) -> Result<PreparedRequest, TransportError> {
        let parsed = Url::parse(url).map_err(|source| TransportError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| TransportError::InvalidMethod(method.to_string()))?;

        let default_timeout = self.hooks.apply_default_timeout(self.default_timeout);

        let args = RequestArgs {
            method: method.to_string(),
            timeout: options.timeout.unwrap_or(default_timeout),
            redirection: self.max_redirects,
            user_agent: self.user_agent.clone(),
            headers: options.headers,
            body: options.body,
        };
        let args = self.hooks.apply_request_args(args, parsed.as_str());

        for (name, value) in &args.headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() || HeaderValue::from_str(value).is_err() {
                return Err(TransportError::InvalidHeader(name.clone()));
            }
        }

        let mut handle = TransportOptions::new(args.timeout);
        self.hooks.run_pre_dispatch(&mut handle);

        Ok(PreparedRequest {
            url: parsed,
            method,
            default_timeout,
            args,
            options: handle,
        })
    }

    /// Send a request through every interception point.
    pub async fn request(
        &self,
        method: &str,
        url: &str,
        options: RequestOptions,
    ) -> Result<TransportResponse, TransportError> {
        let prepared = self.prepare(method, url, options)?;
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        tracing::debug!(
            request_id = %request_id,
            method = %prepared.method,
            url = %prepared.url,
            connect_timeout_secs = prepared.options.connect_timeout().as_secs_f64(),
            total_timeout_secs = prepared.options.total_timeout().as_secs_f64(),
            "Dispatching request"
        );

        let result = self.dispatch(&prepared).await;

        let response = match &result {
            Ok(resp) => DebugResponse::Success {
                status: resp.status,
                headers: resp.headers.clone(),
                body_bytes: resp.body.len(),
            },
            Err(e) => DebugResponse::Error {
                message: e.to_string(),
            },
        };
        metrics::record_request(if result.is_ok() { "success" } else { "error" }, start);

        let event = DebugEvent {
            request_id,
            response,
            context: "response",
            transport: TRANSPORT_NAME,
            args: prepared.args,
            url: prepared.url.to_string(),
        };
        self.hooks.run_debug(&event);

        result
    }

    pub async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        self.request("GET", url, RequestOptions::default()).await
    }

    async fn dispatch(&self, prepared: &PreparedRequest) -> Result<TransportResponse, TransportError> {
        let total_timeout = prepared.options.total_timeout();

        let mut builder = reqwest::Client::builder()
            .connect_timeout(prepared.options.connect_timeout())
            .timeout(total_timeout)
            .redirect(reqwest::redirect::Policy::limited(prepared.args.redirection as usize))
            .user_agent(prepared.args.user_agent.as_str());
        if !self.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(TransportError::Build)?;

        let mut request = client.request(prepared.method.clone(), prepared.url.clone());
        for (name, value) in &prepared.args.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &prepared.args.body {
            request = request.body(body.clone());
        }

        let response = request.send().await.map_err(|e| classify(e, total_timeout))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response.text().await.map_err(|e| classify(e, total_timeout))?;

        Ok(TransportResponse { status, headers, body })
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Request(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::hooks::DEFAULT_PRIORITY;

    #[test]
    fn test_prepare_without_hooks_uses_default() {
        let transport = HttpTransport::new(HookRegistry::new());
        let prepared = transport
            .prepare("GET", "http://example.test/", RequestOptions::default())
            .unwrap();

        assert_eq!(prepared.default_timeout, DEFAULT_TIMEOUT);
        assert_eq!(prepared.args.timeout, DEFAULT_TIMEOUT);
        assert_eq!(prepared.options.total_timeout(), DEFAULT_TIMEOUT);
        assert_eq!(prepared.options.connect_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_explicit_timeout_wins_over_default() {
        let mut hooks = HookRegistry::new();
        hooks.on_default_timeout(DEFAULT_PRIORITY, |_| Duration::from_secs(60));
        let transport = HttpTransport::new(hooks);

        let options = RequestOptions {
            timeout: Some(Duration::from_secs(2)),
            ..Default::default()
        };
        let prepared = transport.prepare("POST", "http://example.test/", options).unwrap();
        assert_eq!(prepared.default_timeout, Duration::from_secs(60));
        assert_eq!(prepared.args.timeout, Duration::from_secs(2));
        assert_eq!(prepared.args.method, "POST");
    }

    #[test]
    fn test_rejects_bad_input() {
        let transport = HttpTransport::new(HookRegistry::new());
        assert!(matches!(
            transport.prepare("GET", "not a url", RequestOptions::default()),
            Err(TransportError::InvalidUrl { .. })
        ));
        assert!(matches!(
            transport.prepare("BAD METHOD", "http://example.test/", RequestOptions::default()),
            Err(TransportError::InvalidMethod(_))
        ));

        let mut options = RequestOptions::default();
        options.headers.insert("bad header".into(), "x".into());
        assert!(matches!(
            transport.prepare("GET", "http://example.test/", options),
            Err(TransportError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_from_config_rejects_zero_default() {
        let config = TransportConfig {
            default_timeout_secs: 0.0,
            ..Default::default()
        };
        assert!(HttpTransport::from_config(&config, HookRegistry::new()).is_err());
    }
}
