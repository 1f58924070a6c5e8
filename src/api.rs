//! Client for the backtrace endpoint.
//!
//! `POST {api_base_url}/rca/backtrace` with `{ "search": "..." }`, answered by
//! `{ "routes": [...] }`. The request races a timer so a hung backend turns into
//! [`SearchError::Timeout`] instead of a spinner that never stops.

use futures_util::future::{Either, select};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::{Result, SearchError};
use crate::journey::routes_from_response;

#[derive(Debug, Serialize)]
struct BacktraceRequest<'a> {
	search: &'a str,
}

/// Issues backtrace searches against one backend.
#[derive(Clone, Debug)]
pub struct BacktraceClient {
	base_url: String,
	timeout_ms: u32,
}

impl BacktraceClient {
	/// Build a client from the page configuration.
	pub fn new(config: &AppConfig) -> Self {
		Self {
			base_url: config.api_base_url.clone(),
			timeout_ms: config.request_timeout_ms,
		}
	}

	/// Full URL of the backtrace endpoint.
	pub fn endpoint(&self) -> String {
		format!("{}/rca/backtrace", self.base_url.trim_end_matches('/'))
	}

	/// Fetch the parent routes for an already validated query.
	pub async fn backtrace(&self, search: &str) -> Result<Vec<Value>> {
		// `json` also sets `Content-Type: application/json`.
		let request = Request::post(&self.endpoint())
			.json(&BacktraceRequest { search })
			.map_err(|e| SearchError::Transport(e.to_string()))?;

		let send = Box::pin(request.send());
		let timer = Box::pin(TimeoutFuture::new(self.timeout_ms));
		let response = match select(send, timer).await {
			Either::Left((sent, _)) => sent.map_err(|e| SearchError::Transport(e.to_string()))?,
			Either::Right(_) => return Err(SearchError::Timeout(self.timeout_ms)),
		};

		if !response.ok() {
			return Err(SearchError::Status(response.status()));
		}

		let body = response
			.text()
			.await
			.map_err(|e| SearchError::Decode(e.to_string()))?;
		parse_backtrace_body(&body)
	}
}

/// Decode a response body. Valid JSON of the wrong shape means no routes.
pub fn parse_backtrace_body(body: &str) -> Result<Vec<Value>> {
	let payload: Value = serde_json::from_str(body).map_err(|e| SearchError::Decode(e.to_string()))?;
	Ok(routes_from_response(&payload))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoint_joins_without_double_slash() {
		let client = BacktraceClient::new(&AppConfig {
			api_base_url: "http://rca.local/api/".into(),
			..AppConfig::default()
		});
		assert_eq!(client.endpoint(), "http://rca.local/api/rca/backtrace");
	}

	#[test]
	fn request_body_shape() {
		let body = serde_json::to_value(BacktraceRequest { search: "CancelEmail" }).ok();
		assert_eq!(body, Some(serde_json::json!({ "search": "CancelEmail" })));
	}

	#[test]
	fn bodies_decode_to_routes() {
		let routes = parse_backtrace_body(r#"{ "routes": [[{ "type": "flow", "flowName": "F" }], []] }"#)
			.expect("valid body");
		assert_eq!(routes.len(), 2);

		assert_eq!(parse_backtrace_body(r#"{ "routes": null }"#), Ok(Vec::new()));
		assert_eq!(parse_backtrace_body("{}"), Ok(Vec::new()));
	}

	#[test]
	fn garbage_bodies_are_decode_errors() {
		assert!(matches!(parse_backtrace_body("<html>"), Err(SearchError::Decode(_))));
	}
}
