use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use url::Url;

use super::error::TransportError;

/// A fully built request, ready to hit the wire.
#[derive(Clone, Debug)]
pub struct HttpRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL including the query.
	pub url: Url,
	/// Final headers, authorization included.
	pub headers: HeaderMap,
	/// JSON payload.
	pub body: Option<Vec<u8>>,
}

/// Raw response as the transport saw it.
#[derive(Clone, Debug)]
pub struct HttpResponse {
	/// HTTP status.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Empty for `204`.
	pub body: Vec<u8>,
}

impl HttpResponse {
	/// Response without headers.
	pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: body.into(),
		}
	}

	/// Canonical reason phrase, used when the error body says nothing.
	pub fn status_text(&self) -> &'static str {
		self.status.canonical_reason().unwrap_or("Unknown Status")
	}
}

/// Sends requests to the relationship-graph service.
///
/// Futures are not `Send`: in the browser everything runs on the single
/// event-loop thread.
#[async_trait(?Send)]
pub trait Transport {
	/// Performs one request. Non-2xx statuses are responses, not errors.
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `reqwest` backed transport. On wasm32 this goes through `fetch`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
	client: reqwest::Client,
}

impl ReqwestTransport {
	/// Transport with a default `reqwest::Client`.
	pub fn new() -> Self {
		Self::default()
	}

	/// Transport over a preconfigured client.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self { client }
	}
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
		let mut builder = self
			.client
			.request(request.method, request.url)
			.headers(request.headers);
		if let Some(body) = request.body {
			builder = builder.body(body);
		}
		let response = builder.send().await?;
		let status = response.status();
		let headers = response.headers().clone();
		// 204 bodies are never read.
		let body = if status == StatusCode::NO_CONTENT {
			Vec::new()
		} else {
			response.bytes().await?.to_vec()
		};
		Ok(HttpResponse {
			status,
			headers,
			body,
		})
	}
}
