use std::rc::Rc;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::config::ProtocolConfig;
use super::error::{ApiError, ProtocolError, Result};
use super::pagination::QueryParams;
use super::transport::{HttpRequest, HttpResponse, Transport};

/// Identifies the calling app.
pub const APP_ID_HEADER: &str = "x-app-id";
/// Contract version the client speaks.
pub const CONTRACT_VERSION_HEADER: &str = "x-contract-version";
/// Read back from responses for error reports.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Resolves the bearer token for each outgoing request.
///
/// Returning `None` sends the request unauthenticated; the service decides.
#[async_trait(?Send)]
pub trait TokenSupplier {
	/// Token for the next request, if any.
	async fn access_token(&self) -> Option<String>;
}

/// A fixed token, or none at all.
#[derive(Clone, Debug, Default)]
pub struct StaticToken(pub Option<String>);

#[async_trait(?Send)]
impl TokenSupplier for StaticToken {
	async fn access_token(&self) -> Option<String> {
		self.0.clone()
	}
}

/// One call against the service, relative to the client's base address.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	method: Method,
	path: String,
	segments: Vec<String>,
	query: QueryParams,
	headers: HeaderMap,
	body: Option<Vec<u8>>,
}

impl ApiRequest {
	/// Request for `path`, which is appended to the base address as is.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			segments: Vec::new(),
			query: QueryParams::new(),
			headers: HeaderMap::new(),
			body: None,
		}
	}

	/// `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// `PATCH` request.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, path)
	}

	/// `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Appends a percent-encoded path segment (typically a resource id).
	pub fn segment(mut self, segment: impl Into<String>) -> Self {
		self.segments.push(segment.into());
		self
	}

	/// Replaces the query string. An empty one adds no `?`.
	pub fn query(mut self, query: QueryParams) -> Self {
		self.query = query;
		self
	}

	/// Per-request header. Overrides the client defaults, but not `Authorization`
	/// when a token is resolved.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}

	/// Serializes `body` as the JSON payload.
	pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
		self.body = Some(serde_json::to_vec(body)?);
		Ok(self)
	}

	/// HTTP method.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Path without the encoded segments.
	pub fn path(&self) -> &str {
		&self.path
	}
}

/// Decoded payload, or its absence on `204`.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody<T> {
	/// A decoded JSON body.
	Json(T),
	/// `204 No Content`.
	NoContent,
}

/// Successful response with its metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse<T> {
	/// HTTP status, always 2xx.
	pub status: StatusCode,
	/// Value of [`REQUEST_ID_HEADER`], if sent.
	pub request_id: Option<String>,
	/// Payload.
	pub body: ResponseBody<T>,
}

impl<T> ApiResponse<T> {
	/// True for `204`.
	pub fn is_no_content(&self) -> bool {
		matches!(self.body, ResponseBody::NoContent)
	}

	/// The decoded body; a `204` fails with [`ProtocolError::UnexpectedNoContent`].
	pub fn into_body(self) -> Result<T> {
		match self.body {
			ResponseBody::Json(value) => Ok(value),
			ResponseBody::NoContent => Err(ProtocolError::UnexpectedNoContent),
		}
	}
}

/// Request/response contract shared by every resource client.
///
/// Cloning is cheap; clones share the transport and token supplier.
#[derive(Clone)]
pub struct ProtocolClient {
	config: Rc<ProtocolConfig>,
	transport: Rc<dyn Transport>,
	tokens: Option<Rc<dyn TokenSupplier>>,
}

impl ProtocolClient {
	/// Unauthenticated client over `transport`.
	pub fn new(config: ProtocolConfig, transport: Rc<dyn Transport>) -> Self {
		Self {
			config: Rc::new(config),
			transport,
			tokens: None,
		}
	}

	/// Attaches a bearer token source.
	pub fn with_token_supplier(mut self, tokens: Rc<dyn TokenSupplier>) -> Self {
		self.tokens = Some(tokens);
		self
	}

	/// Settings the client was built with.
	pub fn config(&self) -> &ProtocolConfig {
		&self.config
	}

	/// Base address without a trailing slash.
	pub fn base_url(&self) -> &str {
		self.config.normalized_base_url()
	}

	/// Fails unless the client was built with the internal capability.
	pub fn require_internal(&self, endpoint: &'static str) -> Result<()> {
		if self.config.internal_endpoints {
			Ok(())
		} else {
			Err(ProtocolError::InternalDisabled(endpoint))
		}
	}

	/// Sends `request` and decodes a JSON body. A 204 yields [`ResponseBody::NoContent`].
	pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<ApiResponse<T>> {
		let (response, request_id) = self.dispatch(request).await?;
		if response.status == StatusCode::NO_CONTENT {
			return Ok(ApiResponse {
				status: response.status,
				request_id,
				body: ResponseBody::NoContent,
			});
		}
		let value = serde_json::from_slice(&response.body).map_err(|err| {
			warn!(
				"undecodable {} response (request id {}): {err}",
				response.status,
				request_id.as_deref().unwrap_or("-")
			);
			ProtocolError::from(err)
		})?;
		Ok(ApiResponse {
			status: response.status,
			request_id,
			body: ResponseBody::Json(value),
		})
	}

	/// Like [`Self::execute`] but requires a body.
	pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
		self.execute(request).await?.into_body()
	}

	/// For calls whose success body is irrelevant (deletes).
	pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
		self.dispatch(request).await.map(|_| ())
	}

	async fn dispatch(&self, request: ApiRequest) -> Result<(HttpResponse, Option<String>)> {
		let http = self.build(request).await?;
		debug!("{} {}", http.method, http.url.path());
		let method = http.method.clone();
		let path = http.url.path().to_string();

		let response = self.transport.send(http).await.map_err(|err| {
			warn!("{method} {path} did not reach the service: {err}");
			ProtocolError::from(err)
		})?;

		let request_id = response
			.headers
			.get(REQUEST_ID_HEADER)
			.and_then(|v| v.to_str().ok())
			.map(str::to_string);

		if !response.status.is_success() {
			let err = ApiError::from_body(
				response.status.as_u16(),
				response.status_text(),
				&response.body,
				request_id,
			);
			warn!(
				"{method} {path} failed (request id {}): {err}",
				err.request_id.as_deref().unwrap_or("-")
			);
			return Err(err.into());
		}
		Ok((response, request_id))
	}

	async fn build(&self, request: ApiRequest) -> Result<HttpRequest> {
		let raw = format!("{}{}", self.base_url(), request.path);
		let mut url = Url::parse(&raw).map_err(|source| ProtocolError::InvalidPath {
			path: request.path.clone(),
			source,
		})?;
		if !request.segments.is_empty() {
			let mut segments = url.path_segments_mut().map_err(|()| ProtocolError::InvalidPath {
				path: request.path.clone(),
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			})?;
			segments.pop_if_empty();
			for segment in &request.segments {
				segments.push(segment);
			}
		}
		if !request.query.is_empty() {
			url.set_query(Some(&request.query.encode()));
		}

		let token = match &self.tokens {
			Some(tokens) => tokens.access_token().await,
			None => None,
		};

		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		headers.insert(
			HeaderName::from_static(APP_ID_HEADER),
			HeaderValue::from_str(&self.config.app_id)?,
		);
		headers.insert(
			HeaderName::from_static(CONTRACT_VERSION_HEADER),
			HeaderValue::from_str(&self.config.contract_version)?,
		);
		for (name, value) in &request.headers {
			headers.insert(name.clone(), value.clone());
		}
		if let Some(token) = token.filter(|t| !t.is_empty()) {
			headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
		}

		Ok(HttpRequest {
			method: request.method,
			url,
			headers,
			body: request.body,
		})
	}
}


#[cfg(test)]
mod tests {
	use futures::executor::block_on;
	use serde::Deserialize;

	use super::testing::{FakeTransport, client};
	use super::*;

	#[derive(Debug, Deserialize, PartialEq)]
	struct Echo {
		ok: bool,
	}

	#[test]
	fn default_headers_are_injected() {
		let transport = FakeTransport::new();
		transport.reply(200, r#"{"ok":true}"#);
		let client = client(&transport);

		let echo: Echo = block_on(client.send(ApiRequest::get("/v1/protocol/me"))).unwrap();
		assert!(echo.ok);

		let request = transport.last_request();
		assert_eq!(request.url.as_str(), "http://api.test/v1/protocol/me");
		assert_eq!(request.headers[CONTENT_TYPE], "application/json");
		assert_eq!(request.headers[APP_ID_HEADER], "eventmanage");
		assert_eq!(request.headers[CONTRACT_VERSION_HEADER], "1.0");
		assert!(request.headers.get(AUTHORIZATION).is_none());
	}

	#[test]
	fn bearer_token_is_attached_when_supplied() {
		let transport = FakeTransport::new();
		transport.reply(200, r#"{"ok":true}"#);
		let client = client(&transport)
			.with_token_supplier(Rc::new(StaticToken(Some("tok-123".into()))));

		let _: Echo = block_on(client.send(ApiRequest::get("/v1/protocol/me"))).unwrap();
		assert_eq!(transport.last_request().headers[AUTHORIZATION], "Bearer tok-123");
	}

	#[test]
	fn caller_headers_override_defaults() {
		let transport = FakeTransport::new();
		transport.reply(200, r#"{"ok":true}"#);
		let client = client(&transport);

		let request = ApiRequest::get("/v1/protocol/me").header(
			HeaderName::from_static(CONTRACT_VERSION_HEADER),
			HeaderValue::from_static("2.0"),
		);
		let _: Echo = block_on(client.send(request)).unwrap();
		assert_eq!(transport.last_request().headers[CONTRACT_VERSION_HEADER], "2.0");
	}

	#[test]
	fn segments_are_percent_encoded() {
		let transport = FakeTransport::new();
		transport.reply(200, r#"{"ok":true}"#);
		let client = client(&transport);

		let request = ApiRequest::get("/v1/protocol/people").segment("a b/c");
		let _: Echo = block_on(client.send(request)).unwrap();
		assert_eq!(
			transport.last_request().url.as_str(),
			"http://api.test/v1/protocol/people/a%20b%2Fc"
		);
	}

	#[test]
	fn not_found_with_detail_is_normalized() {
		let transport = FakeTransport::new();
		transport.reply_with_request_id(404, r#"{"detail":"not found"}"#, "req-9");
		let client = client(&transport);

		let err = block_on(client.send::<Echo>(ApiRequest::get("/v1/x"))).unwrap_err();
		assert_eq!(err.to_string(), "API Error 404: not found");
		assert_eq!(err.api().and_then(|e| e.request_id.as_deref()), Some("req-9"));
	}

	#[test]
	fn not_found_with_garbage_body_uses_status_text() {
		let transport = FakeTransport::new();
		transport.reply(404, "not json at all");
		let client = client(&transport);

		let err = block_on(client.send::<Echo>(ApiRequest::get("/v1/x"))).unwrap_err();
		assert_eq!(err.to_string(), "API Error 404: Not Found");
	}

	#[test]
	fn no_content_is_not_parsed() {
		let transport = FakeTransport::new();
		transport.reply(204, "");
		let client = client(&transport);

		let response = block_on(client.execute::<Echo>(ApiRequest::delete("/v1/x"))).unwrap();
		assert!(response.is_no_content());
		assert!(matches!(response.into_body(), Err(ProtocolError::UnexpectedNoContent)));

		transport.reply(204, "");
		block_on(client.send_empty(ApiRequest::delete("/v1/x"))).unwrap();
	}

	#[test]
	fn transport_failures_stay_distinct() {
		let transport = FakeTransport::new();
		transport.fail("dns lookup failed");
		let client = client(&transport);

		let err = block_on(client.send::<Echo>(ApiRequest::get("/v1/x"))).unwrap_err();
		assert!(err.is_transport());
		assert!(err.api().is_none());
	}

	#[test]
	fn malformed_success_body_is_a_json_error() {
		let transport = FakeTransport::new();
		transport.reply(200, r#"{"ok":"yes"}"#);
		let client = client(&transport);

		let err = block_on(client.send::<Echo>(ApiRequest::get("/v1/x"))).unwrap_err();
		assert!(matches!(err, ProtocolError::Json(_)));
	}

	#[test]
	fn internal_capability_gate() {
		let transport = FakeTransport::new();
		let client = client(&transport);
		assert!(matches!(
			client.require_internal("interaction"),
			Err(ProtocolError::InternalDisabled("interaction"))
		));
	}
}
