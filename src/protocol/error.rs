use serde::Deserialize;
use thiserror::Error;

/// The request never produced an HTTP response (DNS, refused connection, timeout).
#[derive(Debug, Clone, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
	/// What the transport reported.
	pub message: String,
}

impl TransportError {
	/// Error with a message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

impl From<reqwest::Error> for TransportError {
	fn from(err: reqwest::Error) -> Self {
		Self::new(err.to_string())
	}
}

/// Normalized non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("API Error {status}: {message}")]
pub struct ApiError {
	/// HTTP status code.
	pub status: u16,
	/// `detail`, `message` or `code` from the body, else the status text.
	pub message: String,
	/// Machine-readable code, when the body has one.
	pub code: Option<String>,
	/// Request id echoed by the server.
	pub request_id: Option<String>,
}

/// Error body the remote service sends with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
	#[serde(default)]
	pub detail: Option<String>,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub code: Option<String>,
}

impl ApiError {
	/// Builds the error from a raw body, falling back to the status text when
	/// the body is not a JSON error object.
	pub(crate) fn from_body(
		status: u16,
		status_text: &str,
		body: &[u8],
		request_id: Option<String>,
	) -> Self {
		let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
		let message = [&parsed.detail, &parsed.message, &parsed.code]
			.into_iter()
			.flatten()
			.find(|s| !s.is_empty())
			.cloned()
			.unwrap_or_else(|| status_text.to_string());
		Self {
			status,
			message,
			code: parsed.code,
			request_id,
		}
	}

	/// `409`, e.g. a person that already exists.
	pub fn is_conflict(&self) -> bool {
		self.status == 409
	}

	/// `404`.
	pub fn is_not_found(&self) -> bool {
		self.status == 404
	}
}

/// Every failure a protocol call can report.
#[derive(Debug, Error)]
pub enum ProtocolError {
	/// No response arrived.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The server answered with a non-2xx status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// A request or response body was not the expected JSON.
	#[error("invalid JSON payload: {0}")]
	Json(#[from] serde_json::Error),
	/// A configured header value cannot go on the wire.
	#[error("invalid header value: {0}")]
	InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
	/// The request path did not form a valid URL.
	#[error("invalid request path `{path}`: {source}")]
	InvalidPath {
		/// The path as given.
		path: String,
		/// Why it did not parse.
		#[source]
		source: url::ParseError,
	},
	/// A list response broke `items <= limit` or `offset + items <= total`.
	#[error("inconsistent page envelope: {0}")]
	InvalidEnvelope(String),
	/// A body was required but the server sent `204`.
	#[error("expected a response body but the server sent 204 No Content")]
	UnexpectedNoContent,
	/// An internal endpoint was called without the capability.
	#[error("internal protocol endpoint `{0}` is disabled for this client")]
	InternalDisabled(&'static str),
}

impl ProtocolError {
	/// The server error, if that is what this is.
	pub fn api(&self) -> Option<&ApiError> {
		match self {
			Self::Api(err) => Some(err),
			_ => None,
		}
	}

	/// True when no response arrived.
	pub fn is_transport(&self) -> bool {
		matches!(self, Self::Transport(_))
	}
}

/// Result of a protocol call.
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detail_wins_over_message() {
		let err = ApiError::from_body(
			400,
			"Bad Request",
			br#"{"detail":"owner_id required","message":"bad"}"#,
			None,
		);
		assert_eq!(err.to_string(), "API Error 400: owner_id required");
	}

	#[test]
	fn code_used_when_no_text_fields() {
		let err = ApiError::from_body(429, "Too Many Requests", br#"{"code":"RATE_LIMITED"}"#, None);
		assert_eq!(err.message, "RATE_LIMITED");
		assert_eq!(err.code.as_deref(), Some("RATE_LIMITED"));
	}

	#[test]
	fn unparsable_body_falls_back_to_status_text() {
		let err = ApiError::from_body(502, "Bad Gateway", b"<html>upstream</html>", None);
		assert_eq!(err.to_string(), "API Error 502: Bad Gateway");
		assert!(err.code.is_none());
	}

	#[test]
	fn empty_object_falls_back_to_status_text() {
		let err = ApiError::from_body(500, "Internal Server Error", b"{}", Some("req-1".into()));
		assert_eq!(err.message, "Internal Server Error");
		assert_eq!(err.request_id.as_deref(), Some("req-1"));
	}
}
