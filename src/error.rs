//! Crate-level error types shared by grants, assertion signing, and the token transport.

// self
use crate::{
	_prelude::*,
	assertion::KeyError,
	auth::{IdentifierError, TokenResponseError},
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport or client-side failure surfaced by the HTTP layer.
	#[error(transparent)]
	Client(#[from] ClientError),
	/// The token endpoint answered with anything other than HTTP 200.
	#[error(transparent)]
	OAuth(#[from] OAuth20Error),
	/// The signing key could not be loaded or decrypted.
	#[error("Unable to load the assertion signing key.")]
	KeyDecryption(#[from] KeyError),

	/// A request parameter is missing or malformed.
	#[error("The `{name}` parameter is invalid.")]
	InvalidParameter {
		/// Wire name of the offending parameter.
		name: &'static str,
		/// Validation failure.
		#[source]
		source: ParameterError,
	},
	/// The requested grant type is not one this client can send.
	#[error("Grant type `{grant_type}` is not supported.")]
	UnsupportedGrantType {
		/// Grant type string supplied by the caller.
		grant_type: String,
	},
	/// The assertion claims could not be encoded into a JWS.
	#[error("Unable to sign the JWT assertion.")]
	Signing(#[source] jsonwebtoken::errors::Error),
	/// Token endpoint answered 200 with a body that cannot be hydrated.
	#[error("Token endpoint returned a malformed token response.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Token endpoint answered 200 with values outside the accepted range.
	#[error(transparent)]
	TokenResponse(#[from] TokenResponseError),
	/// The operation is declared but has no implementation yet.
	#[error("`{operation}` is not implemented (endpoint {endpoint}).")]
	NotImplemented {
		/// Operation name.
		operation: &'static str,
		/// Endpoint the operation would target.
		endpoint: String,
	},
}
impl Error {
	/// Builds an [`Error::InvalidParameter`] for `name`.
	pub fn invalid_parameter(name: &'static str, source: impl Into<ParameterError>) -> Self {
		Self::InvalidParameter { name, source: source.into() }
	}

	/// Builds an [`Error::InvalidParameter`] for a required parameter that was not supplied.
	pub fn missing_parameter(name: &'static str) -> Self {
		Self::InvalidParameter { name, source: ParameterError::Missing }
	}

	/// Stable snake_case label of the failure class, used by span fields and metric labels.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Config(_) => "config",
			Self::Client(ClientError::Timeout { .. }) => "timeout",
			Self::Client(_) => "client",
			Self::OAuth(_) => "oauth",
			Self::KeyDecryption(_) => "key_decryption",
			Self::InvalidParameter { .. } => "invalid_parameter",
			Self::UnsupportedGrantType { .. } => "unsupported_grant_type",
			Self::Signing(_) => "signing",
			Self::ResponseParse { .. } => "response_parse",
			Self::TokenResponse(_) => "token_response",
			Self::NotImplemented { .. } => "not_implemented",
		}
	}

	/// HTTP status of the response that caused the failure, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::OAuth(err) => err.status,
			Self::ResponseParse { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Reasons a single request parameter fails validation.
#[derive(Debug, ThisError)]
pub enum ParameterError {
	/// Required parameter was not supplied.
	#[error("Parameter is required but was not supplied.")]
	Missing,
	/// Identifier validation failed.
	#[error(transparent)]
	Identifier(#[from] IdentifierError),
	/// Subject type is neither `enterprise` nor `user`.
	#[error("Unknown subject type `{value}`.")]
	UnknownSubjectType {
		/// Value supplied by the caller.
		value: String,
	},
}

/// Configuration and validation failures raised while wiring the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint URL cannot be parsed or joined.
	#[error("The {endpoint} endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Box application configuration JSON cannot be parsed.
	#[error("Box application configuration is invalid.")]
	AppConfig {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Client-side failures raised before a response was received.
#[derive(Debug, ThisError)]
pub enum ClientError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request did not complete within the configured timeout.
	#[error("Request timed out while calling the token endpoint.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
	/// Token request could not be assembled.
	#[error("Token request could not be built.")]
	Request(#[from] oauth2::http::Error),
	/// Any other failure reported by the transport.
	#[error("HTTP client error occurred while calling the token endpoint: {message}.")]
	Other {
		/// Transport-supplied description.
		message: String,
	},
}
impl ClientError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ClientError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::timeout(e)
		} else {
			Self::network(e)
		}
	}
}

/// OAuth 2.0 error returned by the token endpoint for any non-200 response.
///
/// When the body is not an OAuth error document the value is synthesized from the HTTP status
/// and a short preview of the body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("Token endpoint returned an OAuth error: {}.", self.summary())]
pub struct OAuth20Error {
	/// OAuth `error` code.
	pub error: String,
	/// OAuth `error_description`, when supplied.
	#[serde(default)]
	pub error_description: Option<String>,
	/// HTTP status code of the response.
	#[serde(skip)]
	pub status: Option<u16>,
	/// Retry-After hint from upstream, if supplied.
	#[serde(skip)]
	pub retry_after: Option<Duration>,
}
impl OAuth20Error {
	/// Creates an error carrying only the OAuth `error` code.
	pub fn new(error: impl Into<String>) -> Self {
		Self { error: error.into(), error_description: None, status: None, retry_after: None }
	}

	/// Attaches an `error_description`.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Attaches the HTTP status code.
	pub fn with_status(mut self, status: u16) -> Self {
		self.status = Some(status);

		self
	}

	/// Attaches a Retry-After hint.
	pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
		self.retry_after = retry_after;

		self
	}

	/// Prefers the description over the bare error code.
	pub fn summary(&self) -> &str {
		self.error_description.as_deref().filter(|value| !value.is_empty()).unwrap_or(&self.error)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn oauth_error_display_prefers_description() {
		let err = OAuth20Error::new("invalid_grant").with_description("Invalid JWT assertion");

		assert_eq!(err.to_string(), "Token endpoint returned an OAuth error: Invalid JWT assertion.");

		let bare = OAuth20Error::new("invalid_client").with_description("");

		assert_eq!(bare.to_string(), "Token endpoint returned an OAuth error: invalid_client.");
	}

	#[test]
	fn oauth_error_deserializes_without_transport_fields() {
		let err: OAuth20Error = serde_json::from_str(
			"{\"error\":\"invalid_request\",\"error_description\":\"Missing grant type\"}",
		)
		.expect("OAuth error document should deserialize.");

		assert_eq!(err.error, "invalid_request");
		assert_eq!(err.error_description.as_deref(), Some("Missing grant type"));
		assert_eq!(err.status, None);
		assert_eq!(err.retry_after, None);
	}

	#[test]
	fn failure_labels_follow_the_variant() {
		let oauth = Error::from(OAuth20Error::new("invalid_grant").with_status(400));

		assert_eq!(oauth.kind(), "oauth");
		assert_eq!(oauth.status(), Some(400));

		let timeout = Error::from(ClientError::timeout(std::io::Error::other("slow")));

		assert_eq!(timeout.kind(), "timeout");
		assert_eq!(timeout.status(), None);
		assert_eq!(Error::missing_parameter("client_id").kind(), "invalid_parameter");
	}

	#[test]
	fn missing_parameter_names_the_field() {
		let err = Error::missing_parameter("client_id");

		assert_eq!(err.to_string(), "The `client_id` parameter is invalid.");
		assert!(matches!(
			err,
			Error::InvalidParameter { name: "client_id", source: ParameterError::Missing }
		));
	}
}
