//! Box OAuth 2.0 endpoints.
//!
//! The JWT audience is always [`TOKEN_AUDIENCE`]. [`TokenEndpoints`] only decides where requests
//! are sent, so a test server or an egress proxy can stand in for `api.box.com` without changing
//! the signed claims.

// self
use crate::{_prelude::*, error::ConfigError};

/// Base URL of the Box API.
pub const API_URL: &str = "https://api.box.com";
/// Path of the token request endpoint.
pub const REQUEST_URI: &str = "/oauth2/token";
/// Path of the token refresh endpoint.
pub const REFRESH_URI: &str = "/oauth2/token";
/// Path of the token revocation endpoint.
pub const REVOKE_URI: &str = "/oauth2/revoke";
/// Fixed `aud` claim of every JWT assertion.
pub const TOKEN_AUDIENCE: &str = "https://api.box.com/oauth2/token";

/// Resolved endpoint set used by [`TokenClient`](crate::flows::TokenClient).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEndpoints {
	/// Token request endpoint.
	pub token: Url,
	/// Token refresh endpoint.
	pub refresh: Url,
	/// Token revocation endpoint.
	pub revoke: Url,
}
impl TokenEndpoints {
	/// Creates a builder seeded with the public Box API base URL.
	pub fn builder() -> TokenEndpointsBuilder {
		TokenEndpointsBuilder::default()
	}

	/// Resolves the endpoints of the public Box API.
	pub fn box_api() -> Result<Self, ConfigError> {
		Self::builder().build()
	}
}

/// Builder for [`TokenEndpoints`].
#[derive(Clone, Debug, Default)]
pub struct TokenEndpointsBuilder {
	/// Base URL override; [`API_URL`] when unset.
	pub base: Option<Url>,
}
impl TokenEndpointsBuilder {
	/// Routes requests to another HTTPS origin.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting endpoints.
	pub fn build(self) -> Result<TokenEndpoints, ConfigError> {
		let base = match self.base {
			Some(base) => base,
			None => Url::parse(API_URL)
				.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "base", source })?,
		};

		validate_endpoint("base", &base)?;

		Ok(TokenEndpoints {
			token: join(&base, "token", REQUEST_URI)?,
			refresh: join(&base, "refresh", REFRESH_URI)?,
			revoke: join(&base, "revoke", REVOKE_URI)?,
		})
	}
}

fn join(base: &Url, endpoint: &'static str, path: &str) -> Result<Url, ConfigError> {
	base.join(path).map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	if url.scheme() != "https" {
		Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}
