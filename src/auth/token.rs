//! Access token model hydrated from successful token endpoint responses.

// self
use crate::{_prelude::*, auth::Secret};

/// Errors produced while mapping a 200 token response into an [`AccessToken`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TokenResponseError {
	/// The response carried an empty `access_token`.
	#[error("Token endpoint response contains an empty access_token.")]
	EmptyAccessToken,
	/// Token endpoint returned a non-positive duration.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}

/// Box item a downscoped token is restricted to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictedObject {
	/// Item type (`file`, `folder`, `web_link`).
	#[serde(rename = "type")]
	pub kind: String,
	/// Item identifier.
	pub id: String,
	/// Item name, when included.
	#[serde(default)]
	pub name: Option<String>,
}

/// Single `restricted_to` entry of a downscoped token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRestriction {
	/// Scope granted on the object.
	pub scope: String,
	/// Object the scope applies to.
	#[serde(default)]
	pub object: Option<RestrictedObject>,
}

/// Wire shape of a successful token response. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponseBody {
	access_token: Secret,
	expires_in: i64,
	#[serde(default)]
	restricted_to: Vec<TokenRestriction>,
	#[serde(default = "default_token_type")]
	token_type: String,
	#[serde(default)]
	refresh_token: Option<Secret>,
	#[serde(default)]
	issued_token_type: Option<String>,
}

fn default_token_type() -> String {
	"bearer".into()
}

/// Access token issued by the token endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Bearer credential; callers must avoid logging it.
	pub access_token: Secret,
	/// Lifetime in seconds reported by the provider.
	pub expires_in: i64,
	/// Objects and scopes the token is restricted to (downscoped tokens only).
	pub restricted_to: Vec<TokenRestriction>,
	/// Token type, normally `bearer`.
	pub token_type: String,
	/// Refresh token, when the provider issued one.
	pub refresh_token: Option<Secret>,
	/// Token type URN reported by token exchange responses.
	pub issued_token_type: Option<String>,
	/// Local instant the response was received.
	pub issued_at: OffsetDateTime,
}
impl AccessToken {
	/// Maps the wire body field-by-field, validating the values the client relies on.
	pub(crate) fn from_response(
		body: TokenResponseBody,
		issued_at: OffsetDateTime,
	) -> Result<Self, TokenResponseError> {
		if body.access_token.is_empty() {
			return Err(TokenResponseError::EmptyAccessToken);
		}
		if body.expires_in <= 0 {
			return Err(TokenResponseError::NonPositiveExpiresIn);
		}

		Ok(Self {
			access_token: body.access_token,
			expires_in: body.expires_in,
			restricted_to: body.restricted_to,
			token_type: body.token_type,
			refresh_token: body.refresh_token,
			issued_token_type: body.issued_token_type,
			issued_at,
		})
	}

	/// Absolute expiry derived from `issued_at + expires_in`.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.issued_at.saturating_add(Duration::seconds(self.expires_in))
	}

	/// Returns `true` once the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at()
	}

	/// Returns `true` when the token carries `restricted_to` entries.
	pub fn is_downscoped(&self) -> bool {
		!self.restricted_to.is_empty()
	}

	/// Renders the `Authorization` header value. Callers must avoid logging it.
	pub fn authorization_header(&self) -> String {
		format!("Bearer {}", self.access_token.expose())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.field("restricted_to", &self.restricted_to)
			.field("token_type", &self.token_type)
			.field("refresh_token_set", &self.refresh_token.is_some())
			.field("issued_token_type", &self.issued_token_type)
			.field("issued_at", &self.issued_at)
			.finish()
	}
}
