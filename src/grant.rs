//! Grant types and the token request union sent to the token endpoint.
//!
//! [`TokenRequest`] is closed over the two grants Box accepts for app tokens. Each variant carries
//! only the fields its grant needs, and [`TokenRequest::from_params`] maps the loosely typed
//! parameter map used by configuration files and scripts onto it.

mod client_credentials;
mod jwt_bearer;

pub use client_credentials::*;
pub use jwt_bearer::*;

// self
use crate::{_prelude::*, auth::ClientId, error::ParameterError};

/// Wire names of token request parameters.
pub mod param {
	/// `grant_type`
	pub const GRANT_TYPE: &str = "grant_type";
	/// `client_id`
	pub const CLIENT_ID: &str = "client_id";
	/// `client_secret`
	pub const CLIENT_SECRET: &str = "client_secret";
	/// `assertion`
	pub const ASSERTION: &str = "assertion";
	/// `box_subject_type`
	pub const BOX_SUBJECT_TYPE: &str = "box_subject_type";
	/// `box_subject_id`
	pub const BOX_SUBJECT_ID: &str = "box_subject_id";
	/// `public_key_id`
	pub const PUBLIC_KEY_ID: &str = "public_key_id";
	/// `private_key`
	pub const PRIVATE_KEY: &str = "private_key";
	/// `passphrase`
	pub const PASSPHRASE: &str = "passphrase";
	/// `scope`
	pub const SCOPE: &str = "scope";
	/// `resource`
	pub const RESOURCE: &str = "resource";
	/// `box_shared_link`
	pub const BOX_SHARED_LINK: &str = "box_shared_link";

	/// Parameters whose values are redacted from `Debug` output.
	pub(crate) const SENSITIVE: [&str; 4] = [CLIENT_SECRET, ASSERTION, PRIVATE_KEY, PASSPHRASE];
}

/// OAuth 2.0 grant types this client can send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrantType {
	/// Client Credentials grant (`client_credentials`).
	#[serde(rename = "client_credentials")]
	ClientCredentials,
	/// JWT bearer grant (`urn:ietf:params:oauth:grant-type:jwt-bearer`).
	#[serde(rename = "urn:ietf:params:oauth:grant-type:jwt-bearer")]
	JwtBearer,
}
impl GrantType {
	/// Returns the wire identifier for the grant type.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::ClientCredentials => "client_credentials",
			GrantType::JwtBearer => "urn:ietf:params:oauth:grant-type:jwt-bearer",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for GrantType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"client_credentials" => Ok(GrantType::ClientCredentials),
			"urn:ietf:params:oauth:grant-type:jwt-bearer" => Ok(GrantType::JwtBearer),
			other => Err(Error::UnsupportedGrantType { grant_type: other.to_owned() }),
		}
	}
}

/// Kind of Box principal a token is minted for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
	/// Service account of an enterprise.
	Enterprise,
	/// App or managed user.
	User,
}
impl SubjectType {
	/// Returns the wire identifier for the subject type.
	pub const fn as_str(self) -> &'static str {
		match self {
			SubjectType::Enterprise => "enterprise",
			SubjectType::User => "user",
		}
	}
}
impl Display for SubjectType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for SubjectType {
	type Err = ParameterError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"enterprise" => Ok(SubjectType::Enterprise),
			"user" => Ok(SubjectType::User),
			other => Err(ParameterError::UnknownSubjectType { value: other.to_owned() }),
		}
	}
}

/// Token request accepted by [`TokenClient::acquire_token`](crate::flows::TokenClient::acquire_token).
#[derive(Clone, Debug)]
pub enum TokenRequest {
	/// Parameters sent verbatim with `grant_type=client_credentials`.
	ClientCredentials(ClientCredentialsGrant),
	/// Signed JWT assertion exchange.
	JwtBearer(JwtBearerGrant),
}
impl TokenRequest {
	/// Parses a loosely typed parameter map.
	///
	/// `client_id` is validated first, so a malformed identifier is reported even when the grant
	/// type is also wrong. A missing `grant_type` is reported as unsupported. Client-credentials
	/// maps are kept unchanged as the request body.
	pub fn from_params(params: BTreeMap<String, String>) -> Result<Self> {
		let client_id = required(&params, param::CLIENT_ID)?;
		let client_id = ClientId::new(client_id)
			.map_err(|err| Error::invalid_parameter(param::CLIENT_ID, err))?;
		let grant_type = params
			.get(param::GRANT_TYPE)
			.map(String::as_str)
			.unwrap_or_default()
			.parse::<GrantType>()?;

		match grant_type {
			GrantType::ClientCredentials =>
				Ok(Self::ClientCredentials(ClientCredentialsGrant::from_parts(client_id, params))),
			GrantType::JwtBearer =>
				Ok(Self::JwtBearer(JwtBearerGrant::from_params(client_id, &params)?)),
		}
	}

	/// Grant type of the request.
	pub fn grant_type(&self) -> GrantType {
		match self {
			TokenRequest::ClientCredentials(_) => GrantType::ClientCredentials,
			TokenRequest::JwtBearer(_) => GrantType::JwtBearer,
		}
	}

	/// Client the request authenticates as.
	pub fn client_id(&self) -> &ClientId {
		match self {
			TokenRequest::ClientCredentials(grant) => grant.client_id(),
			TokenRequest::JwtBearer(grant) => grant.client_id(),
		}
	}

	/// Produces the form body, signing the assertion for JWT bearer grants.
	pub fn into_form(self, issued_at: OffsetDateTime) -> Result<BTreeMap<String, String>> {
		match self {
			TokenRequest::ClientCredentials(grant) => Ok(grant.into_params()),
			TokenRequest::JwtBearer(grant) => grant.form_at(issued_at),
		}
	}
}
impl From<ClientCredentialsGrant> for TokenRequest {
	fn from(grant: ClientCredentialsGrant) -> Self {
		Self::ClientCredentials(grant)
	}
}
impl From<JwtBearerGrant> for TokenRequest {
	fn from(grant: JwtBearerGrant) -> Self {
		Self::JwtBearer(grant)
	}
}

pub(crate) fn required<'a>(
	params: &'a BTreeMap<String, String>,
	name: &'static str,
) -> Result<&'a str> {
	params
		.get(name)
		.map(String::as_str)
		.filter(|value| !value.is_empty())
		.ok_or_else(|| Error::missing_parameter(name))
}

pub(crate) fn debug_params(f: &mut Formatter, params: &BTreeMap<String, String>) -> FmtResult {
	let mut map = f.debug_map();

	for (key, value) in params {
		if param::SENSITIVE.contains(&key.as_str()) {
			map.entry(key, &"<redacted>");
		} else {
			map.entry(key, value);
		}
	}

	map.finish()
}
