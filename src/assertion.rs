//! RS512-signed JWT assertions for the JWT bearer grant.
//!
//! Every assertion is addressed to [`TOKEN_AUDIENCE`] regardless of where the request is sent,
//! expires [`ASSERTION_LIFETIME`] after issuance, and carries a fresh random `jti`.

mod key;

pub use key::*;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use jsonwebtoken::{Algorithm, Header};
use rand::RngCore;
// self
use crate::{
	_prelude::*,
	auth::ClientId,
	endpoint::TOKEN_AUDIENCE,
	grant::{AssertionParams, SubjectType},
};

/// Lifetime of a signed assertion.
pub const ASSERTION_LIFETIME: Duration = Duration::seconds(45);
/// Random bytes behind each `jti`, before base64 encoding.
pub const JTI_BYTES: usize = 64;

/// Claims carried by the signed assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
	/// Client id of the application.
	pub iss: String,
	/// Enterprise or user id.
	pub sub: String,
	/// Whether `sub` names an enterprise or a user.
	pub box_sub_type: SubjectType,
	/// Always [`TOKEN_AUDIENCE`].
	pub aud: String,
	/// Unique assertion id.
	pub jti: String,
	/// Expiry as a Unix timestamp.
	pub exp: i64,
	/// Issuance as a Unix timestamp.
	pub iat: i64,
	/// Public key id, mirrored from the JWS header.
	pub kid: String,
}
impl JwtClaims {
	/// Builds the claims for an assertion issued at `issued_at`.
	pub fn new(client_id: &ClientId, params: &AssertionParams, issued_at: OffsetDateTime) -> Self {
		Self {
			iss: client_id.to_string(),
			sub: params.subject_id.to_string(),
			box_sub_type: params.subject_type,
			aud: TOKEN_AUDIENCE.to_owned(),
			jti: random_jti(),
			exp: (issued_at + ASSERTION_LIFETIME).unix_timestamp(),
			iat: issued_at.unix_timestamp(),
			kid: params.public_key_id.to_string(),
		}
	}
}

/// Returns the standard base64 encoding of [`JTI_BYTES`] random bytes.
pub fn random_jti() -> String {
	let mut bytes = [0_u8; JTI_BYTES];

	rand::rng().fill_bytes(&mut bytes);

	STANDARD.encode(bytes)
}

/// Decrypts the private key and signs an RS512 assertion.
///
/// Key failures surface as [`Error::KeyDecryption`] before any claim is built.
pub fn sign_assertion(
	client_id: &ClientId,
	params: &AssertionParams,
	issued_at: OffsetDateTime,
) -> Result<String> {
	let key = SigningKey::decrypt(&params.private_key, params.passphrase.as_ref())?;
	let claims = JwtClaims::new(client_id, params, issued_at);
	let mut header = Header::new(Algorithm::RS512);

	header.kid = Some(params.public_key_id.to_string());

	jsonwebtoken::encode(&header, &claims, key.encoding_key()).map_err(Error::Signing)
}
