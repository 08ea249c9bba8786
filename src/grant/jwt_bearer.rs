// self
use crate::{
	_prelude::*,
	assertion,
	auth::{ClientId, PublicKeyId, Secret, SubjectId},
	grant::{GrantType, SubjectType, param, required},
};

/// Inputs of the signed JWT assertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionParams {
	/// Principal kind carried in `box_sub_type`.
	pub subject_type: SubjectType,
	/// Enterprise or user id carried in `sub`.
	pub subject_id: SubjectId,
	/// Registered public key id carried in `kid`.
	pub public_key_id: PublicKeyId,
	/// PEM-encoded RSA private key, encrypted or not.
	pub private_key: Secret,
	/// Passphrase of an encrypted private key.
	pub passphrase: Option<Secret>,
}
impl AssertionParams {
	/// Creates assertion inputs for an unencrypted private key.
	pub fn new(
		subject_type: SubjectType,
		subject_id: SubjectId,
		public_key_id: PublicKeyId,
		private_key: impl Into<Secret>,
	) -> Self {
		Self {
			subject_type,
			subject_id,
			public_key_id,
			private_key: private_key.into(),
			passphrase: None,
		}
	}

	/// Sets the passphrase that decrypts the private key.
	pub fn with_passphrase(mut self, passphrase: impl Into<Secret>) -> Self {
		self.passphrase = Some(passphrase.into());

		self
	}
}

/// JWT bearer grant; the request body only carries the client credentials and the assertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JwtBearerGrant {
	client_id: ClientId,
	client_secret: Secret,
	assertion: AssertionParams,
}
impl JwtBearerGrant {
	/// Creates a grant from validated parts.
	pub fn new(
		client_id: ClientId,
		client_secret: impl Into<Secret>,
		assertion: AssertionParams,
	) -> Self {
		Self { client_id, client_secret: client_secret.into(), assertion }
	}

	/// Reads the assertion inputs from a loosely typed parameter map.
	///
	/// `passphrase` is optional; every other assertion input is required.
	pub(crate) fn from_params(
		client_id: ClientId,
		params: &BTreeMap<String, String>,
	) -> Result<Self> {
		let client_secret = required(params, param::CLIENT_SECRET)?;
		let subject_type = required(params, param::BOX_SUBJECT_TYPE)?
			.parse::<SubjectType>()
			.map_err(|err| Error::invalid_parameter(param::BOX_SUBJECT_TYPE, err))?;
		let subject_id = SubjectId::new(required(params, param::BOX_SUBJECT_ID)?)
			.map_err(|err| Error::invalid_parameter(param::BOX_SUBJECT_ID, err))?;
		let public_key_id = PublicKeyId::new(required(params, param::PUBLIC_KEY_ID)?)
			.map_err(|err| Error::invalid_parameter(param::PUBLIC_KEY_ID, err))?;
		let private_key = required(params, param::PRIVATE_KEY)?;
		let mut assertion =
			AssertionParams::new(subject_type, subject_id, public_key_id, private_key);

		if let Some(passphrase) = params.get(param::PASSPHRASE).filter(|value| !value.is_empty()) {
			assertion = assertion.with_passphrase(passphrase.as_str());
		}

		Ok(Self::new(client_id, client_secret, assertion))
	}

	/// Client the grant authenticates as.
	pub fn client_id(&self) -> &ClientId {
		&self.client_id
	}

	/// Inputs of the signed assertion.
	pub fn assertion_params(&self) -> &AssertionParams {
		&self.assertion
	}

	/// Signs a fresh assertion issued at `issued_at` and returns the request body.
	///
	/// Every call produces a new `jti`, so bodies are never reused across attempts.
	pub fn form_at(&self, issued_at: OffsetDateTime) -> Result<BTreeMap<String, String>> {
		let assertion = assertion::sign_assertion(&self.client_id, &self.assertion, issued_at)?;

		Ok(BTreeMap::from([
			(param::GRANT_TYPE.to_owned(), GrantType::JwtBearer.as_str().to_owned()),
			(param::CLIENT_ID.to_owned(), self.client_id.to_string()),
			(param::CLIENT_SECRET.to_owned(), self.client_secret.expose().to_owned()),
			(param::ASSERTION.to_owned(), assertion),
		]))
	}
}
