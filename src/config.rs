//! Box developer-console application configuration.
//!
//! The JSON file downloaded for a JWT application bundles the client credentials, the registered
//! public key id, and the (usually encrypted) private key. [`JwtAppConfig`] reads it and mints
//! [`JwtBearerGrant`]s for the enterprise service account or for a specific user.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, PublicKeyId, Secret, SubjectId},
	error::ConfigError,
	grant::{AssertionParams, JwtBearerGrant, SubjectType, param},
};

/// JWT application settings parsed from the Box configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct JwtAppConfig {
	/// Application credentials and key material.
	#[serde(rename = "boxAppSettings")]
	pub app_settings: AppSettings,
	/// Enterprise the application is installed in, when present.
	#[serde(rename = "enterpriseID", default)]
	pub enterprise_id: Option<SubjectId>,
}
impl JwtAppConfig {
	/// Parses the configuration JSON, reporting the path of the first invalid field.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(json);

		serde_path_to_error::deserialize(&mut de).map_err(|source| ConfigError::AppConfig { source })
	}

	/// Grant for the enterprise service account.
	pub fn enterprise_grant(&self) -> Result<JwtBearerGrant> {
		let enterprise_id = self
			.enterprise_id
			.clone()
			.ok_or_else(|| Error::missing_parameter(param::BOX_SUBJECT_ID))?;

		Ok(self.grant(SubjectType::Enterprise, enterprise_id))
	}

	/// Grant for an app or managed user.
	pub fn user_grant(&self, user_id: SubjectId) -> JwtBearerGrant {
		self.grant(SubjectType::User, user_id)
	}

	fn grant(&self, subject_type: SubjectType, subject_id: SubjectId) -> JwtBearerGrant {
		let settings = &self.app_settings;
		let auth = &settings.app_auth;
		let mut assertion = AssertionParams::new(
			subject_type,
			subject_id,
			auth.public_key_id.clone(),
			auth.private_key.clone(),
		);

		if let Some(passphrase) = auth.passphrase.as_ref().filter(|value| !value.is_empty()) {
			assertion = assertion.with_passphrase(passphrase.clone());
		}

		JwtBearerGrant::new(settings.client_id.clone(), settings.client_secret.clone(), assertion)
	}
}

/// `boxAppSettings` section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AppSettings {
	/// Application client id.
	#[serde(rename = "clientID")]
	pub client_id: ClientId,
	/// Application client secret.
	#[serde(rename = "clientSecret")]
	pub client_secret: Secret,
	/// Key material used for assertions.
	#[serde(rename = "appAuth")]
	pub app_auth: AppAuth,
}

/// `boxAppSettings.appAuth` section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AppAuth {
	/// Registered public key id.
	#[serde(rename = "publicKeyID")]
	pub public_key_id: PublicKeyId,
	/// PEM private key.
	#[serde(rename = "privateKey")]
	pub private_key: Secret,
	/// Private key passphrase; empty for unencrypted keys.
	#[serde(default)]
	pub passphrase: Option<Secret>,
}
