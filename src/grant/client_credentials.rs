// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet, Secret, SubjectId},
	grant::{GrantType, SubjectType, debug_params, param},
};

/// `client_credentials` grant whose parameters are sent unchanged as the request body.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentialsGrant {
	client_id: ClientId,
	params: BTreeMap<String, String>,
}
impl ClientCredentialsGrant {
	/// Starts a grant authenticated with the application's client id and secret.
	pub fn new(client_id: ClientId, client_secret: impl Into<Secret>) -> Self {
		let secret = client_secret.into();
		let params = BTreeMap::from([
			(param::GRANT_TYPE.to_owned(), GrantType::ClientCredentials.as_str().to_owned()),
			(param::CLIENT_ID.to_owned(), client_id.to_string()),
			(param::CLIENT_SECRET.to_owned(), secret.expose().to_owned()),
		]);

		Self { client_id, params }
	}

	/// Keeps a caller-supplied map whose `client_id` was already validated.
	pub(crate) fn from_parts(client_id: ClientId, params: BTreeMap<String, String>) -> Self {
		Self { client_id, params }
	}

	/// Mints the token for an enterprise service account or a user.
	pub fn subject(mut self, subject_type: SubjectType, subject_id: SubjectId) -> Self {
		self.params.insert(param::BOX_SUBJECT_TYPE.to_owned(), subject_type.as_str().to_owned());
		self.params.insert(param::BOX_SUBJECT_ID.to_owned(), subject_id.into());

		self
	}

	/// Requests a downscoped token; an empty set removes the parameter.
	pub fn scope(mut self, scope: &ScopeSet) -> Self {
		if scope.is_empty() {
			self.params.remove(param::SCOPE);
		} else {
			self.params.insert(param::SCOPE.to_owned(), scope.normalized());
		}

		self
	}

	/// Restricts the token to a single file or folder URL.
	pub fn resource(mut self, resource: &Url) -> Self {
		self.params.insert(param::RESOURCE.to_owned(), resource.to_string());

		self
	}

	/// Grants access to the item behind a shared link.
	pub fn box_shared_link(mut self, link: &Url) -> Self {
		self.params.insert(param::BOX_SHARED_LINK.to_owned(), link.to_string());

		self
	}

	/// Sets any other body parameter. `grant_type` and `client_id` cannot be overridden.
	pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		let key = key.into();

		if key != param::GRANT_TYPE && key != param::CLIENT_ID {
			self.params.insert(key, value.into());
		}

		self
	}

	/// Client the grant authenticates as.
	pub fn client_id(&self) -> &ClientId {
		&self.client_id
	}

	/// Request body that will be sent.
	pub fn params(&self) -> &BTreeMap<String, String> {
		&self.params
	}

	/// Consumes the grant, returning the request body.
	pub fn into_params(self) -> BTreeMap<String, String> {
		self.params
	}
}
impl Debug for ClientCredentialsGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		debug_params(f, &self.params)
	}
}
