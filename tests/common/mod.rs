//! Shared fixtures and transports for integration tests.

#![allow(dead_code)]

// std
use std::{collections::BTreeMap, future::Future, pin::Pin, sync::Arc};
// crates.io
#[cfg(feature = "reqwest")] use httpmock::MockServer;
use parking_lot::Mutex;
use thiserror::Error as ThisError;
// self
use box_oauth2::{
	endpoint::TokenEndpoints,
	error::{ClientError, Error},
	flows::TokenClient,
	grant::GrantType,
	http::TokenHttpClient,
	oauth::{
		TransportErrorMapper,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, http::StatusCode},
	},
	url::{Url, form_urlencoded},
};
#[cfg(feature = "reqwest")]
use box_oauth2::{
	flows::ReqwestTokenClient, http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper,
	reqwest::Client as ReqwestClient,
};

pub const CLIENT_ID: &str = "abcdefghijklmnopqrstuvwxyz012345";
pub const CLIENT_SECRET: &str = "box-client-secret";
pub const PASSPHRASE: &str = "box-test-passphrase";
pub const ENCRYPTED_PRIVATE_KEY: &str = include_str!("../fixtures/encrypted_private_key.pem");
pub const RSA_PRIVATE_KEY: &str = include_str!("../fixtures/rsa_private_key.pem");
pub const PUBLIC_KEY: &str = include_str!("../fixtures/public_key.pem");
pub const TOKEN_BODY: &str =
	"{\"access_token\":\"abc\",\"expires_in\":3600,\"restricted_to\":[],\"token_type\":\"bearer\"}";

pub fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
	pairs.iter().map(|(key, value)| ((*key).to_owned(), (*value).to_owned())).collect()
}

pub fn jwt_params(subject_type: &str, subject_id: &str) -> BTreeMap<String, String> {
	params(&[
		("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
		("client_id", CLIENT_ID),
		("client_secret", CLIENT_SECRET),
		("box_subject_type", subject_type),
		("box_subject_id", subject_id),
		("public_key_id", "kid-fixture"),
		("private_key", ENCRYPTED_PRIVATE_KEY),
		("passphrase", PASSPHRASE),
	])
}

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
#[cfg(feature = "reqwest")]
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	insecure_reqwest_builder()
		.build()
		.map(ReqwestHttpClient::with_client)
		.expect("Failed to build insecure Reqwest client for tests.")
}

#[cfg(feature = "reqwest")]
pub fn insecure_reqwest_builder() -> box_oauth2::reqwest::ClientBuilder {
	ReqwestClient::builder().danger_accept_invalid_certs(true).danger_accept_invalid_hostnames(true)
}

#[cfg(feature = "reqwest")]
pub fn mock_endpoints(server: &MockServer) -> TokenEndpoints {
	TokenEndpoints::builder()
		.base_url(Url::parse(&server.url("/")).expect("Mock server URL should parse."))
		.build()
		.expect("HTTPS mock endpoints should validate.")
}

/// Token client whose reqwest transport talks to the `httpmock` server.
#[cfg(feature = "reqwest")]
pub fn mock_token_client(server: &MockServer) -> ReqwestTokenClient {
	TokenClient::with_http_client(
		mock_endpoints(server),
		test_reqwest_http_client(),
		ReqwestTransportErrorMapper,
	)
}

#[derive(Debug, ThisError)]
#[error("Fake transport refused the connection.")]
pub struct RefusedError;

/// Request captured by [`RecordingHttpClient`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub method: String,
	pub uri: String,
	pub content_type: Option<String>,
	pub body: String,
}
impl RecordedRequest {
	pub fn form(&self) -> BTreeMap<String, String> {
		form_urlencoded::parse(self.body.as_bytes()).into_owned().collect()
	}
}

/// Records every request and answers with a canned reply, or refuses when none is set.
#[derive(Clone, Default)]
pub struct RecordingHttpClient {
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
	reply: Option<(u16, String)>,
}
impl RecordingHttpClient {
	pub fn replying(status: u16, body: &str) -> Self {
		Self { requests: Default::default(), reply: Some((status, body.to_owned())) }
	}

	pub fn refusing() -> Self {
		Self::default()
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().clone()
	}
}
impl TokenHttpClient for RecordingHttpClient {
	type Handle = RecordingHttpClient;
	type TransportError = RefusedError;

	fn handle(&self) -> Self::Handle {
		self.clone()
	}
}
impl<'c> AsyncHttpClient<'c> for RecordingHttpClient {
	type Error = HttpClientError<RefusedError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		self.requests.lock().push(RecordedRequest {
			method: request.method().to_string(),
			uri: request.uri().to_string(),
			content_type: request
				.headers()
				.get("content-type")
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned),
			body: String::from_utf8_lossy(request.body()).into_owned(),
		});

		let reply = self.reply.clone();

		Box::pin(async move {
			let (status, body) = reply.ok_or_else(|| Box::new(RefusedError))?;
			let mut response = HttpResponse::new(body.into_bytes());

			*response.status_mut() =
				StatusCode::from_u16(status).map_err(|e| HttpClientError::Other(e.to_string()))?;

			Ok(response)
		})
	}
}

/// Maps transport failures to [`ClientError::Network`] and records the grant of each failure.
#[derive(Clone, Default)]
pub struct RecordingMapper {
	grants: Arc<Mutex<Vec<GrantType>>>,
}
impl RecordingMapper {
	pub fn grants(&self) -> Vec<GrantType> {
		self.grants.lock().clone()
	}
}
impl TransportErrorMapper<RefusedError> for RecordingMapper {
	fn map_transport_error(&self, grant: GrantType, err: HttpClientError<RefusedError>) -> Error {
		self.grants.lock().push(grant);

		match err {
			HttpClientError::Reqwest(inner) => ClientError::network(*inner).into(),
			other => ClientError::Other { message: other.to_string() }.into(),
		}
	}
}

pub fn fake_token_client(
	http: RecordingHttpClient,
	mapper: RecordingMapper,
) -> TokenClient<RecordingHttpClient, RecordingMapper> {
	let endpoints = TokenEndpoints::box_api().expect("Box API endpoints should resolve.");

	TokenClient::with_http_client(endpoints, http, mapper)
}
