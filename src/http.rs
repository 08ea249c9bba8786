//! Transport primitives for token requests.
//!
//! [`TokenHttpClient`] is the crate's only dependency on an HTTP stack: it hands out
//! [`AsyncHttpClient`] handles that accept a fully built form request and return the raw status,
//! headers, and body. Response interpretation stays in [`crate::oauth`], so any transport that
//! can POST bytes plugs in without extra glue.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
use std::time::Duration as StdDuration;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError};
#[cfg(feature = "reqwest")] use oauth2::{HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")] use reqwest::redirect::Policy;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Abstraction over HTTP transports capable of executing token requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can back many
/// [`TokenClient`](crate::flows::TokenClient) clones, and the request futures their handles
/// return must be `Send` so callers can spawn token acquisition onto any executor.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single request.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle for one request.
	fn handle(&self) -> Self::Handle;
}

/// Transport settings applied when the crate builds its own reqwest client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpClientConfig {
	/// Upper bound for the whole request, connection setup included.
	pub timeout: StdDuration,
	/// Upper bound for establishing the connection.
	pub connect_timeout: StdDuration,
}
impl HttpClientConfig {
	const DEFAULT_CONNECT_TIMEOUT: StdDuration = StdDuration::from_secs(10);
	const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Overrides the request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the connect timeout.
	pub fn with_connect_timeout(mut self, timeout: StdDuration) -> Self {
		self.connect_timeout = timeout;

		self
	}
}
impl Default for HttpClientConfig {
	fn default() -> Self {
		Self { timeout: Self::DEFAULT_TIMEOUT, connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT }
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token endpoints answer directly instead of redirecting, so clients built by
/// [`ReqwestHttpClient::with_config`] never follow redirects. Apply the same policy to any
/// client passed to [`ReqwestHttpClient::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client with the default [`HttpClientConfig`].
	pub fn new() -> Result<Self, ConfigError> {
		Self::with_config(&HttpClientConfig::default())
	}

	/// Builds a client with bounded timeouts and redirects disabled.
	pub fn with_config(config: &HttpClientConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(config.timeout)
			.connect_timeout(config.connect_timeout)
			.redirect(Policy::none())
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// [`AsyncHttpClient`] handle returned by [`ReqwestHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
