//! Token client and the operations it exposes.
//!
//! [`TokenClient`] pairs a transport with the resolved [`TokenEndpoints`]. Each call issues at
//! most one request and never retries; callers that need caching or retry policies wrap it.

mod acquire;
mod lifecycle;

// self
use crate::{
	_prelude::*, endpoint::TokenEndpoints, http::TokenHttpClient, oauth::TransportErrorMapper,
};
#[cfg(feature = "reqwest")]
use crate::{
	http::{HttpClientConfig, ReqwestHttpClient},
	oauth::ReqwestTransportErrorMapper,
};

/// Token client specialized for the crate's default reqwest transport stack.
#[cfg(feature = "reqwest")]
pub type ReqwestTokenClient = TokenClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Issues token requests against the Box OAuth 2.0 endpoints.
///
/// Clones share the transport and mapper, so one client can serve many concurrent callers.
pub struct TokenClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Endpoints requests are sent to.
	pub endpoints: TokenEndpoints,
}
impl<C, M> TokenClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		endpoints: TokenEndpoints,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { http_client: http_client.into(), transport_mapper: mapper.into(), endpoints }
	}
}
#[cfg(feature = "reqwest")]
impl TokenClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client for the public Box API with the default transport settings.
	pub fn new() -> Result<Self> {
		Self::with_endpoints(TokenEndpoints::box_api()?)
	}

	/// Creates a client for custom endpoints with the default transport settings.
	pub fn with_endpoints(endpoints: TokenEndpoints) -> Result<Self> {
		Self::with_config(endpoints, &HttpClientConfig::default())
	}

	/// Creates a client whose reqwest transport is built from `config`.
	pub fn with_config(endpoints: TokenEndpoints, config: &HttpClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_config(config)?;

		Ok(Self::with_http_client(endpoints, http_client, ReqwestTransportErrorMapper))
	}
}
impl<C, M> Clone for TokenClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			endpoints: self.endpoints.clone(),
		}
	}
}
impl<C, M> Debug for TokenClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenClient").field("endpoints", &self.endpoints).finish()
	}
}
