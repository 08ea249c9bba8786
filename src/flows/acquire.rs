//! Token acquisition.
//!
//! Requests are fully validated and, for JWT bearer grants, signed before the transport is
//! touched, so parameter and key failures never reach the network.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientId},
	flows::TokenClient,
	grant::{TokenRequest, param},
	http::TokenHttpClient,
	oauth::{self, TransportErrorMapper},
	obs::{FlowKind, FlowSpan},
};

impl<C, M> TokenClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Sends one token request and hydrates the reply.
	///
	/// HTTP 200 yields an [`AccessToken`]; any other status yields [`Error::OAuth`] and
	/// transport failures yield [`Error::Client`].
	pub async fn acquire_token(&self, request: impl Into<TokenRequest>) -> Result<AccessToken> {
		let request = request.into();
		let span =
			FlowSpan::new(request.grant_type().into(), "acquire_token", Some(request.client_id()));

		span.observe(self.send(request)).await
	}

	/// Parses a loosely typed parameter map and acquires a token with it.
	///
	/// See [`TokenRequest::from_params`] for the accepted keys. Parameter failures are observed
	/// like any other failed acquisition, under the `unsupported` flow when `grant_type` cannot
	/// be resolved.
	pub async fn acquire_token_from_params(
		&self,
		params: BTreeMap<String, String>,
	) -> Result<AccessToken> {
		let client_id = params.get(param::CLIENT_ID).and_then(|value| ClientId::new(value).ok());
		let span = FlowSpan::new(FlowKind::of_params(&params), "acquire_token", client_id.as_ref());

		span.observe(async move {
			let request = TokenRequest::from_params(params)?;

			self.send(request).await
		})
		.await
	}

	async fn send(&self, request: TokenRequest) -> Result<AccessToken> {
		let grant = request.grant_type();
		let form = request.into_form(OffsetDateTime::now_utc())?;

		oauth::exchange(
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
			grant,
			&self.endpoints.token,
			&form,
		)
		.await
	}
}
