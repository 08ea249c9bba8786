//! Token refresh and revocation.
//!
//! Both operations are declared against their Box endpoints but not implemented yet. They fail
//! with [`Error::NotImplemented`] and never contact the network.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	flows::TokenClient,
	grant::TokenRequest,
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
	obs::{FlowKind, FlowSpan},
};

impl<C, M> TokenClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges a refresh token for a new access token at
	/// [`REFRESH_URI`](crate::endpoint::REFRESH_URI).
	///
	/// Always returns [`Error::NotImplemented`].
	pub async fn refresh_access_token(
		&self,
		request: impl Into<TokenRequest>,
	) -> Result<AccessToken> {
		let request = request.into();
		let operation = "refresh_access_token";

		FlowSpan::new(FlowKind::Refresh, operation, Some(request.client_id()))
			.observe(async {
				Err::<AccessToken, _>(not_implemented(operation, &self.endpoints.refresh))
			})
			.await
	}

	/// Revokes a token at [`REVOKE_URI`](crate::endpoint::REVOKE_URI).
	///
	/// Always returns [`Error::NotImplemented`].
	pub async fn revoke_access_token(&self, request: impl Into<TokenRequest>) -> Result<()> {
		let request = request.into();
		let operation = "revoke_access_token";

		FlowSpan::new(FlowKind::Revoke, operation, Some(request.client_id()))
			.observe(async { Err::<(), _>(not_implemented(operation, &self.endpoints.revoke)) })
			.await
	}
}

fn not_implemented(operation: &'static str, endpoint: &Url) -> Error {
	Error::NotImplemented { operation, endpoint: endpoint.to_string() }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::ClientId,
		flows::testing::*,
		grant::ClientCredentialsGrant,
		obs::{FlowFailure, FlowOutcome, recorded},
	};

	fn request() -> ClientCredentialsGrant {
		ClientCredentialsGrant::new(
			ClientId::new(CLIENT_ID).expect("Client id fixture should be valid."),
			"secret",
		)
	}

	#[tokio::test]
	async fn refresh_is_explicitly_unimplemented() {
		let http = FakeHttpClient::replying(200, "{}");
		let err = client(http.clone())
			.refresh_access_token(request())
			.await
			.expect_err("Refresh must not report success.");

		assert!(matches!(
			err,
			Error::NotImplemented { operation: "refresh_access_token", ref endpoint }
				if endpoint == "https://api.box.com/oauth2/token"
		));
		assert_eq!(http.request_count(), 0);
	}

	#[tokio::test]
	async fn revoke_is_explicitly_unimplemented() {
		let http = FakeHttpClient::replying(200, "{}");
		let err = client(http.clone())
			.revoke_access_token(request())
			.await
			.expect_err("Revoke must not report success.");

		assert!(matches!(
			err,
			Error::NotImplemented { operation: "revoke_access_token", ref endpoint }
				if endpoint == "https://api.box.com/oauth2/revoke"
		));
		assert_eq!(http.request_count(), 0);
	}

	#[tokio::test]
	async fn stubs_are_observed_as_not_implemented() {
		recorded::take();

		let client = client(FakeHttpClient::offline());

		client.revoke_access_token(request()).await.expect_err("Revoke must fail.");

		assert_eq!(
			recorded::take(),
			[
				(FlowKind::Revoke, FlowOutcome::Attempt, None),
				(
					FlowKind::Revoke,
					FlowOutcome::Failure,
					Some(FlowFailure { error: "not_implemented", status: None })
				),
			]
		);
	}
}
