mod common;

// self
use box_oauth2::{
	error::{ClientError, Error},
	grant::GrantType,
};
use common::*;

#[tokio::test]
async fn refused_connection_surfaces_client_error() {
	let mapper = RecordingMapper::default();
	let http = RecordingHttpClient::refusing();
	let client = fake_token_client(http.clone(), mapper.clone());
	let err = client
		.acquire_token_from_params(params(&[
			("grant_type", "client_credentials"),
			("client_id", CLIENT_ID),
			("client_secret", CLIENT_SECRET),
		]))
		.await
		.expect_err("Refused connections must fail.");

	assert!(matches!(err, Error::Client(ClientError::Network { .. })));
	assert_eq!(http.requests().len(), 1);
	assert_eq!(mapper.grants(), [GrantType::ClientCredentials]);
}

#[tokio::test]
async fn mapper_sees_the_grant_of_the_failed_request() {
	let mapper = RecordingMapper::default();
	let client = fake_token_client(RecordingHttpClient::refusing(), mapper.clone());
	let err = client
		.acquire_token_from_params(jwt_params("enterprise", "11446498"))
		.await
		.expect_err("Refused connections must fail.");

	assert!(matches!(err, Error::Client(ClientError::Network { .. })));
	assert_eq!(mapper.grants(), [GrantType::JwtBearer]);
}

#[tokio::test]
async fn oauth_failures_bypass_the_transport_mapper() {
	let mapper = RecordingMapper::default();
	let client = fake_token_client(
		RecordingHttpClient::replying(401, "{\"error\":\"unauthorized_client\"}"),
		mapper.clone(),
	);
	let err = client
		.acquire_token_from_params(jwt_params("user", "3"))
		.await
		.expect_err("401 must fail.");

	assert!(matches!(err, Error::OAuth(ref oauth) if oauth.status == Some(401)));
	assert!(mapper.grants().is_empty());
}

#[cfg(feature = "reqwest")]
#[tokio::test]
async fn slow_endpoint_times_out() {
	// std
	use std::time::Duration;
	// crates.io
	use box_oauth2::{
		flows::TokenClient, http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper,
	};
	use httpmock::prelude::*;

	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(TOKEN_BODY)
				.delay(Duration::from_secs(2));
		})
		.await;
	let reqwest = insecure_reqwest_builder()
		.timeout(Duration::from_millis(200))
		.build()
		.expect("Reqwest client should build.");
	let client = TokenClient::with_http_client(
		mock_endpoints(&server),
		ReqwestHttpClient::with_client(reqwest),
		ReqwestTransportErrorMapper,
	);
	let err = client
		.acquire_token_from_params(params(&[
			("grant_type", "client_credentials"),
			("client_id", CLIENT_ID),
			("client_secret", CLIENT_SECRET),
		]))
		.await
		.expect_err("Slow endpoint must time out.");

	assert!(matches!(err, Error::Client(ClientError::Timeout { .. })));

	mock.assert_calls_async(1).await;
}
