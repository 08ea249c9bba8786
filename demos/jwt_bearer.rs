//! Demonstrates reading a Box JWT application configuration and exchanging a signed assertion
//! for an enterprise service-account token.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use box_oauth2::{
	config::JwtAppConfig,
	endpoint::TokenEndpoints,
	flows::ReqwestTokenClient,
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	reqwest::Client,
};

const PRIVATE_KEY: &str = include_str!("../tests/fixtures/encrypted_private_key.pem");

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth2/token")
				.body_includes("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer")
				.body_includes("assertion=");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-service-account\",\"token_type\":\"bearer\",\
				 \"expires_in\":4169,\"restricted_to\":[]}",
			);
		})
		.await;
	let config = JwtAppConfig::from_json(
		&serde_json::json!({
			"boxAppSettings": {
				"clientID": "demoappclientid00000000000000000",
				"clientSecret": "demo-secret",
				"appAuth": {
					"publicKeyID": "demo-key",
					"privateKey": PRIVATE_KEY,
					"passphrase": "box-test-passphrase"
				}
			},
			"enterpriseID": "11446498"
		})
		.to_string(),
	)?;
	let endpoints = TokenEndpoints::builder().base_url(Url::parse(&server.url("/"))?).build()?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client = ReqwestTokenClient::with_http_client(
		endpoints,
		http_client,
		ReqwestTransportErrorMapper,
	);
	let token = client.acquire_token(config.enterprise_grant()?).await?;

	println!("Service account header: {}.", token.authorization_header());

	token_mock.assert_async().await;

	Ok(())
}
