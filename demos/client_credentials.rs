//! Demonstrates acquiring a downscoped enterprise token with the client-credentials grant over
//! the default reqwest transport.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use box_oauth2::{
	auth::{ClientId, ScopeSet, SubjectId},
	endpoint::TokenEndpoints,
	flows::ReqwestTokenClient,
	grant::{ClientCredentialsGrant, SubjectType},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth2/token")
				.body_includes("grant_type=client_credentials")
				.body_includes("box_subject_type=enterprise");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":3600,\
				 \"restricted_to\":[{\"scope\":\"item_preview\"}]}",
			);
		})
		.await;
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
	let grant = ClientCredentialsGrant::new(
		ClientId::new("demoappclientid00000000000000000")?,
		"demo-secret",
	)
	.subject(SubjectType::Enterprise, SubjectId::new("11446498")?)
	.scope(&ScopeSet::new(["item_preview"])?);
	let token = client.acquire_token(grant).await?;

	println!(
		"Enterprise token {} expires at {} (downscoped: {}).",
		token.access_token.expose(),
		token.expires_at(),
		token.is_downscoped(),
	);

	token_mock.assert_async().await;

	Ok(())
}
