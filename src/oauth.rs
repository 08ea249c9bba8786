//! Token endpoint exchange: form request construction, transport error mapping, and response
//! interpretation.
//!
//! Only HTTP 200 yields a token. Every other status becomes an [`OAuth20Error`]; bodies that are
//! not OAuth error documents are summarized from the status line and a short body preview.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{
		HeaderMap, HeaderValue, Method, Request, StatusCode,
		header::{ACCEPT, CONTENT_TYPE, RETRY_AFTER},
	},
};
use time::format_description::well_known::Rfc2822;
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, token::TokenResponseBody},
	error::{ClientError, OAuth20Error},
	grant::GrantType,
	http::TokenHttpClient,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";
const BODY_PREVIEW_CHARS: usize = 256;

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(&self, grant: GrantType, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, _grant: GrantType, err: HttpClientError<ReqwestError>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => ClientError::from(*inner).into(),
			HttpClientError::Http(inner) => ClientError::from(inner).into(),
			HttpClientError::Io(inner) => ClientError::from(inner).into(),
			HttpClientError::Other(message) => ClientError::Other { message }.into(),
			_ => ClientError::Other { message: "unknown transport failure".into() }.into(),
		}
	}
}

/// Builds the form-encoded POST sent to a token endpoint.
pub(crate) fn build_form_request(
	endpoint: &Url,
	form: &BTreeMap<String, String>,
) -> Result<HttpRequest> {
	let body = Serializer::new(String::new()).extend_pairs(form).finish();
	let request = Request::builder()
		.method(Method::POST)
		.uri(endpoint.as_str())
		.header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
		.header(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE))
		.body(body.into_bytes())
		.map_err(ClientError::from)?;

	Ok(request)
}

/// Posts `form` to `endpoint` and interprets the reply.
pub(crate) async fn exchange<C, M>(
	http_client: &C,
	mapper: &M,
	grant: GrantType,
	endpoint: &Url,
	form: &BTreeMap<String, String>,
) -> Result<AccessToken>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let request = build_form_request(endpoint, form)?;
	let handle = http_client.handle();
	let response =
		handle.call(request).await.map_err(|err| mapper.map_transport_error(grant, err))?;

	interpret_response(response, OffsetDateTime::now_utc())
}

/// Hydrates a 200 reply into an [`AccessToken`]; anything else becomes an [`OAuth20Error`].
pub(crate) fn interpret_response(
	response: HttpResponse,
	received_at: OffsetDateTime,
) -> Result<AccessToken> {
	let status = response.status();

	if status != StatusCode::OK {
		return Err(oauth_error(&response, received_at).into());
	}

	let mut de = serde_json::Deserializer::from_slice(response.body());
	let body: TokenResponseBody = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| Error::ResponseParse { source, status: status.as_u16() })?;

	Ok(AccessToken::from_response(body, received_at)?)
}

fn oauth_error(response: &HttpResponse, received_at: OffsetDateTime) -> OAuth20Error {
	let status = response.status();
	let error = serde_json::from_slice::<OAuth20Error>(response.body())
		.ok()
		.filter(|err| !err.error.is_empty())
		.unwrap_or_else(|| synthesize_oauth_error(status, response.body()));

	error
		.with_status(status.as_u16())
		.with_retry_after(parse_retry_after(response.headers(), received_at))
}

fn synthesize_oauth_error(status: StatusCode, body: &[u8]) -> OAuth20Error {
	let code = status
		.canonical_reason()
		.map(|reason| reason.to_ascii_lowercase().replace([' ', '-'], "_"))
		.unwrap_or_else(|| "http_error".into());
	let preview = String::from_utf8_lossy(body);
	let preview = preview.trim();
	let error = OAuth20Error::new(code);

	if preview.is_empty() {
		error
	} else {
		error.with_description(preview.chars().take(BODY_PREVIEW_CHARS).collect::<String>())
	}
}

fn parse_retry_after(headers: &HeaderMap, now: OffsetDateTime) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(secs.into()));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - now;

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
