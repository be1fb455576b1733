//! Transport primitives for form-encoded POST requests.
//!
//! The module exposes [`HttpTransport`] alongside [`FormRequest`] and [`FormResponse`] so hosts
//! can plug in whatever HTTP stack they run on (a browser `fetch` bridge, a native client, or a
//! test double). [`ReqwestTransport`] is the default implementation.

// self
use crate::_prelude::*;

/// `Content-Type` sent with every form request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Boxed future returned by [`HttpTransport::post_form`].
pub type TransportFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of issuing a form POST.
///
/// The trait is the crate's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so a single transport can back many concurrent requests, and must
/// return the response body untouched whatever the status code: callers decide how to read it.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves with the raw response.
	fn post_form(
		&self,
		request: FormRequest,
	) -> TransportFuture<'_, FormResponse, Self::TransportError>;
}

/// Fully prepared form POST.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormRequest {
	/// Absolute endpoint URL.
	pub url: Url,
	/// Value of the `Content-Type` header.
	pub content_type: &'static str,
	/// Encoded request body.
	pub body: String,
	/// Whether cookies/credentials should accompany the request.
	pub include_credentials: bool,
}
impl FormRequest {
	/// Creates a credentialed form request for `url` carrying `body`.
	pub fn new(url: Url, body: impl Into<String>) -> Self {
		Self { url, content_type: FORM_CONTENT_TYPE, body: body.into(), include_credentials: true }
	}
}

/// Raw response returned by an [`HttpTransport`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormResponse {
	/// HTTP status code, when the transport knows it.
	pub status: Option<u16>,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl FormResponse {
	/// Creates a response with a known status.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status: Some(status), body: body.into() }
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// [`ReqwestTransport::new`] enables reqwest's cookie store so credentialed requests carry
/// cookies set by earlier responses. Custom clients passed to [`ReqwestTransport::with_client`]
/// should enable it too when they rely on cookie-based sessions.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with a cookie-enabled client.
	pub fn new() -> Result<Self> {
		let client = ReqwestClient::builder()
			.cookie_store(true)
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestTransport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestTransport(..)")
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	type TransportError = ReqwestError;

	fn post_form(&self, request: FormRequest) -> TransportFuture<'_, FormResponse, ReqwestError> {
		let client = self.0.clone();

		Box::pin(async move {
			// reqwest attaches its cookie store to every request; `include_credentials` only
			// matters for transports that can opt out per request.
			let response = client
				.post(request.url)
				.header(reqwest::header::CONTENT_TYPE, request.content_type)
				.body(request.body)
				.send()
				.await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(FormResponse::new(status, body))
		})
	}
}
