//! Token-attaching form posts.
//!
//! [`RequestService::post`] merges caller fields with the access token stored under the request
//! URL, sends the result as a credentialed form POST, and parses the reply as JSON whatever the
//! HTTP status. The token is re-read from the store on every call, so a token remembered between
//! two posts is picked up by the second one without rebuilding the service.
//!
//! Relative request URLs resolve against the current page, while the token stays keyed by the URL
//! exactly as the caller wrote it.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	codec::{self, FormData},
	error::TransportError,
	http::{FormRequest, FormResponse, HttpTransport},
	obs::{self, OpKind, OpOutcome, OpSpan},
	page::PageContext,
	store::KeyValueStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Form field carrying the stored token.
pub const ACCESS_TOKEN_FIELD: &str = "accessToken";

#[cfg(feature = "reqwest")]
/// Request service specialized for the crate's default reqwest transport.
pub type ReqwestRequestService = RequestService<ReqwestTransport>;

/// Sends form posts on behalf of the page, keyed to per-URL access tokens.
pub struct RequestService<T>
where
	T: ?Sized + HttpTransport,
{
	store: Arc<KeyValueStore>,
	page: Arc<dyn PageContext>,
	transport: Arc<T>,
}
impl<T> RequestService<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a service over the caller-provided transport.
	pub fn with_transport(
		store: Arc<KeyValueStore>,
		page: Arc<dyn PageContext>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self { store, page, transport: transport.into() }
	}

	/// Store the service reads tokens from.
	pub fn store(&self) -> &Arc<KeyValueStore> {
		&self.store
	}

	/// Transport used for outbound posts.
	pub fn transport(&self) -> &Arc<T> {
		&self.transport
	}

	/// Stores `token` for requests sent to `url`.
	///
	/// `expires` is honored by the cookie fallback only; durable entries live until forgotten.
	pub fn remember_token(&self, url: &str, token: &str, expires: Option<OffsetDateTime>) {
		self.store.set(url, token, expires);
	}

	/// Token currently stored for `url`, or `""`.
	pub fn token(&self, url: &str) -> String {
		self.store.get(url)
	}

	/// Drops the token stored for `url`.
	pub fn forget_token(&self, url: &str) {
		self.store.remove(url);
	}

	/// Encoded body [`RequestService::post`] would send to `url`.
	pub fn form_body(&self, url: &str, fields: Option<&FormData>) -> String {
		let mut merged = fields.cloned().unwrap_or_default();

		merged.insert(ACCESS_TOKEN_FIELD, Some(self.store.get(url)));

		codec::stringify(&merged)
	}

	/// Absolute endpoint for `url`, resolving relative references against the current page.
	pub fn resolve(&self, url: &str) -> Result<Url, TransportError> {
		let resolved = match Url::parse(url) {
			Err(url::ParseError::RelativeUrlWithoutBase) =>
				Url::parse(&self.page.current_url()).and_then(|base| base.join(url)),
			parsed => parsed,
		};

		resolved.map_err(|source| TransportError::UnresolvableUrl { url: url.to_owned(), source })
	}

	/// Posts `fields` plus the stored token to `url` and returns the parsed JSON reply.
	pub async fn post(&self, url: &str, fields: Option<&FormData>) -> Result<serde_json::Value> {
		self.observe("post", async move {
			let response = self.send(url, fields).await?;

			parse_json(url, &response)
		})
		.await
	}

	/// Same as [`RequestService::post`], decoding the reply into `R`.
	pub async fn post_as<R>(&self, url: &str, fields: Option<&FormData>) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.observe("post_as", async move {
			let response = self.send(url, fields).await?;
			let value = parse_json(url, &response)?;

			serde_path_to_error::deserialize(value).map_err(|source| Error::ResponseDecode {
				url: url.to_owned(),
				status: response.status,
				source,
			})
		})
		.await
	}

	async fn observe<R, F>(&self, stage: &'static str, fut: F) -> Result<R>
	where
		F: Future<Output = Result<R>>,
	{
		const KIND: OpKind = OpKind::Post;

		let span = OpSpan::new(KIND, stage);

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span.instrument(fut).await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	async fn send(&self, url: &str, fields: Option<&FormData>) -> Result<FormResponse> {
		let endpoint = self.resolve(url)?;
		let request = FormRequest::new(endpoint, self.form_body(url, fields));
		let response =
			self.transport.post_form(request).await.map_err(TransportError::network)?;

		Ok(response)
	}
}
#[cfg(feature = "reqwest")]
impl RequestService<ReqwestTransport> {
	/// Creates a service with its own cookie-enabled reqwest transport.
	pub fn new(store: Arc<KeyValueStore>, page: Arc<dyn PageContext>) -> Result<Self> {
		Ok(Self::with_transport(store, page, ReqwestTransport::new()?))
	}
}
impl<T> Clone for RequestService<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			store: self.store.clone(),
			page: self.page.clone(),
			transport: self.transport.clone(),
		}
	}
}
impl<T> Debug for RequestService<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestService").field("store", &self.store).finish()
	}
}

fn parse_json(url: &str, response: &FormResponse) -> Result<serde_json::Value> {
	serde_json::from_slice(&response.body).map_err(|source| Error::ResponseParse {
		url: url.to_owned(),
		status: response.status,
		source,
	})
}
