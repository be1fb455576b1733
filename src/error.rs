//! Crate-level error types shared by the request, link, and configuration layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Storage failures never appear here: the key/value store absorbs them and degrades to its
/// cookie fallback instead.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, I/O).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Endpoint answered with a body that is not valid JSON.
	#[error("Response from {url} could not be parsed as JSON.")]
	ResponseParse {
		/// Endpoint that produced the response.
		url: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Syntax failure reported by the JSON parser.
		#[source]
		source: serde_json::Error,
	},
	/// Endpoint answered with JSON that does not match the requested type.
	#[error("Response from {url} does not match the expected shape.")]
	ResponseDecode {
		/// Endpoint that produced the response.
		url: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Structured decoding failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Settings document could not be deserialized.
	#[error("Login settings could not be parsed.")]
	InvalidSettings {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Authorization template lacks a required placeholder.
	#[error("Authorization template is missing the `${{{name}}}` placeholder.")]
	MissingPlaceholder {
		/// Placeholder name.
		name: &'static str,
	},
	/// Authorization template does not form a valid URL.
	#[error("Authorization template does not form a valid URL.")]
	InvalidTemplate {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Authorization endpoint must use HTTPS.
	#[error("The authorization endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Cache host entry is not a bare host name.
	#[error("Cache host `{host}` is not a valid host name.")]
	InvalidCacheHost {
		/// Offending host entry.
		host: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request URL could not be resolved, even against the current page.
	#[error("Request URL `{url}` could not be resolved.")]
	UnresolvableUrl {
		/// URL as passed by the caller.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
