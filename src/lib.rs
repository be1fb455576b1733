//! Page-side OAuth login helpers: idempotent return URLs, templated authorize links, a
//! durable-or-cookie token store, and form posts that attach the stored token automatically.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod link;
pub mod obs;
pub mod page;
pub mod request;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		http::ReqwestTransport,
		page::{MemoryPage, PageContext},
		request::RequestService,
		store::{DurableStorage, KeyValueStore, MemoryStorage},
	};

	/// Request service type alias used by reqwest-backed integration tests.
	pub type ReqwestTestService = RequestService<ReqwestTransport>;

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.cookie_store(true)
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Builds a store over the provided durable storage and an in-memory page.
	pub fn build_test_store(
		durable: Arc<dyn DurableStorage>,
		page_url: &str,
	) -> (Arc<KeyValueStore>, Arc<MemoryPage>) {
		let page = Arc::new(MemoryPage::new(page_url));
		let page_ctx: Arc<dyn PageContext> = page.clone();
		let store = Arc::new(KeyValueStore::new(durable, page_ctx));

		(store, page)
	}

	/// Constructs a [`RequestService`] backed by in-memory durable storage and the reqwest
	/// transport used across integration tests.
	pub fn build_reqwest_test_service() -> (ReqwestTestService, Arc<KeyValueStore>) {
		let durable: Arc<dyn DurableStorage> = Arc::new(MemoryStorage::default());
		let (store, page) = build_test_store(durable, "https://app.example.com/");
		let service =
			RequestService::with_transport(store.clone(), page, test_reqwest_transport());

		(service, store)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
