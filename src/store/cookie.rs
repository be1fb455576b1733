//! [`StorageBackend`] that emulates key/value persistence through the page's cookies.

// self
use crate::{
	_prelude::*,
	codec,
	page::{self, PageContext},
	store::{StorageBackend, StoreMode},
};

/// Value written when evicting a cookie; never observable by readers.
const REMOVED_SENTINEL: &str = "null";
/// How far in the past an eviction expiry is placed.
const EVICTION_OFFSET: Duration = Duration::milliseconds(100);

/// Cookie-mode backend: keys and values are percent-encoded, cookies are scoped to `/`, and
/// removal overwrites the cookie with an expiry in the past.
#[derive(Clone)]
pub struct CookieBackend(Arc<dyn PageContext>);
impl CookieBackend {
	/// Wraps a page context.
	pub fn new(page: Arc<dyn PageContext>) -> Self {
		Self(page)
	}
}
impl StorageBackend for CookieBackend {
	fn mode(&self) -> StoreMode {
		StoreMode::CookieFallback
	}

	fn get(&self, key: &str) -> String {
		read_cookie(&self.0.cookie_header(), key).unwrap_or_default()
	}

	fn set(&self, key: &str, value: &str, expires: Option<OffsetDateTime>) {
		self.0.set_cookie(&format_cookie(key, value, expires));
	}

	fn remove(&self, key: &str) {
		let expires = OffsetDateTime::now_utc() - EVICTION_OFFSET;

		self.set(key, REMOVED_SENTINEL, Some(expires));
	}
}
impl Debug for CookieBackend {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("CookieBackend(..)")
	}
}

/// Returns the decoded value of the first cookie named `key` in `header`.
///
/// The name is compared against the percent-encoded key, exactly. A cookie whose value is not
/// valid percent-encoding reads as `Some("")`.
pub fn read_cookie(header: &str, key: &str) -> Option<String> {
	let name = codec::encode_component(key);

	header
		.split(';')
		.filter_map(|segment| segment.trim_start().split_once('='))
		.find(|(candidate, _)| *candidate == name)
		.map(|(_, value)| codec::decode_component(value).unwrap_or_default())
}

/// Renders a `document.cookie` assignment for `key`.
pub fn format_cookie(key: &str, value: &str, expires: Option<OffsetDateTime>) -> String {
	let mut cookie = format!(
		"{}={};path=/",
		codec::encode_component(key),
		codec::encode_component(value)
	);

	if let Some(expires) = expires {
		cookie.push_str(";expires=");
		cookie.push_str(&page::format_http_date(expires));
	}

	cookie
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::page::MemoryPage;

	fn backend() -> (CookieBackend, Arc<MemoryPage>) {
		let page = Arc::new(MemoryPage::new("https://m.example.com/article/1"));

		(CookieBackend::new(page.clone()), page)
	}

	#[test]
	fn read_cookie_matches_exact_names_only() {
		let header = "xtoken=1; token=two; token=three";

		assert_eq!(read_cookie(header, "token"), Some("two".into()));
		assert_eq!(read_cookie(header, "oken"), None);
		assert_eq!(read_cookie("", "token"), None);
	}

	#[test]
	fn read_cookie_decodes_and_fails_soft() {
		assert_eq!(read_cookie("a%20b=c%3Dd", "a b"), Some("c=d".into()));
		assert_eq!(read_cookie("bad=%E0%A4", "bad"), Some(String::new()));
	}

	#[test]
	fn format_cookie_encodes_and_appends_expiry() {
		let expires = macros::datetime!(2026-10-20 08:00 UTC);

		assert_eq!(format_cookie("k y", "v;1", None), "k%20y=v%3B1;path=/");
		assert_eq!(
			format_cookie("k", "v", Some(expires)),
			"k=v;path=/;expires=Tue, 20 Oct 2026 08:00:00 GMT"
		);
	}

	#[test]
	fn round_trip_and_removal_through_page_jar() {
		let (backend, page) = backend();
		let key = "https://api.example.com/user?id=7";

		backend.set(key, "tok en/✓", None);

		assert_eq!(backend.get(key), "tok en/✓");
		assert_eq!(page.cookie_count(), 1);

		backend.remove(key);

		assert_eq!(backend.get(key), "");
		assert_eq!(page.cookie_count(), 0);
	}

	#[test]
	fn cookies_are_visible_from_other_paths() {
		let (backend, page) = backend();

		backend.set("k", "v", Some(OffsetDateTime::now_utc() + Duration::hours(1)));
		page.navigate("https://m.example.com/");

		assert_eq!(backend.get("k"), "v");
		assert_eq!(backend.mode(), StoreMode::CookieFallback);
	}
}
