//! In-process [`PageContext`] with a browser-like cookie jar for tests and DOM-less hosts.

// self
use crate::{
	_prelude::*,
	page::{self, PageContext},
};

#[derive(Clone, Debug)]
struct StoredCookie {
	name: String,
	value: String,
	path: String,
	expires: Option<OffsetDateTime>,
}
impl StoredCookie {
	fn is_live_at(&self, now: OffsetDateTime) -> bool {
		self.expires.is_none_or(|expires| expires > now)
	}
}

/// Page emulation that tracks a mutable location and applies cookie writes the way a browser
/// does: cookies are keyed by name + path, `expires`/`max-age` in the past evict them, and the
/// header only lists live cookies whose path covers the current page.
#[derive(Debug, Default)]
pub struct MemoryPage {
	url: RwLock<String>,
	jar: RwLock<Vec<StoredCookie>>,
}
impl MemoryPage {
	/// Creates a page located at `url` with an empty cookie jar.
	pub fn new(url: impl Into<String>) -> Self {
		Self { url: RwLock::new(url.into()), jar: Default::default() }
	}

	/// Moves the page to `url`, keeping cookies.
	pub fn navigate(&self, url: impl Into<String>) {
		*self.url.write() = url.into();
	}

	/// Number of live cookies currently held, regardless of path.
	pub fn cookie_count(&self) -> usize {
		let now = OffsetDateTime::now_utc();

		self.jar.read().iter().filter(|cookie| cookie.is_live_at(now)).count()
	}

	fn current_path(&self) -> String {
		let url = self.url.read();

		match Url::parse(&url) {
			Ok(parsed) => parsed.path().to_owned(),
			Err(_) => "/".into(),
		}
	}
}
impl PageContext for MemoryPage {
	fn current_url(&self) -> String {
		self.url.read().clone()
	}

	fn current_query_string(&self) -> String {
		let url = self.url.read();

		match Url::parse(&url) {
			Ok(parsed) => parsed.query().unwrap_or_default().to_owned(),
			Err(_) => {
				let without_fragment = url.split('#').next().unwrap_or_default();

				without_fragment.split_once('?').map(|(_, query)| query.to_owned()).unwrap_or_default()
			},
		}
	}

	fn cookie_header(&self) -> String {
		let now = OffsetDateTime::now_utc();
		let path = self.current_path();

		self.jar
			.read()
			.iter()
			.filter(|cookie| cookie.is_live_at(now) && path_matches(&path, &cookie.path))
			.map(|cookie| format!("{}={}", cookie.name, cookie.value))
			.collect::<Vec<_>>()
			.join("; ")
	}

	fn set_cookie(&self, cookie: &str) {
		let Some(parsed) = parse_set_cookie(cookie, &self.current_path()) else {
			return;
		};
		let now = OffsetDateTime::now_utc();
		let mut jar = self.jar.write();

		jar.retain(|existing| !(existing.name == parsed.name && existing.path == parsed.path));

		if parsed.is_live_at(now) {
			jar.push(parsed);
		}
	}
}

fn parse_set_cookie(raw: &str, default_path: &str) -> Option<StoredCookie> {
	let mut parts = raw.split(';');
	let (name, value) = parts.next()?.trim().split_once('=')?;
	let mut cookie = StoredCookie {
		name: name.trim().to_owned(),
		value: value.trim().to_owned(),
		path: default_directory(default_path),
		expires: None,
	};
	let mut max_age = None;

	for attribute in parts {
		let (key, value) = attribute.split_once('=').unwrap_or((attribute, ""));

		match key.trim().to_ascii_lowercase().as_str() {
			"path" if value.trim().starts_with('/') => cookie.path = value.trim().to_owned(),
			"expires" => cookie.expires = page::parse_http_date(value).or(cookie.expires),
			"max-age" => max_age = value.trim().parse::<i64>().ok(),
			_ => {},
		}
	}

	// `max-age` takes precedence over `expires`.
	if let Some(seconds) = max_age {
		cookie.expires = Some(OffsetDateTime::now_utc() + Duration::seconds(seconds));
	}

	Some(cookie)
}

/// RFC 6265 §5.1.4 path-match.
fn path_matches(request_path: &str, cookie_path: &str) -> bool {
	request_path.strip_prefix(cookie_path).is_some_and(|rest| {
		rest.is_empty() || cookie_path.ends_with('/') || rest.starts_with('/')
	})
}

fn default_directory(path: &str) -> String {
	match path.rfind('/') {
		Some(0) | None => "/".into(),
		Some(idx) => path[..idx].to_owned(),
	}
}
