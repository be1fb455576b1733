//! Authorization links and return-to URLs.
//!
//! [`UrlService`] reads the live page through a [`PageContext`] and exposes three operations:
//! the canonical source URL to come back to after the provider redirect, the templated
//! authorization URL, and single query-parameter lookups for the callback leg.
//!
//! Canonicalization is idempotent: feeding [`canonical_source_url`] its own output returns the
//! same string, so repeated redirects never grow the URL or accumulate `code`/`state` pairs.

// std
use std::{borrow::Borrow, hash::Hash};
// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	codec,
	config::{AUTHORIZE_SCOPE, LoginSettings},
	page::PageContext,
};

const STATE_LEN: usize = 32;
/// Query parameters produced by the provider redirect; never part of a source URL.
const TRANSIENT_PARAMS: [&str; 2] = ["code", "state"];

/// Page-bound URL helper.
#[derive(Clone)]
pub struct UrlService {
	page: Arc<dyn PageContext>,
	settings: LoginSettings,
}
impl UrlService {
	/// Creates a service using the default settings.
	pub fn new(page: Arc<dyn PageContext>) -> Self {
		Self::with_settings(page, LoginSettings::default())
	}

	/// Creates a service using validated `settings`.
	pub fn with_settings(page: Arc<dyn PageContext>, settings: LoginSettings) -> Self {
		Self { page, settings }
	}

	/// Settings in use.
	pub fn settings(&self) -> &LoginSettings {
		&self.settings
	}

	/// Canonical URL of the current page, suitable as the post-login return target.
	pub fn source_url(&self) -> String {
		self.canonicalize(&self.page.current_url())
	}

	/// Canonicalizes an arbitrary URL with this service's cache hosts.
	pub fn canonicalize(&self, url: &str) -> String {
		canonical_source_url(url, &self.settings.cache_hosts)
	}

	/// Renders the authorization URL from `vars`.
	///
	/// Missing variables render as `""`; `scope` always renders as the fixed login scope.
	/// Values are inserted verbatim, so callers encode them first when needed.
	pub fn oauth_url<K, V>(&self, vars: &HashMap<K, V>) -> String
	where
		K: Borrow<str> + Hash + Eq,
		V: AsRef<str>,
	{
		render_with(&self.settings.authorize_template, |name| {
			if name == "scope" { Some(AUTHORIZE_SCOPE) } else { vars.get(name).map(AsRef::as_ref) }
		})
	}

	/// Returns the decoded value of `name` in the current page's query string, or `""`.
	pub fn query(&self, name: &str) -> String {
		let raw = self.page.current_query_string();

		codec::extract_query_param(raw.strip_prefix('?').unwrap_or(&raw), name)
	}
}
impl Debug for UrlService {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UrlService").field("settings", &self.settings).finish()
	}
}

/// Canonical return-to URL for `current`.
///
/// 1. Normalizes through the URL parser and unwraps page-cache paths served by `cache_hosts`.
/// 2. Drops the fragment.
/// 3. Drops every `code=` and `state=` query segment, along with empty segments.
///
/// Input that does not parse as an absolute URL gets the same edits applied textually.
pub fn canonical_source_url(current: &str, cache_hosts: &[String]) -> String {
	let Ok(mut url) = Url::parse(current) else {
		return strip_transient_params(current.split('#').next().unwrap_or_default());
	};

	while let Some(origin) = unwrap_cache_url(&url, cache_hosts) {
		url = origin;
	}

	// Editing through `Url` keeps opaque paths trimmed the same way a reparse would.
	url.set_fragment(None);

	if let Some(kept) = url.query().map(retain_params) {
		url.set_query(Some(&kept));
	}

	url.into()
}

/// Substitutes every `${name}` in `template` with `vars[name]`, or `""` when missing.
pub fn render_template<K, V>(template: &str, vars: &HashMap<K, V>) -> String
where
	K: Borrow<str> + Hash + Eq,
	V: AsRef<str>,
{
	render_with(template, |name| vars.get(name).map(AsRef::as_ref))
}

/// Random alphanumeric value suitable for the `state` variable.
pub fn generate_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}

fn render_with<'v, F>(template: &str, lookup: F) -> String
where
	F: Fn(&str) -> Option<&'v str>,
{
	let mut out = String::with_capacity(template.len());
	let mut rest = template;

	while let Some(start) = rest.find("${") {
		let after = &rest[start + 2..];

		out.push_str(&rest[..start]);

		match after.find('}') {
			Some(0) => {
				// `${}` is not a placeholder.
				out.push('$');
				rest = &rest[start + 1..];
			},
			Some(end) => {
				out.push_str(lookup(&after[..end]).unwrap_or_default());
				rest = &after[end + 1..];
			},
			None => {
				out.push_str(&rest[start..]);
				rest = "";
			},
		}
	}

	out.push_str(rest);

	out
}

fn unwrap_cache_url(url: &Url, cache_hosts: &[String]) -> Option<Url> {
	let host = url.host_str()?;

	if !cache_hosts.iter().any(|cache| cache.eq_ignore_ascii_case(host)) {
		return None;
	}

	let path = url.path();
	let (scheme, origin_path) = if let Some(rest) = path.strip_prefix("/c/s/") {
		("https", rest)
	} else {
		("http", path.strip_prefix("/c/")?)
	};

	if origin_path.is_empty() {
		return None;
	}

	let mut origin = Url::parse(&format!("{scheme}://{origin_path}")).ok()?;

	origin.set_query(url.query());
	origin.set_fragment(url.fragment());

	Some(origin)
}

fn strip_transient_params(url: &str) -> String {
	match url.split_once('?') {
		Some((base, query)) => format!("{base}?{}", retain_params(query)),
		None => url.to_owned(),
	}
}

fn retain_params(query: &str) -> String {
	query
		.split('&')
		.filter(|segment| !segment.is_empty() && !is_transient(segment))
		.collect::<Vec<_>>()
		.join("&")
}

fn is_transient(segment: &str) -> bool {
	segment.split_once('=').is_some_and(|(name, _)| TRANSIENT_PARAMS.contains(&name))
}
