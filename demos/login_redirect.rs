//! Walks through one login round trip against an in-memory page.
//!
//! 1. Render the authorization link for the current page, with a fresh `state`.
//! 2. Simulate the provider redirect back with `code` and `state` in the query string.
//! 3. Read both values, recover the canonical return URL, and remember the exchanged token.
//! 4. Show the form body the next post to the API would carry.

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use color_eyre::Result;
// self
use oauth2_page_login::{
	codec::{self, FormData},
	config::LoginSettings,
	link::{self, UrlService},
	page::MemoryPage,
	request::RequestService,
	store::{KeyValueStore, MemoryStorage},
};

const API: &str = "https://api.example.com/user/info";

fn main() -> Result<()> {
	color_eyre::install()?;

	let page = Arc::new(MemoryPage::new(
		"https://mipcache.example.net/c/s/m.example.com/news/42?from=feed#top",
	));
	let settings = LoginSettings::builder().cache_host("mipcache.example.net").build()?;
	let urls = UrlService::with_settings(page.clone(), settings);
	let state = link::generate_state();
	let source = urls.source_url();
	let vars = HashMap::from([
		("client_id", "demo-client".to_owned()),
		("redirect_uri", codec::encode_component(&source)),
		("state", state.clone()),
	]);

	println!("Return target: {source}.");
	println!("Authorization link: {}.", urls.oauth_url(&vars));

	page.navigate(format!("{source}&code=auth-code-1&state={state}"));

	println!("Callback code: {}.", urls.query("code"));
	println!("Callback state matches: {}.", urls.query("state") == state);
	println!("Return target after callback: {}.", urls.source_url());

	let store = Arc::new(KeyValueStore::new(Arc::new(MemoryStorage::default()), page.clone()));
	let requests = RequestService::new(store.clone(), page)?;

	requests.remember_token(API, "exchanged-token", None);

	let fields = FormData::new().with("fields", "nickname avatar");

	println!("Store mode: {}.", store.mode());
	println!("Next post body: {}.", requests.form_body(API, Some(&fields)));

	Ok(())
}
