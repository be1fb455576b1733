//! Shows the key/value store degrading to page cookies when durable storage is unavailable.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use time::{Duration, OffsetDateTime};
// self
use oauth2_page_login::{
	page::{MemoryPage, PageContext},
	store::{KeyValueStore, MemoryStorage},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let page = Arc::new(MemoryPage::new("https://m.example.com/account"));
	let store = KeyValueStore::new(Arc::new(MemoryStorage::unavailable()), page.clone());
	let key = "https://api.example.com/user/info";

	store.set(key, "token with spaces", Some(OffsetDateTime::now_utc() + Duration::days(7)));

	println!("Store mode: {}.", store.mode());
	println!("Cookie header: {}.", page.cookie_header());
	println!("Read back: {}.", store.get(key));

	store.remove(key);

	println!("Read after removal: {:?}.", store.get(key));
	println!("Live cookies: {}.", page.cookie_count());

	Ok(())
}
