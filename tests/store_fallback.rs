// std
use std::sync::Arc;
// crates.io
use time::{Duration, OffsetDateTime};
// self
use oauth2_page_login::{
	page::{MemoryPage, PageContext},
	store::{DurableStorage, KeyValueStore, MemoryStorage, PROBE_KEY, StoreMode},
};

const KEY: &str = "https://api.example.com/user/info";

fn store_over(durable: Arc<dyn DurableStorage>) -> (KeyValueStore, Arc<MemoryPage>) {
	let page = Arc::new(MemoryPage::new("https://m.example.com/account/profile"));
	let store = KeyValueStore::new(durable, page.clone());

	(store, page)
}

#[test]
fn durable_mode_round_trips_without_cookies() {
	let durable = Arc::new(MemoryStorage::default());
	let (store, page) = store_over(durable.clone());

	assert_eq!(store.mode(), StoreMode::Durable);
	assert_eq!(store.get(KEY), "");

	store.set(KEY, "token-1", Some(OffsetDateTime::now_utc() + Duration::hours(1)));

	assert_eq!(store.get(KEY), "token-1");
	assert_eq!(durable.get_item(KEY), Ok(Some("token-1".into())));
	assert_eq!(durable.get_item(PROBE_KEY), Ok(None));
	assert_eq!(page.cookie_count(), 0);

	store.remove(KEY);

	assert_eq!(store.get(KEY), "");
}

#[test]
fn unavailable_storage_falls_back_to_cookies() {
	let (store, page) = store_over(Arc::new(MemoryStorage::unavailable()));

	assert_eq!(store.mode(), StoreMode::CookieFallback);

	store.set(KEY, "a b;c", Some(OffsetDateTime::now_utc() + Duration::days(1)));

	assert_eq!(store.get(KEY), "a b;c");
	assert!(page.cookie_header().contains("https%3A%2F%2Fapi.example.com%2Fuser%2Finfo=a%20b%3Bc"));

	store.remove(KEY);

	assert_eq!(store.get(KEY), "");
	assert_eq!(page.cookie_count(), 0);
}

#[test]
fn session_cookies_are_written_without_expiry() {
	let (store, page) = store_over(Arc::new(MemoryStorage::unavailable()));

	store.set(KEY, "session", None);

	assert_eq!(store.get(KEY), "session");
	assert_eq!(page.cookie_count(), 1);
}

#[test]
fn quota_exhausted_storage_falls_back_to_cookies() {
	let (store, _page) = store_over(Arc::new(MemoryStorage::with_quota(4)));

	assert_eq!(store.mode(), StoreMode::CookieFallback);

	store.set(KEY, "token-2", None);

	assert_eq!(store.get(KEY), "token-2");
}
