//! String key/value persistence with a one-time durable-storage probe and a cookie fallback.
//!
//! [`KeyValueStore::new`] probes its [`DurableStorage`] collaborator once. A successful
//! write-then-delete probe fixes the store in [`StoreMode::Durable`]; any failure fixes it in
//! [`StoreMode::CookieFallback`], which emulates the same contract on top of the page's cookie
//! header. The mode is plain instance state afterwards: it is never re-probed, so callers sharing
//! the store never observe a mid-session switch.

pub mod cookie;
pub mod durable;
pub mod memory;

pub use cookie::CookieBackend;
pub use durable::DurableBackend;
pub use memory::MemoryStorage;

// self
use crate::{_prelude::*, obs, page::PageContext};

/// Key written and deleted by [`detect_support`].
pub const PROBE_KEY: &str = "lsExisted";

/// Durable-storage collaborator (the host's `localStorage` equivalent).
///
/// Every call may fail; the store converts failures into a fallback decision or absorbs them.
pub trait DurableStorage
where
	Self: Send + Sync,
{
	/// Reads the raw value stored under `key`.
	fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

	/// Writes `value` under `key`, replacing any previous value.
	fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

	/// Deletes `key`; deleting a missing key succeeds.
	fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Backend contract shared by both store modes.
pub trait StorageBackend
where
	Self: Send + Sync,
{
	/// Mode this backend implements.
	fn mode(&self) -> StoreMode;

	/// Returns the value for `key`, or `""` when absent.
	fn get(&self, key: &str) -> String;

	/// Stores `value` under `key`; `expires` is honored only by expiring backends.
	fn set(&self, key: &str, value: &str, expires: Option<OffsetDateTime>);

	/// Makes `key` unreadable.
	fn remove(&self, key: &str);
}

/// Persistence mode chosen by the support probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreMode {
	/// Values live in durable storage.
	Durable,
	/// Values live in cookies scoped to `/`.
	CookieFallback,
}
impl StoreMode {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StoreMode::Durable => "durable",
			StoreMode::CookieFallback => "cookie_fallback",
		}
	}
}
impl Display for StoreMode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`DurableStorage`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StorageError {
	/// Storage is disabled or absent in this environment.
	#[error("Storage is unavailable: {message}.")]
	Unavailable {
		/// Human-readable error payload.
		message: String,
	},
	/// Write would exceed the storage budget.
	#[error("Storage quota of {limit} bytes exceeded.")]
	QuotaExceeded {
		/// Budget in bytes.
		limit: usize,
	},
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Runs the write-then-delete probe against `storage`.
///
/// Returns `false` when either step fails, whatever the reason.
pub fn detect_support(storage: &dyn DurableStorage) -> bool {
	let probe = storage.set_item(PROBE_KEY, "1").and_then(|()| storage.remove_item(PROBE_KEY));

	match probe {
		Ok(()) => true,
		Err(e) => {
			obs::storage_error_absorbed("probe", &e);

			false
		},
	}
}

/// Mode-frozen string store backing the request layer's per-URL tokens.
pub struct KeyValueStore {
	durable: DurableBackend,
	cookie: CookieBackend,
	mode: StoreMode,
}
impl KeyValueStore {
	/// Probes `durable` and creates a store frozen in the resulting mode.
	pub fn new(durable: Arc<dyn DurableStorage>, page: Arc<dyn PageContext>) -> Self {
		let mode = if detect_support(durable.as_ref()) {
			StoreMode::Durable
		} else {
			StoreMode::CookieFallback
		};

		obs::store_mode_selected(mode);

		Self::with_mode(mode, durable, page)
	}

	/// Creates a store pinned to `mode` without probing.
	pub fn with_mode(
		mode: StoreMode,
		durable: Arc<dyn DurableStorage>,
		page: Arc<dyn PageContext>,
	) -> Self {
		Self { durable: DurableBackend::new(durable), cookie: CookieBackend::new(page), mode }
	}

	/// Mode chosen when the store was created.
	pub fn mode(&self) -> StoreMode {
		self.mode
	}

	/// Returns the value for `key`, or `""` when absent.
	pub fn get(&self, key: &str) -> String {
		self.backend().get(key)
	}

	/// Stores `value` under `key`; `expires` only applies in cookie mode (session cookie when
	/// omitted).
	pub fn set(&self, key: &str, value: &str, expires: Option<OffsetDateTime>) {
		self.backend().set(key, value, expires);
	}

	/// Makes `key` unreadable.
	pub fn remove(&self, key: &str) {
		self.backend().remove(key);
	}

	fn backend(&self) -> &dyn StorageBackend {
		match self.mode() {
			StoreMode::Durable => &self.durable,
			StoreMode::CookieFallback => &self.cookie,
		}
	}
}
impl Debug for KeyValueStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("KeyValueStore").field("mode", &self.mode).finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{
		sync::atomic::{AtomicUsize, Ordering},
		thread,
	};
	// self
	use super::*;
	use crate::page::MemoryPage;

	#[derive(Default)]
	struct CountingStorage {
		inner: MemoryStorage,
		probes: AtomicUsize,
	}
	impl DurableStorage for CountingStorage {
		fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
			self.inner.get_item(key)
		}

		fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
			if key == PROBE_KEY {
				self.probes.fetch_add(1, Ordering::SeqCst);
			}

			self.inner.set_item(key, value)
		}

		fn remove_item(&self, key: &str) -> Result<(), StorageError> {
			self.inner.remove_item(key)
		}
	}

	struct RemoveFails;
	impl DurableStorage for RemoveFails {
		fn get_item(&self, _: &str) -> Result<Option<String>, StorageError> {
			Ok(None)
		}

		fn set_item(&self, _: &str, _: &str) -> Result<(), StorageError> {
			Ok(())
		}

		fn remove_item(&self, _: &str) -> Result<(), StorageError> {
			Err(StorageError::Backend { message: "remove rejected".into() })
		}
	}

	fn page() -> Arc<dyn PageContext> {
		Arc::new(MemoryPage::new("https://m.example.com/"))
	}

	#[test]
	fn probe_requires_both_write_and_delete() {
		assert!(detect_support(&MemoryStorage::default()));
		assert!(!detect_support(&MemoryStorage::unavailable()));
		assert!(!detect_support(&RemoveFails));
	}

	#[test]
	fn probe_leaves_no_residue() {
		let storage = MemoryStorage::default();

		assert!(detect_support(&storage));
		assert_eq!(storage.get_item(PROBE_KEY), Ok(None));
	}

	#[test]
	fn shared_store_never_probes_again() {
		let storage = Arc::new(CountingStorage::default());
		let store = KeyValueStore::new(storage.clone(), page());

		thread::scope(|scope| {
			for idx in 0..8 {
				let store = &store;

				scope.spawn(move || {
					let key = format!("k{idx}");

					store.set(&key, "v", None);

					assert_eq!(store.get(&key), "v");
					assert_eq!(store.mode(), StoreMode::Durable);
				});
			}
		});

		assert_eq!(storage.probes.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn pinned_mode_skips_probe() {
		let storage = Arc::new(CountingStorage::default());
		let store = KeyValueStore::with_mode(StoreMode::CookieFallback, storage.clone(), page());

		assert_eq!(store.mode(), StoreMode::CookieFallback);
		assert_eq!(storage.probes.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn failing_storage_selects_cookie_fallback() {
		let store = KeyValueStore::new(Arc::new(MemoryStorage::unavailable()), page());

		assert_eq!(store.mode(), StoreMode::CookieFallback);
		assert_eq!(format!("{store:?}"), "KeyValueStore { mode: CookieFallback }");
	}

	#[test]
	fn store_mode_serializes_in_snake_case() {
		let payload = serde_json::to_string(&StoreMode::CookieFallback)
			.expect("StoreMode should serialize to JSON.");

		assert_eq!(payload, "\"cookie_fallback\"");
		assert_eq!(StoreMode::Durable.to_string(), "durable");
	}
}
