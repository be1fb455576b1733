//! [`StorageBackend`] over the host's durable storage; values are stored raw.

// self
use crate::{
	_prelude::*,
	obs,
	store::{DurableStorage, StorageBackend, StoreMode},
};

/// Durable-mode backend.
///
/// Errors raised after the probe succeeded (quota exhaustion, storage cleared under us) are
/// logged and absorbed: reads yield `""` and writes are dropped.
#[derive(Clone)]
pub struct DurableBackend(Arc<dyn DurableStorage>);
impl DurableBackend {
	/// Wraps a durable-storage collaborator.
	pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
		Self(storage)
	}
}
impl StorageBackend for DurableBackend {
	fn mode(&self) -> StoreMode {
		StoreMode::Durable
	}

	fn get(&self, key: &str) -> String {
		match self.0.get_item(key) {
			Ok(value) => value.unwrap_or_default(),
			Err(e) => {
				obs::storage_error_absorbed("get", &e);

				String::new()
			},
		}
	}

	fn set(&self, key: &str, value: &str, _expires: Option<OffsetDateTime>) {
		if let Err(e) = self.0.set_item(key, value) {
			obs::storage_error_absorbed("set", &e);
		}
	}

	fn remove(&self, key: &str) {
		if let Err(e) = self.0.remove_item(key) {
			obs::storage_error_absorbed("remove", &e);
		}
	}
}
impl Debug for DurableBackend {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("DurableBackend(..)")
	}
}
