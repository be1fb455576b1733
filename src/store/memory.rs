//! Thread-safe in-memory [`DurableStorage`] for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{DurableStorage, StorageError},
};

type StorageMap = Arc<RwLock<HashMap<String, String>>>;

/// In-process durable storage.
///
/// Clones share the same map. [`MemoryStorage::unavailable`] and [`MemoryStorage::with_quota`]
/// reproduce the failure modes that push a store into its cookie fallback.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
	map: StorageMap,
	unavailable: bool,
	quota: Option<usize>,
}
impl MemoryStorage {
	/// Storage whose every call fails, as with disabled or absent storage.
	pub fn unavailable() -> Self {
		Self { unavailable: true, ..Default::default() }
	}

	/// Storage that rejects writes once keys plus values would exceed `limit` bytes.
	pub fn with_quota(limit: usize) -> Self {
		Self { quota: Some(limit), ..Default::default() }
	}

	/// Number of stored entries.
	pub fn len(&self) -> usize {
		self.map.read().len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.map.read().is_empty()
	}

	fn ensure_available(&self) -> Result<(), StorageError> {
		if self.unavailable {
			Err(StorageError::Unavailable { message: "memory storage disabled".into() })
		} else {
			Ok(())
		}
	}

	fn usage_after(map: &HashMap<String, String>, key: &str, value: &str) -> usize {
		map.iter()
			.filter(|(existing, _)| existing.as_str() != key)
			.map(|(k, v)| k.len() + v.len())
			.sum::<usize>()
			+ key.len()
			+ value.len()
	}
}
impl DurableStorage for MemoryStorage {
	fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
		self.ensure_available()?;

		Ok(self.map.read().get(key).cloned())
	}

	fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
		self.ensure_available()?;

		let mut guard = self.map.write();

		if let Some(limit) = self.quota.filter(|limit| Self::usage_after(&guard, key, value) > *limit)
		{
			return Err(StorageError::QuotaExceeded { limit });
		}

		guard.insert(key.to_owned(), value.to_owned());

		Ok(())
	}

	fn remove_item(&self, key: &str) -> Result<(), StorageError> {
		self.ensure_available()?;
		self.map.write().remove(key);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn clones_share_entries() {
		let storage = MemoryStorage::default();
		let clone = storage.clone();

		storage.set_item("k", "v").expect("Memory storage writes should succeed.");

		assert_eq!(clone.get_item("k"), Ok(Some("v".into())));
		assert_eq!(clone.len(), 1);
	}

	#[test]
	fn unavailable_storage_rejects_every_call() {
		let storage = MemoryStorage::unavailable();

		assert!(matches!(storage.get_item("k"), Err(StorageError::Unavailable { .. })));
		assert!(matches!(storage.set_item("k", "v"), Err(StorageError::Unavailable { .. })));
		assert!(matches!(storage.remove_item("k"), Err(StorageError::Unavailable { .. })));
	}

	#[test]
	fn quota_counts_replacements_once() {
		let storage = MemoryStorage::with_quota(4);

		storage.set_item("k", "abc").expect("Write within budget should succeed.");
		storage.set_item("k", "xyz").expect("Replacing a value within budget should succeed.");

		assert_eq!(storage.set_item("k", "abcd"), Err(StorageError::QuotaExceeded { limit: 4 }));
		assert_eq!(storage.get_item("k"), Ok(Some("xyz".into())));
		assert!(!storage.is_empty());
	}
}
