//! `localStorage`-backed preference store.

use tracing::warn;
use web_sys::Storage;

use super::js_reason;
use crate::prefs::storage::{KeyValueStore, StorageError};

/// The origin's `localStorage`, or nothing when the browser denies access
/// (private mode, disabled storage, sandboxed frames).
#[derive(Debug, Default)]
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    #[must_use]
    pub fn open() -> Self {
        let storage = match web_sys::window().map(|window| window.local_storage()) {
            Some(Ok(storage)) => storage,
            Some(Err(err)) => {
                warn!(reason = %js_reason(&err), "localStorage access denied");
                None
            }
            None => None,
        };
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage.as_ref().ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StorageError::Rejected { key: key.to_owned(), reason: js_reason(&err) })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Rejected { key: key.to_owned(), reason: js_reason(&err) })
    }
}
