use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::error::StorageError;

/// Synchronous string key-value storage, shaped after the browser's `localStorage`.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage used outside the browser. Clones share the same slots,
/// so a clone can play the role of the same storage after a reload.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes once keys plus values would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    pub fn used_bytes(&self) -> usize {
        self.items
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let existing = self
                .items
                .borrow()
                .get(key)
                .map(|old| key.len() + old.len())
                .unwrap_or_default();
            let after = self.used_bytes() - existing + key.len() + value.len();
            if after > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(feature = "hydrate")]
pub use web::WebStorage;

#[cfg(feature = "hydrate")]
mod web {
    use super::KeyValueStorage;
    use crate::error::StorageError;

    /// `window.localStorage`
    #[derive(Clone, Debug)]
    pub struct WebStorage {
        storage: web_sys::Storage,
    }

    impl WebStorage {
        pub fn local() -> Option<Self> {
            let storage = web_sys::window()?.local_storage().ok()??;
            Some(Self { storage })
        }
    }

    fn backend_error(key: &str, value: wasm_bindgen::JsValue) -> StorageError {
        let message = format!("{value:?}");
        if message.contains("QuotaExceeded") {
            StorageError::QuotaExceeded {
                key: key.to_string(),
            }
        } else {
            StorageError::Backend(message)
        }
    }

    impl KeyValueStorage for WebStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.storage
                .get_item(key)
                .map_err(|e| backend_error(key, e))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.storage
                .set_item(key, value)
                .map_err(|e| backend_error(key, e))
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.storage
                .remove_item(key)
                .map_err(|e| backend_error(key, e))
        }
    }
}

/// The storage this environment offers, if any. Only browser builds have one.
pub fn browser_storage() -> Option<Rc<dyn KeyValueStorage>> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "hydrate")] {
            let storage = WebStorage::local();
            if storage.is_none() {
                log::warn!("localStorage is not available, sales will not survive a reload");
            }
            storage.map(|storage| Rc::new(storage) as Rc<dyn KeyValueStorage>)
        } else {
            None
        }
    }
}
