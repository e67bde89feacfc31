//! `window.localStorage` as a [`Storage`] backend

use codecanvas_persistence::{Storage, StorageError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::DomException;

pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    pub fn from_window() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;

        let inner = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(describe(&e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))?;

        Ok(Self { inner })
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value).map_err(|e| {
            if is_quota_error(&e) {
                StorageError::QuotaExceeded(key.to_string())
            } else {
                StorageError::Unavailable(describe(&e))
            }
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let length = self
            .inner
            .length()
            .map_err(|e| StorageError::Unavailable(describe(&e)))?;

        let mut keys = Vec::with_capacity(length as usize);
        for index in 0..length {
            if let Ok(Some(key)) = self.inner.key(index) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

fn is_quota_error(error: &JsValue) -> bool {
    error
        .dyn_ref::<DomException>()
        .map(|e| {
            let name = e.name();
            // Firefox reports its own name for the same condition
            name == "QuotaExceededError" || name == "NS_ERROR_DOM_QUOTA_REACHED"
        })
        .unwrap_or(false)
}

/// Readable text for a thrown JS value
pub(crate) fn describe(error: &JsValue) -> String {
    if let Some(text) = error.as_string() {
        return text;
    }
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        return String::from(error.to_string());
    }
    js_sys::JSON::stringify(error)
        .ok()
        .and_then(|s| s.as_string())
        .unwrap_or_else(|| "unknown error".to_string())
}
