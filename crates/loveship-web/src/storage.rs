use loveship_engine::{SessionStore, StoreError};
use web_sys::Storage;

/// Session store backed by `window.localStorage`.
///
/// Private browsing or a sandboxed iframe can deny storage; the experience
/// then still runs, it just forgets the visitor on reload.
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("storage: localStorage unavailable, progress will not persist");
        }
        Self { storage }
    }
}

impl SessionStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage.set_item(key, value).map_err(|err| StoreError::Write {
            key: key.to_string(),
            reason: format!("{:?}", err),
        })
    }
}
