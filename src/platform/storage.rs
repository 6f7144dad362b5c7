//! LocalStorage-backed profile store (WASM only)

use crate::identity::{PROFILE_KEY, ProfileStore, StoreError, UserProfile};

/// The shared portal profile under [`PROFILE_KEY`]
#[derive(Debug, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

impl ProfileStore for LocalStore {
    fn load(&self) -> Result<Option<UserProfile>, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(PROFILE_KEY) {
            Ok(Some(json)) => Ok(Some(serde_json::from_str(&json)?)),
            Ok(None) => Ok(None),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    fn save(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(profile)?;
        storage
            .set_item(PROFILE_KEY, &json)
            .map_err(|e| StoreError::Write(format!("{e:?}")))?;
        log::info!("Profile saved");
        Ok(())
    }
}
