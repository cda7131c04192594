use gloo::storage::{LocalStorage, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Fixed local-storage key for a persisted value.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault: Sized {
    /// Loads the stored value, falling back to `Default` when it is missing, unreadable, or storage is
    /// unavailable.
    fn local_or_default() -> Self;
}

impl<T: StorageKey + DeserializeOwned + Default> LocalOrDefault for T {
    fn local_or_default() -> Self {
        if !local_storage_available() {
            log::warn!("local storage unavailable, using default for {}", T::KEY);
            return T::default();
        }

        LocalStorage::get(T::KEY).unwrap_or_else(|err| {
            log::debug!("no usable {} in local storage: {:?}", T::KEY, err);
            T::default()
        })
    }
}

pub(crate) trait LocalSave {
    fn local_save(&self);
}

impl<T: StorageKey + Serialize> LocalSave for T {
    fn local_save(&self) {
        if !local_storage_available() {
            log::warn!("local storage unavailable, {} not saved", T::KEY);
            return;
        }

        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("Could not save {} to local storage: {:?}", T::KEY, err);
        }
    }
}

/// `LocalStorage` panics when the browser refuses access, so check before touching it.
fn local_storage_available() -> bool {
    matches!(gloo::utils::window().local_storage(), Ok(Some(_)))
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Formats seconds as `m:ss`.
pub(crate) fn format_time(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
