use geocoin_core::{GameError, Result, StateStore};
use gloo::storage::{LocalStorage, Storage};

/// Browser local storage behind the core's key-value interface.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LocalStore;

impl StateStore for LocalStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|err| GameError::Storage(format!("{:?}", err)))
    }

    fn write(&mut self, key: &str, value: String) -> Result<()> {
        LocalStorage::raw()
            .set_item(key, &value)
            .map_err(|err| GameError::Storage(format!("{:?}", err)))
    }

    fn remove(&mut self, key: &str) {
        LocalStorage::delete(key);
    }
}
