use super::storage::Storage;
use crate::error::StorageError;

pub const THEME_KEY: &str = "darkMode";

pub struct ThemePreference<S> {
    storage: S,
}

impl<S: Storage> ThemePreference<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Anything other than a stored `"true"` renders light.
    pub async fn is_dark(&self) -> Result<bool, StorageError> {
        Ok(self.storage.get(THEME_KEY).await?.as_deref() == Some("true"))
    }

    pub async fn set_dark(&self, dark: bool) -> Result<(), StorageError> {
        self.storage.set(THEME_KEY, dark.to_string()).await
    }

    pub async fn toggle(&self) -> Result<bool, StorageError> {
        let dark = !self.is_dark().await?;
        self.set_dark(dark).await?;
        Ok(dark)
    }
}

/// Label of the control that switches to the other theme.
pub fn label(dark: bool) -> &'static str {
    if dark { "Light mode" } else { "Dark mode" }
}
