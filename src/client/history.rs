use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::storage::Storage;
use crate::error::StorageError;

pub const HISTORY_KEY: &str = "downloadHistory";
pub const HISTORY_MAX_ENTRIES: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub thumbnail: String,
    pub timestamp: DateTime<Utc>,
}

/// Recently extracted URLs, newest first, one entry per URL.
pub struct History<S> {
    storage: S,
}

impl<S: Storage> History<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn entries(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        match self.storage.get(HISTORY_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn add(
        &self,
        url: &str,
        title: &str,
        thumbnail: &str,
    ) -> Result<Vec<HistoryEntry>, StorageError> {
        let mut entries = self.entries().await?;
        entries.retain(|entry| entry.url != url);
        entries.insert(
            0,
            HistoryEntry {
                id: Uuid::new_v4(),
                url: url.to_string(),
                title: title.to_string(),
                thumbnail: thumbnail.to_string(),
                timestamp: Utc::now(),
            },
        );
        entries.truncate(HISTORY_MAX_ENTRIES);

        self.storage
            .set(HISTORY_KEY, serde_json::to_string(&entries)?)
            .await?;
        Ok(entries)
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(HISTORY_KEY).await
    }
}
