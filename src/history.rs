use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use ulid::Ulid;

use crate::error::StorageResult;
use crate::storage::LocalStorage;
use crate::types::{CalculatedNutrition, SavedNutrition};

pub const HISTORY_KEY: &str = "savedNutrition";
pub const MAX_ENTRIES: usize = 10;

/// Most-recent-first record of successful calculations, capped at [`MAX_ENTRIES`].
#[derive(Debug, Clone)]
pub struct History {
    storage: LocalStorage,
}

impl History {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Absent or malformed history reads as empty.
    pub fn load(&self) -> Vec<SavedNutrition> {
        let Some(raw) = self.storage.get_item(HISTORY_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "saved history is malformed, starting empty");
            Vec::new()
        })
    }

    pub fn save(&self, entries: &[SavedNutrition]) -> StorageResult<()> {
        let raw = serde_json::to_string(entries)?;
        self.storage.set_item(HISTORY_KEY, raw)
    }

    /// Prepend `data` and keep the newest [`MAX_ENTRIES`]. Returns the stored list.
    pub fn record(&self, data: CalculatedNutrition) -> StorageResult<Vec<SavedNutrition>> {
        let saved = SavedNutrition {
            id: Ulid::new().to_string(),
            timestamp: korean_timestamp(&Local::now()),
            data,
        };
        let mut entries = self.load();
        entries.insert(0, saved);
        entries.truncate(MAX_ENTRIES);
        self.save(&entries)?;
        Ok(entries)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.storage.remove_item(HISTORY_KEY)
    }
}

/// `2025. 3. 7. 오후 2:05:09`, the ko-KR locale's date-time rendering.
pub fn korean_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    let (is_pm, hour) = at.hour12();
    format!(
        "{}. {}. {}. {} {}:{:02}:{:02}",
        at.year(),
        at.month(),
        at.day(),
        if is_pm { "오후" } else { "오전" },
        hour,
        at.minute(),
        at.second()
    )
}
