//! Client-side state and presentation: the history list, the theme flag and
//! the formatting used when a result is shown to a person.

mod history;
mod present;
mod storage;
mod theme;

pub use history::{HISTORY_KEY, HISTORY_MAX_ENTRIES, History, HistoryEntry};
pub use present::{
    PLACEHOLDER_THUMBNAIL, format_count, format_duration, render_summary,
    thumbnail_or_placeholder,
};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use theme::{THEME_KEY, ThemePreference, label as theme_label};
