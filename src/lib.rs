//! Daily gratitude journal: up to three things you're grateful for plus a
//! short summary per day, kept in a single JSON slot, with running statistics
//! and a filterable history.

pub mod config;
pub mod date_key;
pub mod entry;
pub mod error;
pub mod history;
pub mod journal;
pub mod stats;
pub mod store;

pub use config::Config;
pub use date_key::DateKey;
pub use entry::{upsert, Entry, EntryPatch, Items, ITEM_SLOTS};
pub use error::{JournalError, Result};
pub use history::{filter_by_range, HistoryRange};
pub use journal::Journal;
pub use stats::{compute_stats, Stats};
pub use store::{EntryStore, FileStorage, MemoryStorage, Storage};
