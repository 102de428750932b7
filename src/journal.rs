//! One session over the journal: entries are loaded once, held in memory and
//! written back after every change.

use chrono::NaiveDate;
use tracing::info;

use crate::{
    config::Config,
    date_key::DateKey,
    entry::{upsert, Entry, EntryPatch, Items},
    error::{JournalError, Result},
    history::{filter_by_range, HistoryRange},
    stats::{compute_stats_capped, Stats, DEFAULT_STREAK_WALK_LIMIT},
    store::{EntryStore, FileStorage, Storage},
};

#[derive(Debug)]
pub struct Journal<S> {
    store: EntryStore<S>,
    entries: Vec<Entry>,
    streak_walk_limit: u32,
}

impl Journal<FileStorage> {
    pub fn open(config: &Config) -> Self {
        let store = EntryStore::new(FileStorage::new(&config.data_dir), &config.storage_key);
        Journal::with_store(store).streak_walk_limit(config.streak_walk_limit)
    }
}

impl<S: Storage> Journal<S> {
    pub fn with_store(store: EntryStore<S>) -> Self {
        let entries = store.load();
        Journal {
            store,
            entries,
            streak_walk_limit: DEFAULT_STREAK_WALK_LIMIT,
        }
    }

    pub fn streak_walk_limit(mut self, limit: u32) -> Self {
        self.streak_walk_limit = limit;
        self
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_for(&self, date: &DateKey) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.date == date)
    }

    /// Record the day's items and summary, replacing anything saved earlier
    /// that day, and return the entry as stored. Inputs are trimmed; an
    /// all-blank submission changes nothing.
    pub fn submit(&mut self, today: NaiveDate, items: Items, summary: &str) -> Result<Entry> {
        let items = items.map(|item| item.trim().to_string());
        let summary = summary.trim();
        if items.iter().all(String::is_empty) && summary.is_empty() {
            return Err(JournalError::EmptySubmission);
        }

        // both fields are set, so the stored entry is exactly this one
        let entry = Entry {
            date: DateKey::from_date(today),
            items,
            summary: summary.to_string(),
        };
        let patch = EntryPatch::full(entry.items.clone(), entry.summary.clone());
        self.apply(&entry.date, patch)?;
        Ok(entry)
    }

    /// Merge a patch into one day's entry and persist the result.
    pub fn apply(&mut self, date: &DateKey, patch: EntryPatch) -> Result<()> {
        let updated = upsert(&self.entries, date, patch);
        self.store.save(&updated)?;
        self.entries = updated;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.save(&[])?;
        info!(removed = self.entries.len(), "cleared journal");
        self.entries.clear();
        Ok(())
    }

    pub fn stats(&self, today: NaiveDate) -> Stats {
        compute_stats_capped(&self.entries, today, self.streak_walk_limit)
    }

    pub fn history(&self, range: HistoryRange, today: NaiveDate) -> Vec<Entry> {
        filter_by_range(&self.entries, range, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStorage, DEFAULT_STORAGE_KEY};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn items(a: &str, b: &str, c: &str) -> Items {
        [a.to_string(), b.to_string(), c.to_string()]
    }

    fn journal() -> Journal<MemoryStorage> {
        Journal::with_store(EntryStore::new(MemoryStorage::new(), DEFAULT_STORAGE_KEY))
    }

    #[test]
    fn blank_submission_is_rejected_without_saving() {
        let mut journal = journal();
        let err = journal
            .submit(day(2024, 1, 1), items("  ", "", "\t"), "   ")
            .unwrap_err();
        assert!(matches!(err, JournalError::EmptySubmission));
        assert!(journal.is_empty());
        assert_eq!(journal.store.storage().get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn summary_alone_is_enough() {
        let mut journal = journal();
        let submitted = journal.submit(day(2024, 1, 1), Items::default(), " rainy ").unwrap();
        let entry = journal.entry_for(&"2024-01-01".into()).unwrap();
        assert_eq!(&submitted, entry);
        assert_eq!(entry.summary, "rainy");
        assert_eq!(entry.gratitude_count(), 0);
    }

    #[test]
    fn submit_trims_and_persists() {
        let mut journal = journal();
        journal
            .submit(day(2024, 1, 1), items(" coffee ", "", "friends"), "good")
            .unwrap();

        let reloaded = Journal::with_store(EntryStore::new(
            journal.store.storage().clone(),
            DEFAULT_STORAGE_KEY,
        ));
        let entry = reloaded.entry_for(&"2024-01-01".into()).unwrap();
        assert_eq!(entry.items, items("coffee", "", "friends"));
    }

    #[test]
    fn same_day_resubmission_replaces() {
        let mut journal = journal();
        let today = day(2024, 1, 2);
        journal.submit(today, items("a", "b", "c"), "first").unwrap();
        let replaced = journal.submit(today, items(" d ", "", ""), "").unwrap();
        assert_eq!(replaced.items, items("d", "", ""));

        assert_eq!(journal.entries().len(), 1);
        let entry = journal.entry_for(&today.into()).unwrap();
        assert_eq!(entry.items, items("d", "", ""));
        assert_eq!(entry.summary, "");
        assert_eq!(journal.stats(today).total_gratitudes, 1);
    }

    #[test]
    fn stats_and_history_follow_mutations() {
        let mut journal = journal();
        let today = day(2024, 1, 10);
        for back in 0..3u64 {
            let date = today - chrono::Days::new(back);
            journal.submit(date, items("x", "y", ""), "").unwrap();
        }

        let stats = journal.stats(today);
        assert_eq!((stats.days, stats.total_gratitudes, stats.streak), (3, 6, 3));
        assert_eq!(journal.history(HistoryRange::Days(2), today).len(), 2);

        journal.clear().unwrap();
        assert_eq!(journal.stats(today), Stats::default());
        assert!(journal.history(HistoryRange::All, today).is_empty());
        journal.clear().unwrap();
        assert!(journal.is_empty());
    }

    #[test]
    fn configured_walk_limit_applies() {
        let mut journal = journal().streak_walk_limit(2);
        let today = day(2024, 1, 10);
        for back in 0..5u64 {
            journal
                .submit(today - chrono::Days::new(back), items("x", "", ""), "")
                .unwrap();
        }
        assert_eq!(journal.stats(today).streak, 2);
    }
}
