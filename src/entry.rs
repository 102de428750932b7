use serde::{Deserialize, Deserializer, Serialize};

use crate::date_key::DateKey;

pub const ITEM_SLOTS: usize = 3;

pub type Items = [String; ITEM_SLOTS];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub date: DateKey,
    #[serde(default, deserialize_with = "item_slots")]
    pub items: Items,
    #[serde(default, deserialize_with = "optional_text")]
    pub summary: String,
}

/// Fields to lay over an entry. `None` keeps whatever the entry already has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub items: Option<Items>,
    pub summary: Option<String>,
}

impl EntryPatch {
    pub fn full(items: Items, summary: impl Into<String>) -> Self {
        EntryPatch {
            items: Some(items),
            summary: Some(summary.into()),
        }
    }
}

impl Entry {
    pub fn new(date: DateKey) -> Self {
        Entry {
            date,
            items: Default::default(),
            summary: String::new(),
        }
    }

    fn apply(&mut self, patch: EntryPatch) {
        if let Some(items) = patch.items {
            self.items = items;
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
    }

    /// Items holding something other than whitespace, in slot order.
    pub fn filled_items(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .map(String::as_str)
            .filter(|item| !item.trim().is_empty())
    }

    pub fn gratitude_count(&self) -> usize {
        self.filled_items().count()
    }

    pub fn summary_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        if self.summary.is_empty() {
            placeholder
        } else {
            &self.summary
        }
    }
}

// Older or hand-edited blobs may hold fewer slots, or nulls in them.
fn item_slots<'de, D>(deserializer: D) -> Result<Items, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    let mut items = Items::default();
    for (slot, value) in items.iter_mut().zip(raw.unwrap_or_default()) {
        *slot = value.unwrap_or_default();
    }
    Ok(items)
}

fn optional_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Merge `patch` into the entry for `date`, inserting one if needed.
///
/// The input is left untouched; the returned collection is sorted newest first
/// and holds at most one entry per date.
pub fn upsert(entries: &[Entry], date: &DateKey, patch: EntryPatch) -> Vec<Entry> {
    let mut updated = entries.to_vec();
    match updated.iter_mut().find(|e| &e.date == date) {
        Some(existing) => existing.apply(patch),
        None => {
            let mut entry = Entry::new(date.clone());
            entry.apply(patch);
            updated.push(entry);
        }
    }
    updated.sort_by(|a, b| b.date.cmp(&a.date));
    updated
}
