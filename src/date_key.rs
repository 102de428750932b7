//! Canonical `YYYY-MM-DD` day keys.
//!
//! Keys are zero-padded so that lexical order is chronological order. Entries,
//! the history cutoff and the streak walk all compare keys as plain strings.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};

pub const KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Key for a local calendar date. Time of day never enters the key.
    pub fn from_date(date: NaiveDate) -> Self {
        DateKey(date.format(KEY_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, KEY_FORMAT).ok()
    }

    /// Human display form, e.g. `2024 年 03 月 05 日`.
    pub fn to_display(&self) -> Result<String> {
        let parts: Vec<&str> = self.0.split('-').collect();
        match parts.as_slice() {
            [y, m, d] => Ok(format!("{} 年 {} 月 {} 日", y, m, d)),
            _ => Err(JournalError::MalformedKey(self.0.clone())),
        }
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey::from_date(date)
    }
}

impl From<&str> for DateKey {
    fn from(raw: &str) -> Self {
        DateKey(raw.to_string())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
