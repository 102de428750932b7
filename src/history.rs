use std::{convert::Infallible, fmt, str::FromStr};

use chrono::{Days, NaiveDate};

use crate::{date_key::DateKey, entry::Entry};

/// Which slice of history to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    All,
    /// The trailing window of this many days, ending today.
    Days(i64),
}

impl FromStr for HistoryRange {
    type Err = Infallible;

    /// Unrecognised selectors become `Days(0)`, never `All`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(HistoryRange::All);
        }
        let s = s.trim();
        let days = s
            .parse::<i64>()
            .ok()
            .or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(|n| n.trunc() as i64)
            })
            .unwrap_or(0);
        Ok(HistoryRange::Days(days))
    }
}

impl fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryRange::All => f.write_str("all"),
            HistoryRange::Days(n) => write!(f, "{}", n),
        }
    }
}

/// Earliest key inside a trailing window of `days` days ending at `today`.
///
/// Windows of zero or fewer days start tomorrow. `None` means no key can
/// qualify, which only happens when tomorrow is past the end of the calendar.
pub fn cutoff_key(days: i64, today: NaiveDate) -> Option<DateKey> {
    let cutoff = if days <= 0 {
        today.succ_opt()?
    } else {
        today
            .checked_sub_days(Days::new(days.unsigned_abs() - 1))
            .unwrap_or(NaiveDate::MIN)
    };
    Some(DateKey::from_date(cutoff))
}

pub fn filter_by_range(entries: &[Entry], range: HistoryRange, today: NaiveDate) -> Vec<Entry> {
    match range {
        HistoryRange::All => entries.to_vec(),
        HistoryRange::Days(days) => match cutoff_key(days, today) {
            Some(cutoff) => entries
                .iter()
                .filter(|e| e.date >= cutoff)
                .cloned()
                .collect(),
            None => Vec::new(),
        },
    }
}
