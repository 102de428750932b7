use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::{date_key::DateKey, entry::Entry};

/// Upper bound on how many days the streak walk inspects.
pub const DEFAULT_STREAK_WALK_LIMIT: u32 = 100_000;

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub days: usize,
    pub total_gratitudes: usize,
    pub streak: u32,
}

pub fn compute_stats(entries: &[Entry], today: NaiveDate) -> Stats {
    compute_stats_capped(entries, today, DEFAULT_STREAK_WALK_LIMIT)
}

pub fn compute_stats_capped(entries: &[Entry], today: NaiveDate, walk_limit: u32) -> Stats {
    if entries.is_empty() {
        return Stats::default();
    }

    Stats {
        days: entries.len(),
        total_gratitudes: entries.iter().map(Entry::gratitude_count).sum(),
        streak: streak(entries, today, walk_limit),
    }
}

/// Consecutive days ending at `today` that have an entry. Zero if today has none.
pub fn streak(entries: &[Entry], today: NaiveDate, walk_limit: u32) -> u32 {
    let recorded: HashSet<&str> = entries.iter().map(|e| e.date.as_str()).collect();

    let mut streak = 0;
    let mut cursor = Some(today);
    while let Some(day) = cursor {
        if streak >= walk_limit {
            debug!(walk_limit, "streak walk hit its limit");
            break;
        }
        if !recorded.contains(DateKey::from_date(day).as_str()) {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}
