//! Calendar logic for the weekly schedule view.
//!
//! Weeks start on Monday. Dates are keyed as canonical `YYYY-MM-DD` strings,
//! the only form the schedule index accepts.

use chrono::{Datelike, Duration, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use shared::StoreFilter;

use crate::error::{Result, SchedulerError};

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// The Monday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Seven consecutive dates beginning at `week_start`
pub fn week_dates(week_start: NaiveDate) -> Vec<NaiveDate> {
    (0..7).map(|offset| week_start + Duration::days(offset)).collect()
}

pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a canonical date key. Non-padded or otherwise non-canonical forms
/// ("2024-6-1") are rejected so every key round-trips unchanged.
pub fn parse_date_key(text: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(text, DATE_KEY_FORMAT)
        .map_err(|e| SchedulerError::validation(format!("Invalid date '{text}': {e}")))?;
    if format_date_key(date) != text {
        return Err(SchedulerError::validation(format!(
            "Invalid date '{text}': expected YYYY-MM-DD"
        )));
    }
    Ok(date)
}

/// Session state of a weekly schedule screen: which week and which store.
/// Owned by the caller and passed around explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub week_start: NaiveDate,
    pub store_filter: StoreFilter,
}

impl ScheduleView {
    /// The week containing `today`, all stores
    pub fn new(today: NaiveDate) -> Self {
        Self {
            week_start: week_start(today),
            store_filter: StoreFilter::All,
        }
    }

    pub fn previous_week(&mut self) {
        self.week_start -= Duration::days(7);
        debug!("🗓️ Moved to week of {}", self.week_start);
    }

    pub fn next_week(&mut self) {
        self.week_start += Duration::days(7);
        debug!("🗓️ Moved to week of {}", self.week_start);
    }

    /// Jump back to the week containing `today`
    pub fn go_to(&mut self, today: NaiveDate) {
        self.week_start = week_start(today);
    }

    pub fn switch_store(&mut self, filter: StoreFilter) {
        debug!("🗓️ Store filter set to {}", filter);
        self.store_filter = filter;
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        week_dates(self.week_start)
    }

    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Duration::days(6)
    }
}
