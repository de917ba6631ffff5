use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Schema version written into every exported dataset
pub const DATASET_VERSION: &str = "1.0";

/// Status given to a schedule entry when the caller does not supply one
pub const DEFAULT_ENTRY_STATUS: &str = "confirmed";

/// Color given to an employee stored or created without one
pub const DEFAULT_EMPLOYEE_COLOR: &str = "#3498db";

/// Color given to a shift stored or created without one
pub const DEFAULT_SHIFT_COLOR: &str = "#2ecc71";

/// A physical store location. Seeded stores use stable slugs ("store1".."store9"),
/// stores added later get a generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// Display color (CSS hex), only used by renderers
    #[serde(default = "default_employee_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A named working window. Times are zero-padded 24-hour "HH:MM" strings,
/// so `start_time < end_time` holds lexicographically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_shift_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Shift {
    /// Length of the shift, or None if either time is not a valid "HH:MM" value
    pub fn duration(&self) -> Option<ShiftDuration> {
        ShiftDuration::between(&self.start_time, &self.end_time)
    }
}

/// Hours and minutes between a shift's start and end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDuration {
    pub hours: u32,
    pub minutes: u32,
}

impl ShiftDuration {
    /// Compute the duration between two "HH:MM" times on the same day.
    /// Returns None when a time is malformed or the end is not after the start.
    pub fn between(start_time: &str, end_time: &str) -> Option<Self> {
        let start = minutes_since_midnight(start_time)?;
        let end = minutes_since_midnight(end_time)?;
        if end <= start {
            return None;
        }
        let diff = end - start;
        Some(Self {
            hours: diff / 60,
            minutes: diff % 60,
        })
    }

    pub fn total_minutes(&self) -> u32 {
        self.hours * 60 + self.minutes
    }
}

impl fmt::Display for ShiftDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minutes > 0 {
            write!(f, "{}h {}m", self.hours, self.minutes)
        } else {
            write!(f, "{}h", self.hours)
        }
    }
}

/// Parse a strict zero-padded "HH:MM" time into minutes since midnight
pub fn minutes_since_midnight(time: &str) -> Option<u32> {
    let bytes = time.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let hours: u32 = time[0..2].parse().ok()?;
    let minutes: u32 = time[3..5].parse().ok()?;
    if !time[0..2].bytes().all(|b| b.is_ascii_digit()) || !time[3..5].bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// One assignment of an employee to a shift at a store. The owning date is the
/// key this entry is stored under in the `Schedule` mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub store_id: String,
    pub shift_id: String,
    pub employee_id: String,
    #[serde(default = "default_entry_status")]
    pub status: String,
}

fn default_entry_status() -> String {
    DEFAULT_ENTRY_STATUS.to_string()
}

fn default_employee_color() -> String {
    DEFAULT_EMPLOYEE_COLOR.to_string()
}

fn default_shift_color() -> String {
    DEFAULT_SHIFT_COLOR.to_string()
}

/// Date key ("YYYY-MM-DD") to the entries on that date, in insertion order
pub type Schedule = BTreeMap<String, Vec<ScheduleEntry>>;

/// The full exported document: the unit of import/export and of backup comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub employees: Vec<Employee>,
    pub shifts: Vec<Shift>,
    pub schedules: Schedule,
    pub stores: Vec<Store>,
}

/// Store selection for schedule queries. Serialized as the store id, or the
/// sentinel "all" for no filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreFilter {
    #[default]
    All,
    Store(String),
}

impl StoreFilter {
    pub const ALL_SENTINEL: &'static str = "all";

    pub fn matches(&self, store_id: &str) -> bool {
        match self {
            StoreFilter::All => true,
            StoreFilter::Store(id) => id == store_id,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StoreFilter::All => Self::ALL_SENTINEL,
            StoreFilter::Store(id) => id,
        }
    }
}

impl From<&str> for StoreFilter {
    fn from(value: &str) -> Self {
        if value == Self::ALL_SENTINEL {
            StoreFilter::All
        } else {
            StoreFilter::Store(value.to_string())
        }
    }
}

impl FromStr for StoreFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(StoreFilter::from(s))
    }
}

impl fmt::Display for StoreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StoreFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StoreFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(StoreFilter::from(value.as_str()))
    }
}

/// A schedule entry joined with the entities it references, ready for display.
/// The store is optional because renderers still show an entry whose store was deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub date: String,
    pub entry: ScheduleEntry,
    pub shift: Shift,
    pub employee: Employee,
    pub store: Option<Store>,
}
