//! Provider calendar: recurring weekly availability.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ScheduleError;

/// A provider's recurring weekly availability window.
///
/// One calendar per provider, upsert semantics. Absence of a calendar means
/// the provider has no availability at all, not unrestricted availability: a
/// provider must explicitly configure hours before being bookable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCalendar {
    pub provider_id: Uuid,
    pub working_days: Vec<Weekday>,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    /// Scopes service-catalog price lookups.
    pub specialty: Option<String>,
}

impl ProviderCalendar {
    /// Check the calendar invariants: a non-empty, duplicate-free set of
    /// working days and `work_start < work_end`.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.working_days.is_empty() {
            return Err(ScheduleError::InvalidCalendar("working days must not be empty".into()));
        }
        for (i, day) in self.working_days.iter().enumerate() {
            if self.working_days[..i].contains(day) {
                return Err(ScheduleError::InvalidCalendar(format!(
                    "duplicate working day: {}",
                    day_name(*day)
                )));
            }
        }
        if self.work_start >= self.work_end {
            return Err(ScheduleError::InvalidCalendar(
                "work_start must be before work_end".into(),
            ));
        }
        Ok(())
    }

    /// Whether the provider works on the weekday of `date`.
    ///
    /// Uses the proleptic Gregorian weekday of the date; pure.
    pub fn works_on(&self, date: NaiveDate) -> bool {
        self.working_days.contains(&date.weekday())
    }

    /// The calendar's working days as a comma-joined day-name string, the
    /// storage format inherited from the clinic's provider records.
    pub fn working_days_string(&self) -> String {
        self.working_days.iter().map(|d| day_name(*d)).collect::<Vec<_>>().join(",")
    }

    /// Parse a comma-joined day-name string back into working days.
    /// Unknown day names are reported, not skipped.
    pub fn parse_working_days(raw: &str) -> Result<Vec<Weekday>, String> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<Weekday>().map_err(|_| format!("unknown weekday: {part}")))
            .collect()
    }
}

/// Full English name for a weekday, matching the stored calendar format.
pub const fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
