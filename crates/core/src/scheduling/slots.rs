//! Candidate slot generation.
//!
//! Pure functions: deterministic, side-effect free, safe to recompute on
//! every request.

use chairside_domain::constants::{SLOT_CATALOG_BLOCKS, SLOT_GRANULARITY_MINUTES};
use chairside_domain::ProviderCalendar;
use chrono::{Duration, NaiveDate, NaiveTime};

/// The fixed catalog of intraday slot start times, ascending.
///
/// Enumerates every granularity step inside each catalog block. The catalog
/// is the universe of bookable times; a provider's calendar narrows it.
pub fn catalog_slots() -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    for (start_hour, end_hour) in SLOT_CATALOG_BLOCKS {
        let mut minutes = start_hour * 60;
        while minutes + SLOT_GRANULARITY_MINUTES <= end_hour * 60 {
            if let Some(time) = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0) {
                slots.push(time);
            }
            minutes += SLOT_GRANULARITY_MINUTES;
        }
    }
    slots
}

/// Whether `time` starts a slot that fits entirely inside the calendar's
/// half-open working window: `work_start <= time` and
/// `time + granularity <= work_end`.
pub fn in_working_window(calendar: &ProviderCalendar, time: NaiveTime) -> bool {
    let granularity = Duration::minutes(i64::from(SLOT_GRANULARITY_MINUTES));
    let (slot_end, wrapped) = time.overflowing_add_signed(granularity);
    // A slot that wraps past midnight can never fit a same-day window.
    if wrapped != 0 {
        return false;
    }
    calendar.work_start <= time && slot_end <= calendar.work_end
}

/// Candidate slot start times for `calendar` on `date`, ascending.
///
/// Empty if the provider does not work that weekday; otherwise the catalog
/// filtered to the calendar's working window. Occupancy is not considered
/// here; the availability resolver subtracts it.
pub fn candidate_slots(calendar: &ProviderCalendar, date: NaiveDate) -> Vec<NaiveTime> {
    if !calendar.works_on(date) {
        return Vec::new();
    }
    catalog_slots().into_iter().filter(|time| in_working_window(calendar, *time)).collect()
}
