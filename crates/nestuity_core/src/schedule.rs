//! crates/nestuity_core/src/schedule.rs
//!
//! Derives a reminder's range tag from its due date. The classifier never calls
//! this; it exists for adapters whose source leaves `range` unset.

use crate::domain::ReminderRange;
use chrono::{Days, NaiveDate};

/// Days ahead that still count as "this week".
pub const WEEK_WINDOW_DAYS: u64 = 7;
/// Days ahead that still count as "this month".
pub const MONTH_WINDOW_DAYS: u64 = 30;

/// Tags a due date relative to `today`.
///
/// A system-generated reminder counts as completed when it was completed on or
/// after its due date, or completed today. User-created reminders are tagged by
/// due date alone.
pub fn tag_range(
    next_due: NaiveDate,
    completed_on: Option<NaiveDate>,
    user_created: bool,
    today: NaiveDate,
) -> ReminderRange {
    if let Some(completed_on) = completed_on {
        if !user_created && (next_due <= completed_on || completed_on == today) {
            return ReminderRange::Completed;
        }
    }

    if next_due < today {
        ReminderRange::Overdue
    } else if next_due == today {
        ReminderRange::Today
    } else if next_due <= window_end(today, WEEK_WINDOW_DAYS) {
        ReminderRange::UpcomingWeek
    } else if next_due <= window_end(today, MONTH_WINDOW_DAYS) {
        ReminderRange::UpcomingMonth
    } else {
        ReminderRange::Future
    }
}

fn window_end(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}
