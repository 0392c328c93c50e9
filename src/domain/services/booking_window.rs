use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::domain::models::booking_policy::BookingPolicy;
use crate::domain::models::schedule::WeekSchedule;
use crate::domain::models::schedule_override::ScheduleOverride;

/// Calendar dates a public booker may pick, in the owner's timezone, from the
/// notice threshold to the look-ahead horizon.
///
/// A date is offered when an override opens it, or when no override exists
/// and its weekday is open with at least one interval. The list may include
/// dates whose slots are all taken or inside the notice window; the slot
/// calculator is the final authority per date.
pub fn bookable_dates(
    policy: &BookingPolicy,
    week: &WeekSchedule,
    overrides: &[ScheduleOverride],
    reference_now: DateTime<Utc>,
) -> Vec<NaiveDate> {
    let tz: Tz = policy.tz();

    let earliest = (reference_now + Duration::hours(policy.min_booking_notice_hours as i64))
        .with_timezone(&tz)
        .date_naive();
    let latest = (reference_now + Duration::days(policy.max_booking_days_ahead as i64))
        .with_timezone(&tz)
        .date_naive();

    let mut dates = Vec::new();
    let mut current = earliest;

    while current <= latest {
        let open = match overrides.iter().find(|o| o.date == current) {
            Some(rule) if rule.is_closed => false,
            Some(rule) => match rule.hours() {
                Some(hours) => !hours.is_empty(),
                None => weekday_is_open(week, current),
            },
            None => weekday_is_open(week, current),
        };

        if open {
            dates.push(current);
        }
        current += Duration::days(1);
    }

    dates
}

fn weekday_is_open(week: &WeekSchedule, date: NaiveDate) -> bool {
    let day = week.for_weekday(date.weekday());
    day.is_open && !day.intervals.is_empty()
}
