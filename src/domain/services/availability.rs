use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::models::appointment::{Appointment, AppointmentStatus};
use crate::domain::models::appointment_type::AppointmentType;
use crate::domain::models::booking_policy::BookingPolicy;
use crate::domain::models::schedule::{TimeInterval, WeekSchedule};
use crate::domain::models::schedule_override::ScheduleOverride;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Computes the bookable start times of one appointment type on one date.
///
/// Candidates are walked in steps of the service duration (buffers are not
/// part of the step, so back-to-back appointments of the same type stay
/// aligned), then filtered against existing blocked intervals, the notice /
/// look-ahead bounds of the policy and the per-day cap. Wall-clock times that
/// do not exist in the owner's timezone (DST gaps) are skipped.
pub fn calculate_slots(
    appointment_type: &AppointmentType,
    policy: &BookingPolicy,
    week: &WeekSchedule,
    override_rule: Option<&ScheduleOverride>,
    existing: &[Appointment],
    date: NaiveDate,
    reference_now: DateTime<Utc>,
) -> Vec<TimeSlot> {
    let tz: Tz = policy.tz();

    let duration_min = appointment_type.duration_minutes;
    if duration_min <= 0 {
        return Vec::new();
    }

    if let Some(cap) = appointment_type.max_per_day {
        let booked_today = existing
            .iter()
            .filter(|a| {
                a.appointment_type_id == appointment_type.id
                    && a.deleted_at.is_none()
                    && a.status != AppointmentStatus::Cancelled
                    && a.start_datetime.with_timezone(&tz).date_naive() == date
            })
            .count();

        if booked_today as i32 >= cap {
            return Vec::new();
        }
    }

    let Some(windows) = open_intervals(week, override_rule, date) else {
        return Vec::new();
    };

    let earliest = reference_now + Duration::hours(policy.min_booking_notice_hours as i64);
    let latest = reference_now + Duration::days(policy.max_booking_days_ahead as i64);

    let occupied: Vec<(DateTime<Utc>, DateTime<Utc>)> = existing
        .iter()
        .filter(|a| a.occupies_calendar())
        .map(|a| (a.blocked_from, a.blocked_until))
        .collect();

    let step = duration_min as u32;
    let buffer_before = Duration::minutes(appointment_type.buffer_before_minutes as i64);
    let buffer_after = Duration::minutes(appointment_type.buffer_after_minutes as i64);

    let mut slots = Vec::new();

    for window in &windows {
        let Some((start_min, end_min)) = window.minute_bounds() else {
            continue;
        };

        let mut cursor = start_min;
        while cursor + step <= end_min {
            let hour = cursor / 60;
            let minute = cursor % 60;

            if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
                if let Some(local_start) = tz.from_local_datetime(&date.and_time(time)).single() {
                    let start = local_start.with_timezone(&Utc);
                    let end = start + Duration::minutes(duration_min as i64);

                    let footprint_from = start - buffer_before;
                    let footprint_until = end + buffer_after;

                    let blocked = occupied
                        .iter()
                        .any(|(from, until)| *from < footprint_until && *until > footprint_from);

                    if !blocked && start >= earliest && start <= latest {
                        slots.push(TimeSlot { start, end });
                    }
                }
            }
            cursor += step;
        }
    }

    slots.sort_by_key(|s| s.start);
    slots.dedup_by_key(|s| s.start);
    slots
}

/// The open intervals that apply on `date`: an override wins over the weekly
/// schedule; `None` means the date is closed.
fn open_intervals(
    week: &WeekSchedule,
    override_rule: Option<&ScheduleOverride>,
    date: NaiveDate,
) -> Option<Vec<TimeInterval>> {
    use chrono::Datelike;

    if let Some(rule) = override_rule {
        if rule.is_closed {
            return None;
        }
        if let Some(hours) = rule.hours() {
            if hours.is_empty() {
                return None;
            }
            return Some(hours);
        }
    }

    let day = week.for_weekday(date.weekday());
    if !day.is_open || day.intervals.is_empty() {
        return None;
    }
    Some(day.intervals.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::appointment::{
        Appointment, AppointmentStatus, NewAppointmentParams, BOOKED_VIA_PUBLIC,
    };
    use crate::domain::models::appointment_type::NewAppointmentTypeParams;
    use crate::domain::models::schedule::DayHours;

    fn test_type(duration: i32, before: i32, after: i32) -> AppointmentType {
        AppointmentType::new(NewAppointmentTypeParams {
            owner_id: "owner-1".into(),
            name: "Consultation".into(),
            duration_minutes: duration,
            buffer_before_minutes: before,
            buffer_after_minutes: after,
            price_cents: 0,
            max_per_day: None,
            require_phone: false,
            require_company: false,
            sort_order: 0,
        })
    }

    fn test_policy(notice_hours: i32, days_ahead: i32, timezone: &str) -> BookingPolicy {
        let mut policy = BookingPolicy::new("owner-1".into(), "owner-1-slug".into(), Some(timezone.into()));
        policy.min_booking_notice_hours = notice_hours;
        policy.max_booking_days_ahead = days_ahead;
        policy
    }

    fn monday_morning_week() -> WeekSchedule {
        WeekSchedule {
            monday: DayHours {
                is_open: true,
                intervals: vec![TimeInterval { start: "09:00".into(), end: "12:00".into() }],
            },
            ..WeekSchedule::default()
        }
    }

    fn appointment_at(
        appointment_type: &AppointmentType,
        start: DateTime<Utc>,
        status: AppointmentStatus,
    ) -> Appointment {
        let mut appt = Appointment::new(NewAppointmentParams {
            owner_id: "owner-1".into(),
            appointment_type_id: appointment_type.id.clone(),
            start,
            duration_minutes: appointment_type.duration_minutes,
            buffer_before_minutes: appointment_type.buffer_before_minutes,
            buffer_after_minutes: appointment_type.buffer_after_minutes,
            attendee_name: "Test".into(),
            attendee_email: "test@example.com".into(),
            attendee_phone: None,
            attendee_company: None,
            notes: None,
            booked_via: BOOKED_VIA_PUBLIC.into(),
        });
        appt.status = status;
        appt
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    // 2026-01-05 is a Monday.
    const MONDAY: (i32, u32, u32) = (2026, 1, 5);

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(MONDAY.0, MONDAY.1, MONDAY.2).unwrap()
    }

    #[test]
    fn test_walks_interval_in_duration_steps() {
        let at = test_type(30, 0, 0);
        let policy = test_policy(1, 30, "UTC");
        let now = utc(2026, 1, 5, 8, 0);

        let slots = calculate_slots(&at, &policy, &monday_morning_week(), None, &[], monday(), now);

        let starts: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start).collect();
        assert_eq!(
            starts,
            vec![
                utc(2026, 1, 5, 9, 0),
                utc(2026, 1, 5, 9, 30),
                utc(2026, 1, 5, 10, 0),
                utc(2026, 1, 5, 10, 30),
                utc(2026, 1, 5, 11, 0),
                utc(2026, 1, 5, 11, 30),
            ]
        );
        // 11:30 + 30min = close; a 12:00 start would spill past the window.
        assert_eq!(slots.last().unwrap().end, utc(2026, 1, 5, 12, 0));
    }

    #[test]
    fn test_notice_threshold_is_inclusive() {
        let at = test_type(30, 0, 0);
        let policy = test_policy(1, 30, "UTC");
        // 08:45 + 1h notice = 09:45, so 09:00 and 09:30 fall away.
        let now = utc(2026, 1, 5, 8, 45);

        let slots = calculate_slots(&at, &policy, &monday_morning_week(), None, &[], monday(), now);

        let starts: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start).collect();
        assert_eq!(
            starts,
            vec![
                utc(2026, 1, 5, 10, 0),
                utc(2026, 1, 5, 10, 30),
                utc(2026, 1, 5, 11, 0),
                utc(2026, 1, 5, 11, 30),
            ]
        );
    }

    #[test]
    fn test_occupied_footprint_excludes_candidates() {
        let at = test_type(30, 0, 15);
        let policy = test_policy(0, 30, "UTC");
        let now = utc(2026, 1, 5, 0, 0);

        // Booked 10:00-10:30, blocked until 10:45 by the after-buffer.
        let existing = vec![appointment_at(&at, utc(2026, 1, 5, 10, 0), AppointmentStatus::Scheduled)];

        let slots = calculate_slots(&at, &policy, &monday_morning_week(), None, &existing, monday(), now);
        let starts: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start).collect();

        // 09:30's footprint runs to 10:15 and 10:30's starts inside the
        // blocked interval, so only 09:00, 11:00 and 11:30 survive.
        assert_eq!(
            starts,
            vec![utc(2026, 1, 5, 9, 0), utc(2026, 1, 5, 11, 0), utc(2026, 1, 5, 11, 30)]
        );
    }

    #[test]
    fn test_cancelled_appointment_releases_slot() {
        let at = test_type(30, 0, 0);
        let policy = test_policy(0, 30, "UTC");
        let now = utc(2026, 1, 5, 0, 0);

        let existing = vec![appointment_at(&at, utc(2026, 1, 5, 10, 0), AppointmentStatus::Cancelled)];

        let slots = calculate_slots(&at, &policy, &monday_morning_week(), None, &existing, monday(), now);
        assert!(slots.iter().any(|s| s.start == utc(2026, 1, 5, 10, 0)));
    }

    #[test]
    fn test_max_per_day_short_circuits() {
        let mut at = test_type(30, 0, 0);
        at.max_per_day = Some(2);
        let policy = test_policy(0, 30, "UTC");
        let now = utc(2026, 1, 5, 0, 0);

        // Two non-cancelled appointments of the type on the date; a completed
        // one still counts against the cap.
        let existing = vec![
            appointment_at(&at, utc(2026, 1, 5, 9, 0), AppointmentStatus::Completed),
            appointment_at(&at, utc(2026, 1, 5, 10, 0), AppointmentStatus::Scheduled),
        ];

        let slots = calculate_slots(&at, &policy, &monday_morning_week(), None, &existing, monday(), now);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_closed_override_yields_empty() {
        let at = test_type(30, 0, 0);
        let policy = test_policy(0, 30, "UTC");
        let now = utc(2026, 1, 5, 0, 0);

        let rule = ScheduleOverride::new("owner-1".into(), monday(), true, None);
        let slots = calculate_slots(&at, &policy, &monday_morning_week(), Some(&rule), &[], monday(), now);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_override_hours_replace_weekly_hours() {
        let at = test_type(60, 0, 0);
        let policy = test_policy(0, 30, "UTC");
        let now = utc(2026, 1, 5, 0, 0);

        let replacement = [TimeInterval { start: "13:00".into(), end: "15:00".into() }];
        let rule = ScheduleOverride::new("owner-1".into(), monday(), false, Some(&replacement));

        let slots = calculate_slots(&at, &policy, &monday_morning_week(), Some(&rule), &[], monday(), now);
        let starts: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![utc(2026, 1, 5, 13, 0), utc(2026, 1, 5, 14, 0)]);
    }

    #[test]
    fn test_dst_gap_skips_nonexistent_times() {
        let at = test_type(60, 0, 0);
        let policy = test_policy(0, 365, "Europe/Berlin");
        let now = utc(2026, 3, 1, 0, 0);

        // Berlin springs forward on 2026-03-29: 02:00 local does not exist.
        let week = WeekSchedule {
            sunday: DayHours {
                is_open: true,
                intervals: vec![TimeInterval { start: "01:00".into(), end: "05:00".into() }],
            },
            ..WeekSchedule::default()
        };
        let date = NaiveDate::from_ymd_opt(2026, 3, 29).unwrap();

        let slots = calculate_slots(&at, &policy, &week, None, &[], date, now);
        let starts: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start).collect();

        // 01:00 CET, then 03:00 and 04:00 CEST; the 02:00 candidate vanishes.
        assert_eq!(
            starts,
            vec![utc(2026, 3, 29, 0, 0), utc(2026, 3, 29, 1, 0), utc(2026, 3, 29, 2, 0)]
        );
    }

    #[test]
    fn test_recomputation_is_order_stable() {
        let at = test_type(30, 5, 5);
        let policy = test_policy(0, 30, "UTC");
        let now = utc(2026, 1, 5, 0, 0);

        let first = calculate_slots(&at, &policy, &monday_morning_week(), None, &[], monday(), now);
        let second = calculate_slots(&at, &policy, &monday_morning_week(), None, &[], monday(), now);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|pair| pair[0].start < pair[1].start));
    }
}
