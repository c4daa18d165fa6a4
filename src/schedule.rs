//! Daily prayer schedule evaluation.
//!
//! The schedule arrives pre-computed from the timetable collaborator; this
//! module only decides which event is current and which comes next. The
//! current instant is always passed in explicitly, so evaluation is a pure
//! function and tests never touch the system clock.

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

/// The final event's interval closes at 23:59.
const END_OF_DAY_MINUTE: u32 = 23 * 60 + 59;
const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule has no events")]
    Empty,
    #[error("duplicate event name: {0}")]
    DuplicateName(String),
    #[error("two events share the time {0}")]
    DuplicateTime(NaiveTime),
    #[error("malformed time of day {0:?} (expected HH:MM)")]
    BadTime(String),
}

/// A named point in the daily sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEvent {
    pub name: String,
    pub time: NaiveTime,
}

impl ScheduleEvent {
    /// Parse an event from a 24-hour "HH:MM" string.
    pub fn new(name: &str, time: &str) -> Result<Self, ScheduleError> {
        let time = NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|_| ScheduleError::BadTime(time.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            time,
        })
    }

    fn minute(&self) -> u32 {
        minute_of_day(self.time)
    }
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// One day of events, ascending by time of day, uniquely named.
/// Immutable once built; a new day means a new schedule.
#[derive(Debug, Clone)]
pub struct Schedule {
    events: Vec<ScheduleEvent>,
}

impl Schedule {
    /// Sorts the events ascending and enforces the uniqueness invariants.
    /// Violations come from a broken data source and are rejected here,
    /// never silently patched up.
    pub fn new(mut events: Vec<ScheduleEvent>) -> Result<Self, ScheduleError> {
        if events.is_empty() {
            return Err(ScheduleError::Empty);
        }

        events.sort_by_key(ScheduleEvent::minute);

        for pair in events.windows(2) {
            if pair[0].minute() == pair[1].minute() {
                return Err(ScheduleError::DuplicateTime(pair[1].time));
            }
        }
        for (i, event) in events.iter().enumerate() {
            if events[..i].iter().any(|other| other.name == event.name) {
                return Err(ScheduleError::DuplicateName(event.name.clone()));
            }
        }

        Ok(Self { events })
    }

    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    /// Evaluate the schedule at an explicit instant.
    ///
    /// Each event owns the half-open interval up to the next event's time;
    /// the last interval closes at 23:59. Before the first event there is
    /// no current event. When every event has passed, the next one wraps
    /// to tomorrow's first.
    pub fn evaluate(&self, now: NaiveTime) -> ScheduleState {
        let now_minute = minute_of_day(now);

        let mut current = None;
        for (i, event) in self.events.iter().enumerate() {
            let start = event.minute();
            let end = self
                .events
                .get(i + 1)
                .map_or(END_OF_DAY_MINUTE, ScheduleEvent::minute);
            if now_minute >= start && now_minute < end {
                current = Some(event.name.clone());
                break;
            }
        }

        let next = match self.events.iter().find(|e| e.minute() > now_minute) {
            Some(event) => NextEvent {
                name: event.name.clone(),
                time: event.time,
                minutes_remaining: event.minute() - now_minute,
                is_tomorrow: false,
            },
            None => {
                // All of today's events have passed; wrap to tomorrow.
                let first = &self.events[0];
                NextEvent {
                    name: first.name.clone(),
                    time: first.time,
                    minutes_remaining: (MINUTES_PER_DAY - now_minute) + first.minute(),
                    is_tomorrow: true,
                }
            }
        };

        ScheduleState { current, next }
    }
}

/// The upcoming event and how long until it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextEvent {
    pub name: String,
    pub time: NaiveTime,
    pub minutes_remaining: u32,
    pub is_tomorrow: bool,
}

impl NextEvent {
    /// Time remaining for display: "1h 45m", or "45m" under an hour.
    pub fn remaining_label(&self) -> String {
        format_minutes(self.minutes_remaining)
    }
}

/// Result of one evaluation tick. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleState {
    /// Name of the event whose interval contains the instant, if any.
    pub current: Option<String>,
    pub next: NextEvent,
}

pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prayer_schedule() -> Schedule {
        Schedule::new(vec![
            ScheduleEvent::new("Fajr", "05:15").unwrap(),
            ScheduleEvent::new("Dhuhr", "12:30").unwrap(),
            ScheduleEvent::new("Asr", "15:45").unwrap(),
            ScheduleEvent::new("Maghrib", "18:20").unwrap(),
            ScheduleEvent::new("Isha", "19:50").unwrap(),
        ])
        .unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_midafternoon() {
        let state = prayer_schedule().evaluate(at(14, 0));

        assert_eq!(state.current.as_deref(), Some("Dhuhr"));
        assert_eq!(state.next.name, "Asr");
        assert_eq!(state.next.minutes_remaining, 105);
        assert!(!state.next.is_tomorrow);
        assert_eq!(state.next.remaining_label(), "1h 45m");
    }

    #[test]
    fn test_after_last_event_wraps_to_tomorrow() {
        let state = prayer_schedule().evaluate(at(20, 30));

        assert_eq!(state.current.as_deref(), Some("Isha"));
        assert_eq!(state.next.name, "Fajr");
        assert!(state.next.is_tomorrow);
        // (1440 - 1230) + 315
        assert_eq!(state.next.minutes_remaining, 525);
        assert_eq!(state.next.remaining_label(), "8h 45m");
    }

    #[test]
    fn test_before_first_event() {
        let state = prayer_schedule().evaluate(at(4, 0));

        assert_eq!(state.current, None);
        assert_eq!(state.next.name, "Fajr");
        assert!(!state.next.is_tomorrow);
        assert_eq!(state.next.minutes_remaining, 75);
        assert_eq!(state.next.remaining_label(), "1h 15m");
    }

    #[test]
    fn test_exact_event_minute() {
        // At 12:30 exactly, Dhuhr has just begun.
        let state = prayer_schedule().evaluate(at(12, 30));
        assert_eq!(state.current.as_deref(), Some("Dhuhr"));
        assert_eq!(state.next.name, "Asr");
    }

    #[test]
    fn test_last_minute_of_day() {
        // The last interval is half-open and closes at 23:59.
        let state = prayer_schedule().evaluate(at(23, 59));
        assert_eq!(state.current, None);
        assert!(state.next.is_tomorrow);
        assert_eq!(state.next.minutes_remaining, 1 + 315);
    }

    #[test]
    fn test_single_event_schedule() {
        let schedule =
            Schedule::new(vec![ScheduleEvent::new("Dhuhr", "12:30").unwrap()]).unwrap();

        let before = schedule.evaluate(at(9, 0));
        assert_eq!(before.current, None);
        assert_eq!(before.next.name, "Dhuhr");
        assert!(!before.next.is_tomorrow);

        let after = schedule.evaluate(at(13, 0));
        assert_eq!(after.current.as_deref(), Some("Dhuhr"));
        assert_eq!(after.next.name, "Dhuhr");
        assert!(after.next.is_tomorrow);
        assert_eq!(after.next.minutes_remaining, (1440 - 780) + 750);
    }

    #[test]
    fn test_events_sorted_on_construction() {
        let schedule = Schedule::new(vec![
            ScheduleEvent::new("Isha", "19:50").unwrap(),
            ScheduleEvent::new("Fajr", "05:15").unwrap(),
            ScheduleEvent::new("Dhuhr", "12:30").unwrap(),
        ])
        .unwrap();

        let names: Vec<&str> = schedule.events().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Fajr", "Dhuhr", "Isha"]);
    }

    #[test]
    fn test_construction_rejects_invariant_violations() {
        assert_eq!(Schedule::new(vec![]).unwrap_err(), ScheduleError::Empty);

        let duplicate_name = Schedule::new(vec![
            ScheduleEvent::new("Fajr", "05:15").unwrap(),
            ScheduleEvent::new("Fajr", "12:30").unwrap(),
        ]);
        assert_eq!(
            duplicate_name.unwrap_err(),
            ScheduleError::DuplicateName("Fajr".to_string())
        );

        let duplicate_time = Schedule::new(vec![
            ScheduleEvent::new("Fajr", "05:15").unwrap(),
            ScheduleEvent::new("Dhuhr", "05:15").unwrap(),
        ]);
        assert_eq!(
            duplicate_time.unwrap_err(),
            ScheduleError::DuplicateTime(at(5, 15))
        );
    }

    #[test]
    fn test_malformed_time_rejected() {
        assert_eq!(
            ScheduleEvent::new("Fajr", "25:99").unwrap_err(),
            ScheduleError::BadTime("25:99".to_string())
        );
        assert!(ScheduleEvent::new("Fajr", "515").is_err());
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(60), "1h 0m");
        assert_eq!(format_minutes(105), "1h 45m");
        assert_eq!(format_minutes(525), "8h 45m");
        assert_eq!(format_minutes(0), "0m");
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let schedule = prayer_schedule();
        let now = at(14, 0);
        assert_eq!(schedule.evaluate(now), schedule.evaluate(now));
    }
}
