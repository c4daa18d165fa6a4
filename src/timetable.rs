//! Daily timetable document from the schedule data collaborator.
//!
//! Prayer times are never computed here; a pre-computed timetable arrives
//! as a TOML document (written by whatever fetches or generates it) and is
//! validated into a [`Schedule`]. The method and timezone labels are opaque
//! strings, carried for display only.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::schedule::{Schedule, ScheduleError, ScheduleEvent};

/// The five daily prayers, in canonical order.
pub const PRAYER_NAMES: [&str; 5] = ["Fajr", "Dhuhr", "Asr", "Maghrib", "Isha"];

#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("failed to read timetable: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse timetable: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Timetable {
    /// Calendar date the times apply to, e.g. "2026-08-07".
    pub date: String,
    /// Calculation-method label, e.g. "Islamic Society of North America".
    pub method: String,
    /// Timezone label, e.g. "Europe/London".
    pub timezone: String,
    pub times: PrayerTimes,
}

/// The day's times as 24-hour "HH:MM" strings.
#[derive(Debug, Clone, Deserialize)]
pub struct PrayerTimes {
    pub fajr: String,
    /// Informational only; sunrise is not a schedule event.
    pub sunrise: Option<String>,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

impl Timetable {
    pub fn load(path: &Path) -> Result<Self, TimetableError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validate the five prayer times into an evaluable schedule.
    pub fn schedule(&self) -> Result<Schedule, ScheduleError> {
        let times = &self.times;
        Schedule::new(vec![
            ScheduleEvent::new(PRAYER_NAMES[0], &times.fajr)?,
            ScheduleEvent::new(PRAYER_NAMES[1], &times.dhuhr)?,
            ScheduleEvent::new(PRAYER_NAMES[2], &times.asr)?,
            ScheduleEvent::new(PRAYER_NAMES[3], &times.maghrib)?,
            ScheduleEvent::new(PRAYER_NAMES[4], &times.isha)?,
        ])
    }
}
