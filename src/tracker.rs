use std::time::Duration;

use thiserror::Error;

use crate::position::Position;
use crate::qibla::{self, QiblaBearing};

/// Failure modes the location collaborator surfaces to the core.
/// Retry is the caller's policy, never handled here.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location access denied: {0}")]
    PermissionDenied(String),
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("location request timed out after {0:?}")]
    Timeout(Duration),
    #[error("unknown location error: {0}")]
    Unknown(String),
}

/// Latest GPS fix plus signal quality. Each update replaces the previous
/// value wholesale; no history is kept.
pub struct LocationTracker {
    current_position: Option<Position>,
    num_satellites: Option<u32>,
    hdop: Option<f32>,
}

impl LocationTracker {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            current_position: None,
            num_satellites: None,
            hdop: None,
        }
    }

    pub fn current_position(&self) -> Option<Position> {
        self.current_position
    }

    pub fn update_position(&mut self, lat: f64, lon: f64) {
        self.current_position = Some(Position::new(lat, lon));
    }

    pub fn has_fix(&self) -> bool {
        self.current_position.is_some()
    }

    pub fn num_satellites(&self) -> Option<u32> {
        self.num_satellites
    }

    pub fn update_satellites(&mut self, num_sats: u32) {
        self.num_satellites = Some(num_sats);
    }

    pub fn hdop(&self) -> Option<f32> {
        self.hdop
    }

    pub fn update_hdop(&mut self, hdop: f32) {
        self.hdop = Some(hdop);
    }

    /// Bearing and distance to the Kaaba from the current fix.
    pub fn qibla(&self) -> Option<QiblaBearing> {
        self.current_position.map(qibla::from_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_initialization() {
        let tracker = LocationTracker::new();
        assert!(!tracker.has_fix());
        assert!(tracker.current_position().is_none());
        assert!(tracker.num_satellites().is_none());
        assert!(tracker.hdop().is_none());
        assert!(tracker.qibla().is_none());
    }

    #[test]
    fn test_tracker_updates() {
        let mut tracker = LocationTracker::new();

        tracker.update_position(51.5074, -0.1278);
        assert!(tracker.has_fix());

        tracker.update_satellites(8);
        assert_eq!(tracker.num_satellites(), Some(8));

        tracker.update_hdop(1.03);
        assert_eq!(tracker.hdop(), Some(1.03));
    }

    #[test]
    fn test_qibla_follows_the_fix() {
        let mut tracker = LocationTracker::new();
        tracker.update_position(51.5074, -0.1278);

        let from_london = tracker.qibla().unwrap();
        assert!(from_london.bearing_degrees > 118.0 && from_london.bearing_degrees < 120.0);

        // A replacement fix replaces the derivation too.
        tracker.update_position(21.4225, 39.8262);
        assert_eq!(tracker.qibla().unwrap().distance_km, 0.0);
    }
}
