//! Bearing and distance toward the Kaaba.

use std::fmt;

use crate::position::Position;

/// The Kaaba, Mecca. Every bearing in this crate points here; the target is
/// compiled in, not configurable at runtime.
pub const KAABA: Position = Position {
    latitude: 21.4225,
    longitude: 39.8262,
};

/// Derived bearing/distance pair for one observer position. Recomputed
/// whenever the fix changes; never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QiblaBearing {
    /// Degrees in [0, 360), clockwise from true north.
    pub bearing_degrees: f64,
    pub distance_km: f64,
}

impl fmt::Display for QiblaBearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}° ({:.0} km to Mecca)",
            self.bearing_degrees, self.distance_km
        )
    }
}

/// Bearing from the observer to the Kaaba.
pub fn bearing(observer: Position) -> f64 {
    observer.bearing_to(&KAABA)
}

/// Great-circle distance from the observer to the Kaaba.
pub fn distance_km(observer: Position) -> f64 {
    observer.distance_km_to(&KAABA)
}

/// Bearing and distance in one derivation.
pub fn from_position(observer: Position) -> QiblaBearing {
    QiblaBearing {
        bearing_degrees: bearing(observer),
        distance_km: distance_km(observer),
    }
}
