//! Labels a numeric bearing with a 16-point compass rose direction.

use std::fmt;

const ABBREVIATIONS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const NAMES: [&str; 16] = [
    "North",
    "North-northeast",
    "Northeast",
    "East-northeast",
    "East",
    "East-southeast",
    "Southeast",
    "South-southeast",
    "South",
    "South-southwest",
    "Southwest",
    "West-southwest",
    "West",
    "West-northwest",
    "Northwest",
    "North-northwest",
];

/// One of the 16 compass rose points, each covering a 22.5° sector
/// centered on the point itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Direction(usize);

impl Direction {
    /// Nearest rose point for a bearing. Also returns the bearing
    /// normalized into [0, 360).
    pub fn from_bearing(bearing: f64) -> (Direction, f64) {
        let normalized = ((bearing % 360.0) + 360.0) % 360.0;
        let index = ((normalized / 22.5).round() as usize) % 16;
        (Direction(index), normalized)
    }

    pub fn abbreviation(self) -> &'static str {
        ABBREVIATIONS[self.0]
    }

    pub fn name(self) -> &'static str {
        NAMES[self.0]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}
