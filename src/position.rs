use std::fmt;

/// Earth's mean radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// An observer coordinate. Supplied by the location collaborator and
/// replaced wholesale on refresh, never mutated in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}°{}, {:.4}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Initial great-circle bearing from this position to another.
    /// Returns degrees in [0, 360), clockwise from true north.
    ///
    /// Inputs are not validated; poles and the antimeridian are fine, but
    /// non-finite coordinates propagate NaN to the caller.
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let lat_from = self.latitude.to_radians();
        let lat_to = other.latitude.to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let y = delta_lon.sin() * lat_to.cos();
        let x = lat_from.cos() * lat_to.sin() - lat_from.sin() * lat_to.cos() * delta_lon.cos();

        let bearing = y.atan2(x).to_degrees();

        ((bearing % 360.0) + 360.0) % 360.0
    }

    /// Great-circle distance to another position using the haversine formula.
    /// Read more here: https://en.wikipedia.org/wiki/Haversine_formula
    /// Returns the distance in kilometers.
    pub fn distance_km_to(&self, other: &Position) -> f64 {
        let lat_from = self.latitude.to_radians();
        let lat_to = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat_from.cos() * lat_to.cos() * (delta_lon / 2.0).sin().powi(2);
        // Rounding can push a just past 1 at the antipode; 1 - a must not go negative.
        let a = a.min(1.0);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Half the Earth's circumference; no two points are farther apart.
    const MAX_DISTANCE_KM: f64 = 20016.0;

    #[test]
    fn test_position_new_and_display() {
        let pos = Position::new(21.4225, 39.8262);

        assert_eq!(pos.latitude, 21.4225);
        assert_eq!(pos.longitude, 39.8262);
        assert_eq!(format!("{}", pos), "21.4225°N, 39.8262°E");

        let pos = Position::new(-6.2088, -106.8456);
        assert_eq!(format!("{}", pos), "6.2088°S, 106.8456°W");
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Position::new(0.0, 0.0);

        // Due east and due north along the equator/meridian.
        assert_relative_eq!(
            origin.bearing_to(&Position::new(0.0, 10.0)),
            90.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            origin.bearing_to(&Position::new(10.0, 0.0)),
            0.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            origin.bearing_to(&Position::new(0.0, -10.0)),
            270.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            origin.bearing_to(&Position::new(-10.0, 0.0)),
            180.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_bearing_in_range_at_boundaries() {
        // Poles and the antimeridian must not produce NaN.
        let target = Position::new(21.4225, 39.8262);
        let boundaries = [
            Position::new(90.0, 0.0),
            Position::new(-90.0, 0.0),
            Position::new(90.0, 180.0),
            Position::new(-90.0, -180.0),
            Position::new(0.0, 180.0),
            Position::new(0.0, -180.0),
            Position::new(45.0, 180.0),
        ];

        for observer in boundaries {
            let bearing = observer.bearing_to(&target);
            assert!(bearing.is_finite(), "NaN bearing from {}", observer);
            assert!(
                (0.0..360.0).contains(&bearing),
                "bearing {} out of range from {}",
                bearing,
                observer
            );
        }
    }

    #[test]
    fn test_distance_zero_at_same_point() {
        let pos = Position::new(21.4225, 39.8262);
        assert_eq!(pos.distance_km_to(&pos), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Position::new(51.5074, -0.1278);
        let b = Position::new(21.4225, 39.8262);

        assert_eq!(a.distance_km_to(&b), b.distance_km_to(&a));
        assert!(a.distance_km_to(&b) >= 0.0);
    }

    #[test]
    fn test_distance_maximal_at_antipode() {
        let a = Position::new(21.4225, 39.8262);
        let antipode = Position::new(-21.4225, 39.8262 - 180.0);

        let d = a.distance_km_to(&antipode);
        assert!(d > 20000.0 && d <= MAX_DISTANCE_KM);
    }

    #[test]
    fn test_distance_never_exceeds_half_circumference() {
        let target = Position::new(21.4225, 39.8262);
        let observers = [
            Position::new(90.0, 0.0),
            Position::new(-90.0, 180.0),
            Position::new(-21.4225, -140.1738),
            Position::new(48.0574, -123.1196),
        ];

        for observer in observers {
            let d = observer.distance_km_to(&target);
            assert!((0.0..=MAX_DISTANCE_KM).contains(&d));
        }
    }

    #[test]
    fn test_pure_functions_are_idempotent() {
        let observer = Position::new(48.0574, -123.1196);
        let target = Position::new(21.4225, 39.8262);

        // Bit-identical on repeated calls; no hidden state.
        assert_eq!(
            observer.bearing_to(&target).to_bits(),
            observer.bearing_to(&target).to_bits()
        );
        assert_eq!(
            observer.distance_km_to(&target).to_bits(),
            observer.distance_km_to(&target).to_bits()
        );
    }
}
