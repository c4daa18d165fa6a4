// ** CALIBRATION CONFIGURATION ** //

// Magnetometer hard iron offsets, from the calibrate tool:
// rotate the board 360° and record min/max X,Y values.
pub const X_OFFSET: f64 = -2776.0; // (X_min + X_max) / 2
pub const Y_OFFSET: f64 = 2556.0; // (Y_min + Y_max) / 2
/// Overall heading correction for the mounting orientation.
pub const HEADING_OFFSET: f64 = 88.0;

// ** GPS CONFIGURATION ** //

/// Serial device the GPS module streams NMEA sentences to.
pub const GPS_SERIAL_PORT: &str = "/dev/serial0";
/// How long to wait for a first fix before giving up.
pub const GPS_FIX_TIMEOUT_SECS: u64 = 120;

// ** INPUT CONFIGURATION ** //

/// GPIO pin for the location-refresh pushbutton (pull-up, active low).
pub const GPIO_REFRESH_BUTTON: u8 = 23;

// ** MAIN CONFIGURATION ** //

/// Daily timetable document supplied by the schedule collaborator.
pub const TIMETABLE_PATH: &str = "timetable.toml";
/// Schedule granularity is whole minutes; a 60 second tick is enough.
pub const SCHEDULE_TICK_SECS: u64 = 60;
/// Heading sample poll interval (the LIS3MDL runs far faster than this).
pub const HEADING_POLL_MILLIS: u64 = 250;
