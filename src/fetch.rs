//! GPS feed: reads NMEA sentences from the serial port and keeps the
//! shared tracker current.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use nmea::Nmea;

use crate::config::GPS_SERIAL_PORT;
use crate::position::Position;
use crate::tracker::{LocationError, LocationTracker};

/// Feed the shared tracker from the default GPS serial port until the
/// stream ends. Meant to run on its own thread.
pub fn feed_tracker(tracker: Arc<Mutex<LocationTracker>>) -> Result<(), LocationError> {
    feed_tracker_from(GPS_SERIAL_PORT, tracker)
}

pub fn feed_tracker_from(
    path: &str,
    tracker: Arc<Mutex<LocationTracker>>,
) -> Result<(), LocationError> {
    let file = File::open(path).map_err(|e| classify_open_error(path, e))?;
    debug!("reading NMEA sentences from {}", path);
    pump(BufReader::new(file), &tracker);
    Ok(())
}

/// Parse every NMEA line from `reader` into the tracker.
/// Unparseable sentences are skipped; the GPS module interleaves types we
/// never consume.
fn pump<R: BufRead>(reader: R, tracker: &Arc<Mutex<LocationTracker>>) {
    let mut nmea = Nmea::default();

    for line in reader.lines() {
        match line {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    continue;
                }

                if nmea.parse(trimmed).is_err() {
                    debug!("skipping sentence: {}", trimmed);
                    continue;
                }

                if let Ok(mut tracker) = tracker.lock() {
                    if let (Some(lat), Some(lon)) = (nmea.latitude, nmea.longitude) {
                        tracker.update_position(lat, lon);
                    }
                    if let Some(num_sats) = nmea.num_of_fix_satellites {
                        tracker.update_satellites(num_sats);
                    }
                    if let Some(hdop) = nmea.hdop {
                        tracker.update_hdop(hdop);
                    }
                }
            }
            Err(e) => warn!("error reading GPS line: {}", e),
        }
    }
}

fn classify_open_error(path: &str, e: io::Error) -> LocationError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => {
            LocationError::PermissionDenied(format!("{}: {}", path, e))
        }
        io::ErrorKind::NotFound => {
            LocationError::PositionUnavailable(format!("no GPS device at {}", path))
        }
        _ => LocationError::Unknown(e.to_string()),
    }
}

/// Block until the tracker has a fix, or give up after `timeout`.
pub fn wait_for_fix(
    tracker: &Arc<Mutex<LocationTracker>>,
    timeout: Duration,
) -> Result<Position, LocationError> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Ok(tracker_lock) = tracker.lock()
            && let Some(pos) = tracker_lock.current_position()
        {
            return Ok(pos);
        }

        if Instant::now() >= deadline {
            return Err(LocationError::Timeout(timeout));
        }

        thread::sleep(Duration::from_millis(100));
    }
}
