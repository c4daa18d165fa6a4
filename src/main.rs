use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;

use qibla_rs::LocationTracker;
use qibla_rs::button::RefreshButton;
use qibla_rs::compass::Direction;
use qibla_rs::config::{
    GPS_FIX_TIMEOUT_SECS, HEADING_POLL_MILLIS, SCHEDULE_TICK_SECS, TIMETABLE_PATH,
};
use qibla_rs::fetch;
use qibla_rs::heading_sensor::Magnetometer;
use qibla_rs::orientation::OrientationReconciler;
use qibla_rs::qibla::{self, QiblaBearing};
use qibla_rs::schedule::Schedule;
use qibla_rs::timetable::Timetable;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Starting Qibla Finder...");

    // Today's pre-computed timetable from the data collaborator
    let timetable = Timetable::load(Path::new(TIMETABLE_PATH))?;
    let schedule = timetable.schedule()?;
    println!(
        "✓ Timetable for {} loaded ({}, {})",
        timetable.date, timetable.method, timetable.timezone
    );

    // Shared GPS tracker between threads
    let tracker = Arc::new(Mutex::new(LocationTracker::new()));
    let tracker_clone = Arc::clone(&tracker);

    thread::spawn(move || {
        if let Err(e) = fetch::feed_tracker(tracker_clone) {
            eprintln!("GPS error: {}", e);
        }
    });

    println!("Waiting for GPS fix...");
    let fix = fetch::wait_for_fix(&tracker, Duration::from_secs(GPS_FIX_TIMEOUT_SECS))?;
    println!("\n✓ GPS fix acquired!");
    println!("  Position: {}", fix);

    if let Ok(tracker_lock) = tracker.lock() {
        if let Some(num_sats) = tracker_lock.num_satellites() {
            println!("  Satellites: {}", num_sats);
        }
        if let Some(hdop) = tracker_lock.hdop() {
            println!("  HDOP: {:.2}", hdop);
        }
    }

    let mut qibla = qibla::from_position(fix);
    print_qibla(&qibla);

    // Heading source negotiation; on refusal the needle stays static
    // and the degraded mode is said out loud.
    let mut reconciler = OrientationReconciler::new(qibla.bearing_degrees);
    reconciler.attach(Box::new(Magnetometer::new()));
    if !reconciler.is_active() {
        println!("⚠ Compass not available. Showing static direction.");
    }

    let mut button = match RefreshButton::new() {
        Ok(button) => Some(button),
        Err(e) => {
            println!("⚠ Refresh button unavailable: {}", e);
            None
        }
    };

    print_schedule_state(&schedule);
    println!("\nMain loop started. Press the button to refresh the location.\n");

    let mut last_tick = Instant::now();

    loop {
        // Refresh on button press: replace the fix wholesale and re-aim.
        if let Some(button) = button.as_mut()
            && button.take_press()
            && let Ok(tracker_lock) = tracker.lock()
            && let Some(pos) = tracker_lock.current_position()
        {
            qibla = qibla::from_position(pos);
            reconciler.set_target_bearing(qibla.bearing_degrees);
            println!("✓ Location refreshed: {}", pos);
            print_qibla(&qibla);
        }

        // Live heading samples move the needle.
        if reconciler.update() {
            println!("→ Needle: {:.1}°", reconciler.display_angle());
        }

        // Whole-minute schedule granularity; a 60 second tick is enough.
        if last_tick.elapsed() >= Duration::from_secs(SCHEDULE_TICK_SECS) {
            print_schedule_state(&schedule);
            last_tick = Instant::now();
        }

        thread::sleep(Duration::from_millis(HEADING_POLL_MILLIS));
    }
}

fn print_qibla(qibla: &QiblaBearing) {
    let (direction, _) = Direction::from_bearing(qibla.bearing_degrees);
    println!(
        "  Qibla: {:.1}° {} ({:.0} km to Mecca)",
        qibla.bearing_degrees,
        direction.abbreviation(),
        qibla.distance_km
    );
}

fn print_schedule_state(schedule: &Schedule) {
    // The instant is read once here and passed in; evaluation itself
    // never touches the clock.
    let state = schedule.evaluate(Local::now().time());

    println!("\n[Prayer Times]");
    match &state.current {
        Some(name) => println!("  Current: {}", name),
        None => println!("  Current: none yet"),
    }

    let at = state.next.time.format("%-I:%M %p");
    if state.next.is_tomorrow {
        println!(
            "  Next: {} tomorrow at {} (in {})",
            state.next.name,
            at,
            state.next.remaining_label()
        );
    } else {
        println!(
            "  Next: {} at {} (in {})",
            state.next.name,
            at,
            state.next.remaining_label()
        );
    }
}
