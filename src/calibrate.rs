use std::thread;
use std::time::Duration;

use qibla_rs::heading_sensor::Magnetometer;
use qibla_rs::orientation::{Access, HeadingSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Magnetometer Calibration Tool");
    println!("-----------------------------\n");
    println!("Instructions:");
    println!("1. Keep the board LEVEL (horizontal)");
    println!("2. Slowly rotate the board through a FULL 360° circle");
    println!("3. Take at least 30 seconds to complete the rotation");
    println!("4. Press Ctrl+C when done, then copy the offsets into src/config.rs\n");

    println!("Starting in 5 seconds...\n");
    thread::sleep(Duration::from_secs(5));

    let mut sensor = Magnetometer::new();
    match sensor.request_access() {
        Access::Granted => {}
        Access::Denied => {
            return Err("I2C access denied; run with permission to use the bus".into());
        }
        Access::Unavailable => return Err("no LIS3MDL magnetometer found".into()),
    }
    sensor.start()?;

    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_min = f64::MAX;
    let mut y_max = f64::MIN;

    let mut sample_count = 0;

    println!("Collecting samples... (ROTATE NOW!)");
    println!(
        "\n{:^8} | {:^20} | {:^20} | {:^20}",
        "Sample", "X Range", "Y Range", "Calculated Offsets"
    );
    println!("{:-<8}-+-{:-<20}-+-{:-<20}-+-{:-<20}", "", "", "", "");

    loop {
        if let Some((x, y)) = sensor.read_raw_xy() {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);

            sample_count += 1;

            // Hard iron offset is the center of the traced circle.
            let x_offset = (x_min + x_max) / 2.0;
            let y_offset = (y_min + y_max) / 2.0;

            if sample_count % 10 == 0 {
                println!(
                    "{:^8} | {:>7.0} to {:>7.0} | {:>7.0} to {:>7.0} | X: {:>7.0}  Y: {:>7.0}",
                    sample_count, x_min, x_max, y_min, y_max, x_offset, y_offset
                );
            }
        }

        thread::sleep(Duration::from_millis(100));
    }
}
