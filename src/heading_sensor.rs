//! LIS3MDL magnetometer, the heading source on this hardware.

use std::error::Error;
use std::io;

use log::{debug, info, warn};
use rppal::i2c::I2c;

use crate::config::{HEADING_OFFSET, X_OFFSET, Y_OFFSET};
use crate::orientation::{Access, HeadingSource};

const LIS3MDL_ADDR: u16 = 0x1C;
const LIS3MDL_DEVICE_ID: u8 = 0x3D;

// LIS3MDL register addresses
const WHO_AM_I: u8 = 0x0F;
const CTRL_REG1: u8 = 0x20;
const CTRL_REG2: u8 = 0x21;
const CTRL_REG3: u8 = 0x22;
const CTRL_REG4: u8 = 0x23;
const CTRL_REG5: u8 = 0x24;
const STATUS_REG: u8 = 0x27;
const OUT_X_L: u8 = 0x28;

/// Data-ready flag for the full XYZ set in STATUS_REG.
const STATUS_ZYXDA: u8 = 0x08;
/// MD[1:0] = 0b11 puts the sensor in power-down mode.
const MODE_POWER_DOWN: u8 = 0x03;

/// Magnetometer-backed [`HeadingSource`].
///
/// The bus is only opened during `request_access`; construction never
/// touches hardware, so the reconciler owns the whole negotiation.
pub struct Magnetometer {
    i2c: Option<I2c>,
}

impl Magnetometer {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { i2c: None }
    }

    /// Raw calibrated X/Y field strengths, for the calibrate tool.
    pub fn read_raw_xy(&mut self) -> Option<(f64, f64)> {
        let data = self.read_output_block()?;
        let x = i16::from_le_bytes([data[0], data[1]]) as f64;
        let y = i16::from_le_bytes([data[2], data[3]]) as f64;
        Some((x, y))
    }

    fn read_output_block(&mut self) -> Option<[u8; 6]> {
        let i2c = self.i2c.as_mut()?;

        match i2c.smbus_read_byte(STATUS_REG) {
            Ok(status) if status & STATUS_ZYXDA != 0 => {}
            Ok(_) => return None, // no fresh reading yet
            Err(e) => {
                debug!("magnetometer status read failed: {}", e);
                return None;
            }
        }

        // Read 6 bytes starting from OUT_X_L (auto-increment enabled)
        let mut data = [0u8; 6];
        for (i, item) in data.iter_mut().enumerate() {
            match i2c.smbus_read_byte(OUT_X_L + i as u8) {
                Ok(byte) => *item = byte,
                Err(e) => {
                    debug!("magnetometer output read failed: {}", e);
                    return None;
                }
            }
        }
        Some(data)
    }
}

impl HeadingSource for Magnetometer {
    fn request_access(&mut self) -> Access {
        // Opening the bus is the consent step on this platform: a permission
        // error means this process may not use the sensor.
        let mut i2c = match I2c::new() {
            Ok(i2c) => i2c,
            Err(rppal::i2c::Error::Io(e)) if e.kind() == io::ErrorKind::PermissionDenied => {
                warn!("I2C bus access denied: {}", e);
                return Access::Denied;
            }
            Err(e) => {
                warn!("no I2C bus: {}", e);
                return Access::Unavailable;
            }
        };

        if let Err(e) = i2c.set_slave_address(LIS3MDL_ADDR) {
            warn!("cannot address magnetometer: {}", e);
            return Access::Unavailable;
        }

        match i2c.smbus_read_byte(WHO_AM_I) {
            Ok(LIS3MDL_DEVICE_ID) => {
                self.i2c = Some(i2c);
                Access::Granted
            }
            Ok(id) => {
                warn!(
                    "wrong device ID at 0x{:02X}: 0x{:02X}, expected 0x{:02X}",
                    LIS3MDL_ADDR, id, LIS3MDL_DEVICE_ID
                );
                Access::Unavailable
            }
            Err(e) => {
                warn!("magnetometer not responding: {}", e);
                Access::Unavailable
            }
        }
    }

    fn start(&mut self) -> Result<(), Box<dyn Error>> {
        let i2c = self.i2c.as_mut().ok_or("access not granted")?;

        // CTRL_REG1: temperature enabled, ultra-high performance (X,Y), ODR = 80 Hz
        i2c.smbus_write_byte(CTRL_REG1, 0xFC)?;
        // CTRL_REG2: full scale ±4 gauss
        i2c.smbus_write_byte(CTRL_REG2, 0x00)?;
        // CTRL_REG3: continuous conversion mode
        i2c.smbus_write_byte(CTRL_REG3, 0x00)?;
        // CTRL_REG4: ultra-high performance (Z), little endian
        i2c.smbus_write_byte(CTRL_REG4, 0x0C)?;
        // CTRL_REG5: block data update enabled
        i2c.smbus_write_byte(CTRL_REG5, 0x40)?;

        std::thread::sleep(std::time::Duration::from_millis(100));

        let status = i2c.smbus_read_byte(STATUS_REG)?;
        if status == 0 {
            return Err("magnetometer hardware not responding (no data ready)".into());
        }

        info!("compass (LIS3MDL) initialized");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(i2c) = self.i2c.as_mut() {
            // Best effort; the bus handle is released either way.
            if let Err(e) = i2c.smbus_write_byte(CTRL_REG3, MODE_POWER_DOWN) {
                debug!("magnetometer power-down failed: {}", e);
            }
        }
        self.i2c = None;
    }

    fn read_sample(&mut self) -> Option<f64> {
        let data = self.read_output_block()?;

        let x_raw = i16::from_le_bytes([data[0], data[1]]) as f64;
        let y_raw = i16::from_le_bytes([data[2], data[3]]) as f64;

        // Hard iron calibration (center the readings)
        let x = x_raw - X_OFFSET;
        let y = y_raw - Y_OFFSET;

        // Raw sample in the sensor frame; may be negative. The reconciler
        // owns normalization into the display frame.
        Some(y.atan2(x).to_degrees() + HEADING_OFFSET)
    }
}
