//! Reconciles the Qibla bearing with a live device heading.
//!
//! The needle must point at the target bearing no matter which way the device
//! is turned. When no heading source is available the output degrades to the
//! raw target bearing and callers are expected to surface the degraded mode
//! instead of silently showing a wrong angle.

use std::error::Error;

use log::{debug, warn};

/// Outcome of asking a heading source for access to its samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Access granted, or no consent step was required.
    Granted,
    /// The platform or user refused access to the sensor.
    Denied,
    /// No usable sensor exists on this platform.
    Unavailable,
}

/// A live source of raw heading samples.
///
/// Samples are degrees in the sensor's own frame and may be negative;
/// normalization into the display frame belongs to the reconciler.
/// `request_access` runs the capability/consent step and must succeed before
/// `start`. `stop` must be safe on every path, including after a failed
/// `start`.
pub trait HeadingSource {
    fn request_access(&mut self) -> Access;
    fn start(&mut self) -> Result<(), Box<dyn Error>>;
    fn stop(&mut self);
    /// Latest reading at sensor cadence, `None` when nothing fresh is ready.
    fn read_sample(&mut self) -> Option<f64>;
}

/// Sensor availability. Decided once per session by the attach attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorState {
    /// No attach attempt yet; output degrades to the raw target bearing.
    Pending,
    /// Subscribed and consuming samples.
    Active,
    /// Sensor absent, access denied, or the subscribe attempt failed.
    Unsupported,
}

pub struct OrientationReconciler {
    target_bearing: f64,
    /// Most recent device heading in the display frame, [0, 360).
    /// Single writer: the sample path below.
    device_heading: Option<f64>,
    state: SensorState,
    source: Option<Box<dyn HeadingSource>>,
}

impl OrientationReconciler {
    /// A reconciler aimed at `target_bearing` (degrees in [0, 360),
    /// typically from [`crate::qibla::bearing`]).
    pub fn new(target_bearing: f64) -> Self {
        Self {
            target_bearing,
            device_heading: None,
            state: SensorState::Pending,
            source: None,
        }
    }

    pub fn state(&self) -> SensorState {
        self.state
    }

    /// Whether live samples are driving the needle. When false the caller
    /// must tell the user the direction shown is static.
    pub fn is_active(&self) -> bool {
        self.state == SensorState::Active
    }

    /// Attach a heading source, running the availability negotiation once.
    ///
    /// Any failure leaves the session in `Unsupported` permanently, and the
    /// source is stopped on every non-Active path so nothing keeps listening.
    /// Repeated calls after the first decision are ignored.
    pub fn attach(&mut self, mut source: Box<dyn HeadingSource>) {
        if self.state != SensorState::Pending {
            return;
        }

        match source.request_access() {
            Access::Unavailable => {
                warn!("heading source unavailable on this platform");
                source.stop();
                self.state = SensorState::Unsupported;
            }
            Access::Denied => {
                warn!("heading source access denied");
                source.stop();
                self.state = SensorState::Unsupported;
            }
            Access::Granted => match source.start() {
                Ok(()) => {
                    debug!("heading source subscribed");
                    self.state = SensorState::Active;
                    self.source = Some(source);
                }
                Err(e) => {
                    warn!("heading source failed to start: {}", e);
                    source.stop();
                    self.state = SensorState::Unsupported;
                }
            },
        }
    }

    /// Pull the latest sample from the attached source.
    /// Returns true when the device heading changed.
    pub fn update(&mut self) -> bool {
        if self.state != SensorState::Active {
            return false;
        }
        let Some(source) = self.source.as_mut() else {
            return false;
        };
        match source.read_sample() {
            Some(raw) => {
                let before = self.device_heading;
                self.apply_sample(raw);
                self.device_heading != before
            }
            None => false,
        }
    }

    /// Feed one raw sensor sample, degrees, possibly negative.
    ///
    /// The sample is normalized into [0, 360) and inverted out of the
    /// sensor frame: a raw 0 stays at north, a raw 90 lands at 270.
    pub fn apply_sample(&mut self, raw: f64) {
        let normalized = if raw < 0.0 { raw + 360.0 } else { raw };
        self.device_heading = Some((360.0 - normalized).rem_euclid(360.0));
    }

    /// Most recent device heading in the display frame, if any sample arrived.
    pub fn device_heading(&self) -> Option<f64> {
        self.device_heading
    }

    pub fn target_bearing(&self) -> f64 {
        self.target_bearing
    }

    /// Re-aim after the observer position changed.
    pub fn set_target_bearing(&mut self, bearing: f64) {
        self.target_bearing = bearing;
    }

    /// Rotation angle for the needle, degrees in [0, 360).
    ///
    /// Active: the target bearing relative to the way the device points.
    /// Otherwise the raw target bearing, regardless of any buffered sample.
    pub fn display_angle(&self) -> f64 {
        match (self.state, self.device_heading) {
            (SensorState::Active, Some(heading)) => {
                (self.target_bearing - heading + 360.0) % 360.0
            }
            _ => self.target_bearing,
        }
    }

    /// Release the heading subscription. Idempotent; also runs on drop so
    /// a discarded reconciler never leaks a sensor listener.
    pub fn release(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.stop();
            self.state = SensorState::Unsupported;
        }
    }
}

impl Drop for OrientationReconciler {
    fn drop(&mut self) {
        self.release();
    }
}
