use embassy_time::{with_timeout, Duration};
use serde::Serialize;

use crate::config::ControllerConfig;
use crate::error::SensorFault;
use crate::log::warn;

/// A thermocouple amplifier able to report the hot-junction temperature.
pub trait Thermocouple {
    async fn read_celsius(&mut self) -> Result<f32, SensorFault>;
}

/// One temperature sample in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureReading {
    pub celsius: f32,
}

impl TemperatureReading {
    pub const fn new(celsius: f32) -> Self {
        Self { celsius }
    }
}

pub type SensorResult = Result<TemperatureReading, SensorFault>;

/// Wraps a [`Thermocouple`] with a read timeout and plausibility checks.
pub struct TemperatureSensor<T> {
    thermocouple: T,
    timeout: Duration,
    min_valid_c: f32,
    max_valid_c: f32,
}

impl<T: Thermocouple> TemperatureSensor<T> {
    pub fn new(thermocouple: T, config: &ControllerConfig) -> Self {
        Self {
            thermocouple,
            timeout: config.sensor_timeout,
            min_valid_c: config.min_valid_c,
            max_valid_c: config.max_valid_c,
        }
    }

    pub async fn read(&mut self) -> SensorResult {
        let celsius = match with_timeout(self.timeout, self.thermocouple.read_celsius()).await {
            Ok(Ok(t)) => t,
            Ok(Err(fault)) => {
                warn!("Temperature read failed: {}", fault.tag());
                return Err(fault);
            }
            Err(_) => {
                warn!("Temperature read timed out");
                return Err(SensorFault::Timeout);
            }
        };

        if !celsius.is_finite() || celsius < self.min_valid_c || celsius > self.max_valid_c {
            warn!("Temperature {} outside valid range", celsius);
            return Err(SensorFault::OutOfRange);
        }

        Ok(TemperatureReading::new(celsius))
    }

    pub fn thermocouple_mut(&mut self) -> &mut T {
        &mut self.thermocouple
    }
}
