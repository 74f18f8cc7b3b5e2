//! Controller constants and the runtime [`ControllerConfig`].
//!
//! Defaults reproduce the plain bang-bang behaviour: heat while the button is
//! held and the thermocouple reads below [`HEAT_LIMIT_C`], flow is display
//! only. The `hysteresis` and `flow_interlock` features change the defaults.

use embassy_time::Duration;

use crate::error::ConfigError;

/// Heating stops at or above this temperature.
pub const HEAT_LIMIT_C: f32 = 150.0;

/// Band below the limit used when the `hysteresis` feature is enabled.
pub const DEFAULT_HYSTERESIS_C: f32 = 5.0;

pub const CYCLE_PERIOD_MILLIS: u64 = 500;
pub const SENSOR_TIMEOUT_MILLIS: u64 = 200;

/// MAX6675 measurable range.
pub const MIN_VALID_C: f32 = 0.0;
pub const MAX_VALID_C: f32 = 1023.75;

pub const SERIAL_BAUD_RATE: u32 = 9600;

pub const LCD_I2C_ADDR: u8 = 0x27;
pub const LCD_COLUMNS: usize = 20;
pub const LCD_ROWS: usize = 4;

/// Role of the flow sensor in the heating decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub enum FlowPolicy {
    /// Flow is read and shown but never gates heating.
    Advisory,
    /// Heating additionally requires flow to be detected.
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub heat_limit_c: f32,
    pub hysteresis_c: f32,
    pub flow_policy: FlowPolicy,
    pub min_valid_c: f32,
    pub max_valid_c: f32,
    pub cycle_period: Duration,
    pub sensor_timeout: Duration,
}

impl ControllerConfig {
    pub const fn new() -> Self {
        Self {
            heat_limit_c: HEAT_LIMIT_C,
            hysteresis_c: if cfg!(feature = "hysteresis") {
                DEFAULT_HYSTERESIS_C
            } else {
                0.0
            },
            flow_policy: if cfg!(feature = "flow_interlock") {
                FlowPolicy::Required
            } else {
                FlowPolicy::Advisory
            },
            min_valid_c: MIN_VALID_C,
            max_valid_c: MAX_VALID_C,
            cycle_period: Duration::from_millis(CYCLE_PERIOD_MILLIS),
            sensor_timeout: Duration::from_millis(SENSOR_TIMEOUT_MILLIS),
        }
    }

    pub const fn with_hysteresis(mut self, band_c: f32) -> Self {
        self.hysteresis_c = band_c;
        self
    }

    pub const fn with_flow_policy(mut self, policy: FlowPolicy) -> Self {
        self.flow_policy = policy;
        self
    }

    pub const fn with_valid_range(mut self, min_c: f32, max_c: f32) -> Self {
        self.min_valid_c = min_c;
        self.max_valid_c = max_c;
        self
    }

    pub const fn with_sensor_timeout(mut self, timeout: Duration) -> Self {
        self.sensor_timeout = timeout;
        self
    }

    pub const fn with_cycle_period(mut self, period: Duration) -> Self {
        self.cycle_period = period;
        self
    }

    /// Lower edge of the hysteresis band. Equal to the limit when no band is set.
    pub fn resume_below_c(&self) -> f32 {
        self.heat_limit_c - self.hysteresis_c
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            self.heat_limit_c,
            self.hysteresis_c,
            self.min_valid_c,
            self.max_valid_c,
        ];
        if limits.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFiniteLimit);
        }
        if self.hysteresis_c < 0.0 {
            return Err(ConfigError::NegativeHysteresis);
        }
        if self.min_valid_c >= self.max_valid_c {
            return Err(ConfigError::EmptyValidRange);
        }
        if self.resume_below_c() < self.min_valid_c {
            return Err(ConfigError::HysteresisTooWide);
        }
        if self.cycle_period.as_ticks() == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.sensor_timeout.as_ticks() == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new()
    }
}
