//! Bang-bang heater decision.
//!
//! Heating requires the interlock button, a valid reading and a temperature
//! strictly below the limit. With a zero hysteresis band the result depends
//! only on the current inputs. A non-zero band keeps the previous state while
//! the temperature sits inside `[limit - band, limit)`.

use serde::Serialize;

use crate::config::{ControllerConfig, FlowPolicy};
use crate::interlock::InterlockState;
use crate::log::debug;
use crate::temperature_sensor::SensorResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub enum HeaterState {
    Heating,
    Idle,
}

impl HeaterState {
    pub fn is_on(&self) -> bool {
        matches!(self, HeaterState::Heating)
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            HeaterState::Heating => "Heating",
            HeaterState::Idle => "Idle",
        }
    }
}

pub struct HeaterController {
    config: ControllerConfig,
    state: HeaterState,
}

impl HeaterController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: HeaterState::Idle,
        }
    }

    pub fn state(&self) -> HeaterState {
        self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Decide the heater state for this cycle.
    pub fn decide(&mut self, reading: &SensorResult, interlock: &InterlockState) -> HeaterState {
        let next = self.evaluate(reading, interlock);
        if next != self.state {
            debug!("Heater {} -> {}", self.state.to_str(), next.to_str());
        }
        self.state = next;
        next
    }

    fn evaluate(&self, reading: &SensorResult, interlock: &InterlockState) -> HeaterState {
        let temperature = match reading {
            Ok(reading) => reading.celsius,
            Err(_) => return HeaterState::Idle,
        };

        if !interlock.button_asserted {
            return HeaterState::Idle;
        }

        if self.config.flow_policy == FlowPolicy::Required && !interlock.flow_detected {
            return HeaterState::Idle;
        }

        if temperature >= self.config.heat_limit_c {
            HeaterState::Idle
        } else if temperature < self.config.resume_below_c() {
            HeaterState::Heating
        } else {
            self.state
        }
    }
}
