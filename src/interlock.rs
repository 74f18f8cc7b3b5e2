use embedded_hal::digital::InputPin;
use serde::Serialize;

use crate::log::error;

/// Interlock inputs as read this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub struct InterlockState {
    /// Manual button held (pin pulled LOW).
    pub button_asserted: bool,
    /// Flow/hall sensor pin HIGH.
    pub flow_detected: bool,
}

impl InterlockState {
    /// Build from raw pin levels: `true` means the pin reads HIGH.
    pub const fn from_levels(button_high: bool, flow_high: bool) -> Self {
        Self {
            button_asserted: !button_high,
            flow_detected: flow_high,
        }
    }
}

pub struct SafetyInterlock;

impl SafetyInterlock {
    /// Sample the button (active-low, pull-up) and the flow sensor (active-high).
    ///
    /// A pin that cannot be read counts as not asserted.
    pub fn evaluate<B, F>(button: &mut B, flow: &mut F) -> InterlockState
    where
        B: InputPin,
        F: InputPin,
    {
        let button_asserted = match button.is_low() {
            Ok(low) => low,
            Err(_) => {
                error!("Failed to read interlock button");
                false
            }
        };
        let flow_detected = match flow.is_high() {
            Ok(high) => high,
            Err(_) => {
                error!("Failed to read flow sensor");
                false
            }
        };

        InterlockState {
            button_asserted,
            flow_detected,
        }
    }
}
