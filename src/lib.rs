#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "rp2040")]
pub use defmt as log;

#[cfg(not(feature = "rp2040"))]
pub use log;

#[cfg(feature = "rp2040")]
pub mod resources_rp2040;
#[cfg(feature = "rp2040")]
pub use resources_rp2040 as resources;

#[cfg(feature = "rp2040")]
pub mod platform_rp2040;
#[cfg(feature = "rp2040")]
pub use platform_rp2040 as platform;

#[cfg(all(feature = "std", not(feature = "rp2040")))]
pub mod platform_std;
#[cfg(all(feature = "std", not(feature = "rp2040")))]
pub use platform_std as platform;

#[cfg(feature = "rp2040")]
pub mod usb_interface_rp2040;
#[cfg(feature = "rp2040")]
pub use usb_interface_rp2040 as usb_interface;

#[cfg(all(feature = "std", not(feature = "rp2040")))]
pub mod usb_interface_std;
#[cfg(all(feature = "std", not(feature = "rp2040")))]
pub use usb_interface_std as usb_interface;

pub mod config;
pub mod control_loop;
pub mod display;
pub mod error;
pub mod hardware;
pub mod heater_controller;
pub mod host_command;
pub mod interlock;
pub mod lcd_i2c;
pub mod max6675;
pub mod status_reporter;
pub mod telemetry;
pub mod temperature_sensor;
pub mod text_display;

pub static VERSION: &str = "v0.1";

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::watch::Watch;
use serde::{Deserialize, Serialize};

use crate::display::DisplaySnapshot;

/// Latest controller state, published once per control cycle.
pub static CURRENT_STATE: Watch<CriticalSectionRawMutex, ControllerState, 2> = Watch::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub enum Status {
    Starting,
    Running,
    SensorFault,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerState {
    pub status: Status,
    pub temperature: Option<f32>,
    pub fault: Option<&'static str>,
    pub button_pressed: bool,
    pub flow_detected: bool,
    pub heater_on: bool,
    pub cycle: u32,
}

impl ControllerState {
    pub const fn starting() -> Self {
        Self {
            status: Status::Starting,
            temperature: None,
            fault: None,
            button_pressed: false,
            flow_detected: false,
            heater_on: false,
            cycle: 0,
        }
    }

    /// State after `cycle` completed cycles, the last of which saw `snapshot`.
    pub fn from_snapshot(snapshot: &DisplaySnapshot, cycle: u32) -> Self {
        let (status, temperature, fault) = match snapshot.reading {
            Ok(reading) => (Status::Running, Some(reading.celsius), None),
            Err(fault) => (Status::SensorFault, None, Some(fault.tag())),
        };
        Self {
            status,
            temperature,
            fault,
            button_pressed: snapshot.interlock.button_asserted,
            flow_detected: snapshot.interlock.flow_detected,
            heater_on: snapshot.heater.is_on(),
            cycle,
        }
    }

    /// JSON rendering used by the state stream.
    pub fn to_json(&self) -> Option<heapless::String<256>> {
        serde_json_core::ser::to_string(self).ok()
    }
}
