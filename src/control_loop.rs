use embassy_time::{Duration, Timer};
use embedded_hal::digital::{InputPin, OutputPin};

use crate::display::{CharacterDisplay, DisplaySnapshot};
use crate::hardware::Hardware;
use crate::heater_controller::{HeaterController, HeaterState};
use crate::interlock::InterlockState;
use crate::log::info;
use crate::status_reporter::StatusReporter;
use crate::telemetry::TelemetrySink;
use crate::temperature_sensor::{SensorResult, Thermocouple};
use crate::{ControllerState, CURRENT_STATE};

/// What one control cycle observed and decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub reading: SensorResult,
    pub interlock: InterlockState,
    pub heater: HeaterState,
}

pub struct ControlLoop<S, I, O, D, T> {
    hardware: Hardware<S, I, O>,
    controller: HeaterController,
    reporter: StatusReporter<D, T>,
    period: Duration,
    cycle: u32,
    state: ControllerState,
}

impl<S, I, O, D, T> ControlLoop<S, I, O, D, T>
where
    S: Thermocouple,
    I: InputPin,
    O: OutputPin,
    D: CharacterDisplay,
    T: TelemetrySink,
{
    pub fn new(
        hardware: Hardware<S, I, O>,
        controller: HeaterController,
        reporter: StatusReporter<D, T>,
    ) -> Self {
        let period = controller.config().cycle_period;
        let state = ControllerState::starting();
        CURRENT_STATE.sender().send(state.clone());
        Self {
            hardware,
            controller,
            reporter,
            period,
            cycle: 0,
            state,
        }
    }

    /// Cycle forever with a fixed delay after each one.
    pub async fn run(&mut self) -> ! {
        info!("Control loop started, period {} ms", self.period.as_millis());
        loop {
            self.run_cycle().await;
            Timer::after(self.period).await;
        }
    }

    /// Sample, decide, actuate and report once.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let reading = self.hardware.read_temperature().await;
        let interlock = self.hardware.read_interlock();
        let heater = self.controller.decide(&reading, &interlock);
        self.hardware.drive_heater(heater);

        let snapshot = DisplaySnapshot {
            reading,
            interlock,
            heater,
        };
        self.reporter.render(&snapshot).await;

        self.cycle = self.cycle.wrapping_add(1);
        self.send_state(&snapshot);

        CycleReport {
            reading,
            interlock,
            heater,
        }
    }

    fn send_state(&mut self, snapshot: &DisplaySnapshot) {
        self.state = ControllerState::from_snapshot(snapshot, self.cycle);
        CURRENT_STATE.sender().send(self.state.clone());
    }

    /// The state most recently published to [`CURRENT_STATE`].
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn hardware_mut(&mut self) -> &mut Hardware<S, I, O> {
        &mut self.hardware
    }

    pub fn reporter(&self) -> &StatusReporter<D, T> {
        &self.reporter
    }
}
