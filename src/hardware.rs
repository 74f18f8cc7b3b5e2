use embedded_hal::digital::{InputPin, OutputPin};

use crate::heater_controller::HeaterState;
use crate::interlock::{InterlockState, SafetyInterlock};
use crate::log::{error, info};
use crate::temperature_sensor::{SensorResult, TemperatureSensor, Thermocouple};

/// Every pin and the sensor, owned for the lifetime of the program.
///
/// The PSU-enable pin is driven HIGH once in [`Hardware::init`] and has no
/// setter afterwards.
pub struct Hardware<S, I, O> {
    sensor: TemperatureSensor<S>,
    button: I,
    flow: I,
    ssr: O,
    _psu: O,
}

impl<S, I, O> Hardware<S, I, O>
where
    S: Thermocouple,
    I: InputPin,
    O: OutputPin,
{
    pub fn init(sensor: TemperatureSensor<S>, button: I, flow: I, mut ssr: O, mut psu: O) -> Self {
        if psu.set_high().is_err() {
            error!("Failed to enable PSU");
        }
        if ssr.set_low().is_err() {
            error!("Failed to switch SSR off");
        }
        info!("Hardware initialized: PSU enabled, SSR off");

        Self {
            sensor,
            button,
            flow,
            ssr,
            _psu: psu,
        }
    }

    pub async fn read_temperature(&mut self) -> SensorResult {
        self.sensor.read().await
    }

    pub fn read_interlock(&mut self) -> InterlockState {
        SafetyInterlock::evaluate(&mut self.button, &mut self.flow)
    }

    pub fn drive_heater(&mut self, state: HeaterState) {
        let result = match state {
            HeaterState::Heating => self.ssr.set_high(),
            HeaterState::Idle => self.ssr.set_low(),
        };
        if result.is_err() {
            error!("Failed to drive SSR to {}", state.to_str());
        }
    }

    pub fn sensor_mut(&mut self) -> &mut TemperatureSensor<S> {
        &mut self.sensor
    }
}
