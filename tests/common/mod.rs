//! Mock board for integration tests.
//!
//! Pins share their level through `Rc<Cell<bool>>` so a test can flip an
//! input or inspect the SSR while the control loop owns the pin.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use heater_controller::config::{ControllerConfig, FlowPolicy, LCD_COLUMNS, LCD_ROWS};
use heater_controller::control_loop::ControlLoop;
use heater_controller::display::CharacterDisplay;
use heater_controller::error::SensorFault;
use heater_controller::hardware::Hardware;
use heater_controller::heater_controller::HeaterController;
use heater_controller::status_reporter::StatusReporter;
use heater_controller::telemetry::TelemetrySink;
use heater_controller::temperature_sensor::{TemperatureSensor, Thermocouple};

// ── Pins ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockPin {
    level: Rc<Cell<bool>>,
}

impl MockPin {
    pub fn new(high: bool) -> Self {
        Self {
            level: Rc::new(Cell::new(high)),
        }
    }

    pub fn set(&self, high: bool) {
        self.level.set(high);
    }

    pub fn is_set_high(&self) -> bool {
        self.level.get()
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.set(true);
        Ok(())
    }
}

// ── Thermocouple ──────────────────────────────────────────────

/// Returns queued readings in order, repeating the last one.
pub struct ScriptedThermocouple {
    queue: VecDeque<Result<f32, SensorFault>>,
    last: Result<f32, SensorFault>,
}

impl ScriptedThermocouple {
    pub fn new(first: Result<f32, SensorFault>) -> Self {
        Self {
            queue: VecDeque::new(),
            last: first,
        }
    }

    pub fn push(&mut self, reading: Result<f32, SensorFault>) {
        self.queue.push_back(reading);
    }
}

impl Thermocouple for ScriptedThermocouple {
    async fn read_celsius(&mut self) -> Result<f32, SensorFault> {
        if let Some(next) = self.queue.pop_front() {
            self.last = next;
        }
        self.last
    }
}

// ── Display ───────────────────────────────────────────────────

pub struct MockLcd {
    rows: [[char; LCD_COLUMNS]; LCD_ROWS],
    col: usize,
    row: usize,
    pub writes: usize,
}

impl MockLcd {
    pub fn new() -> Self {
        Self {
            rows: [[' '; LCD_COLUMNS]; LCD_ROWS],
            col: 0,
            row: 0,
            writes: 0,
        }
    }

    pub fn row(&self, row: usize) -> String {
        self.rows[row].iter().collect()
    }

    pub fn trimmed(&self, row: usize) -> String {
        self.row(row).trim_end().to_string()
    }
}

impl CharacterDisplay for MockLcd {
    type Error = Infallible;

    async fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        self.col = col as usize;
        self.row = row as usize;
        Ok(())
    }

    async fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
        for ch in text.chars() {
            if self.col < LCD_COLUMNS {
                self.rows[self.row][self.col] = ch;
                self.col += 1;
            }
        }
        self.writes += 1;
        Ok(())
    }
}

/// Every operation fails.
pub struct BrokenLcd;

impl CharacterDisplay for BrokenLcd {
    type Error = ();

    async fn set_cursor(&mut self, _col: u8, _row: u8) -> Result<(), Self::Error> {
        Err(())
    }

    async fn write_str(&mut self, _text: &str) -> Result<(), Self::Error> {
        Err(())
    }
}

// ── Telemetry ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockTelemetry {
    pub lines: Vec<String>,
}

impl TelemetrySink for MockTelemetry {
    type Error = Infallible;

    async fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

// ── Assembled board ───────────────────────────────────────────

pub struct Board {
    pub button: MockPin,
    pub flow: MockPin,
    pub ssr: MockPin,
    pub psu: MockPin,
}

pub type TestLoop<D> = ControlLoop<ScriptedThermocouple, MockPin, MockPin, D, MockTelemetry>;

/// Source-compatible settings regardless of enabled cargo features.
pub fn plain_config() -> ControllerConfig {
    ControllerConfig::new()
        .with_hysteresis(0.0)
        .with_flow_policy(FlowPolicy::Advisory)
}

pub fn build_with<D: CharacterDisplay>(
    config: ControllerConfig,
    first: Result<f32, SensorFault>,
    display: D,
) -> (TestLoop<D>, Board) {
    let board = Board {
        // Released button (pull-up HIGH), no flow, outputs start HIGH so
        // initialisation is observable.
        button: MockPin::new(true),
        flow: MockPin::new(false),
        ssr: MockPin::new(true),
        psu: MockPin::new(false),
    };
    let sensor = TemperatureSensor::new(ScriptedThermocouple::new(first), &config);
    let hardware = Hardware::init(
        sensor,
        board.button.clone(),
        board.flow.clone(),
        board.ssr.clone(),
        board.psu.clone(),
    );
    let reporter = StatusReporter::new(display, MockTelemetry::default());
    let control = ControlLoop::new(hardware, HeaterController::new(config), reporter);
    (control, board)
}

pub fn build(first: Result<f32, SensorFault>) -> (TestLoop<MockLcd>, Board) {
    build_with(plain_config(), first, MockLcd::new())
}
