//! Host simulation: a thermal model behind the thermocouple, pins backed by
//! atomics, the LCD mirrored into the log (or drawn on a pixel panel) and
//! telemetry on stdout.

use core::convert::Infallible;
use embassy_time::{Duration, Instant};
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use portable_atomic::{AtomicBool, Ordering};
use std::io::Write as _;
use std::string::String;

use crate::config::{ControllerConfig, LCD_COLUMNS, LCD_ROWS};
use crate::control_loop::ControlLoop;
use crate::display::CharacterDisplay;
use crate::error::{ConfigError, SensorFault};
use crate::hardware::Hardware;
use crate::heater_controller::HeaterController;
use crate::log::{debug, error, trace};
use crate::status_reporter::StatusReporter;
use crate::telemetry::TelemetrySink;
use crate::temperature_sensor::{TemperatureSensor, Thermocouple};
use crate::text_display::TextDisplay;

pub static SSR_LEVEL: AtomicBool = AtomicBool::new(false);
pub static PSU_LEVEL: AtomicBool = AtomicBool::new(false);
/// Pull-up: HIGH until the simulated button is pressed.
pub static BUTTON_LEVEL: AtomicBool = AtomicBool::new(true);
pub static FLOW_LEVEL: AtomicBool = AtomicBool::new(false);

/// A GPIO whose level lives in a static atomic.
pub struct SimPin(&'static AtomicBool);

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.load(Ordering::Relaxed))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.load(Ordering::Relaxed))
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.store(true, Ordering::Relaxed);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimOptions {
    pub ambient_c: f32,
    /// °C per second with the SSR closed and no losses
    pub heating_rate: f32,
    /// Fraction of the excess over ambient lost per second
    pub loss_coefficient: f32,
    pub button_pressed: bool,
    pub flow: bool,
    /// Report an open thermocouple from this read onwards
    pub open_circuit_after: Option<u32>,
    /// Render the status rows on a simulated pixel panel instead of the LCD
    pub panel: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            ambient_c: 25.0,
            heating_rate: 3.0,
            loss_coefficient: 0.01,
            button_pressed: true,
            flow: true,
            open_circuit_after: None,
            panel: false,
        }
    }
}

/// Lumped thermal mass heated through the simulated SSR.
pub struct SimulatedOven {
    temperature: f32,
    options: SimOptions,
    last_update: Instant,
    reads: u32,
}

impl SimulatedOven {
    pub fn new(options: SimOptions) -> Self {
        Self {
            temperature: options.ambient_c,
            options,
            last_update: Instant::now(),
            reads: 0,
        }
    }

    /// Advance the model by `dt` with the given heater drive.
    pub fn step(&mut self, dt: Duration, heating: bool) {
        let dt_s = dt.as_micros() as f32 / 1_000_000.0;
        let heat_input = if heating {
            self.options.heating_rate
        } else {
            0.0
        };
        let heat_loss = self.options.loss_coefficient * (self.temperature - self.options.ambient_c);
        self.temperature += (heat_input - heat_loss) * dt_s;
        if self.temperature < self.options.ambient_c {
            self.temperature = self.options.ambient_c;
        }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

impl Thermocouple for SimulatedOven {
    async fn read_celsius(&mut self) -> Result<f32, SensorFault> {
        let now = Instant::now();
        let heating = SSR_LEVEL.load(Ordering::Relaxed) && PSU_LEVEL.load(Ordering::Relaxed);
        self.step(now - self.last_update, heating);
        self.last_update = now;

        self.reads = self.reads.saturating_add(1);
        if let Some(after) = self.options.open_circuit_after {
            if self.reads > after {
                return Err(SensorFault::OpenCircuit);
            }
        }

        // Quantise like the MAX6675
        Ok((self.temperature * 4.0).round() / 4.0)
    }
}

/// Keeps a copy of the LCD contents and logs each row as it is written.
pub struct LogDisplay {
    rows: [[u8; LCD_COLUMNS]; LCD_ROWS],
    col: usize,
    row: usize,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self {
            rows: [[b' '; LCD_COLUMNS]; LCD_ROWS],
            col: 0,
            row: 0,
        }
    }

    pub fn row(&self, row: usize) -> &str {
        core::str::from_utf8(&self.rows[row]).unwrap_or("")
    }
}

impl Default for LogDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterDisplay for LogDisplay {
    type Error = Infallible;

    async fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        self.col = (col as usize).min(LCD_COLUMNS);
        self.row = (row as usize).min(LCD_ROWS - 1);
        Ok(())
    }

    async fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
        for byte in text.bytes() {
            if self.col >= LCD_COLUMNS {
                break;
            }
            self.rows[self.row][self.col] = if byte.is_ascii() { byte } else { b'?' };
            self.col += 1;
        }
        debug!("lcd[{}] |{}|", self.row, self.row(self.row));
        Ok(())
    }
}

const PANEL_WIDTH: usize = LCD_COLUMNS * 6;
const PANEL_HEIGHT: usize = LCD_ROWS * 10;

/// Monochrome framebuffer sized for the LCD's grid in `FONT_6X10` cells.
pub struct PixelPanel {
    pixels: [[bool; PANEL_WIDTH]; PANEL_HEIGHT],
}

impl PixelPanel {
    pub fn new() -> Self {
        Self {
            pixels: [[false; PANEL_WIDTH]; PANEL_HEIGHT],
        }
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.pixels[y][x]
    }

    /// One line per pixel row, `#` for lit pixels.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((PANEL_WIDTH + 1) * PANEL_HEIGHT);
        for row in &self.pixels {
            out.extend(row.iter().map(|&lit| if lit { '#' } else { ' ' }));
            out.push('\n');
        }
        out
    }
}

impl Default for PixelPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for PixelPanel {
    fn size(&self) -> Size {
        Size::new(PANEL_WIDTH as u32, PANEL_HEIGHT as u32)
    }
}

impl DrawTarget for PixelPanel {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                if x < PANEL_WIDTH && y < PANEL_HEIGHT {
                    self.pixels[y][x] = color.is_on();
                }
            }
        }
        Ok(())
    }
}

/// Status rows drawn as text on a [`PixelPanel`], traced after each write.
pub struct PanelDisplay {
    text: TextDisplay<PixelPanel>,
}

impl PanelDisplay {
    pub fn new() -> Self {
        Self {
            text: TextDisplay::new(PixelPanel::new(), BinaryColor::On, BinaryColor::Off),
        }
    }

    pub fn panel(&self) -> &PixelPanel {
        self.text.target()
    }
}

impl Default for PanelDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterDisplay for PanelDisplay {
    type Error = Infallible;

    async fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        self.text.set_cursor(col, row).await
    }

    async fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
        self.text.write_str(text).await?;
        trace!("panel\n{}", self.panel().render());
        Ok(())
    }
}

/// Telemetry lines on stdout, standing in for the 9600 baud UART.
pub struct StdoutTelemetry;

impl TelemetrySink for StdoutTelemetry {
    type Error = std::io::Error;

    async fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()
    }
}

/// Validate `config`, then run the control loop against the simulated oven.
///
/// An invalid configuration is returned before any simulated pin is touched.
pub async fn run_simulation(
    config: ControllerConfig,
    options: SimOptions,
) -> Result<Infallible, ConfigError> {
    config.validate()?;

    BUTTON_LEVEL.store(!options.button_pressed, Ordering::Relaxed);
    FLOW_LEVEL.store(options.flow, Ordering::Relaxed);

    if options.panel {
        run_with_display(config, options, PanelDisplay::new()).await
    } else {
        run_with_display(config, options, LogDisplay::new()).await
    }
}

async fn run_with_display<D: CharacterDisplay>(
    config: ControllerConfig,
    options: SimOptions,
    display: D,
) -> ! {
    let sensor = TemperatureSensor::new(SimulatedOven::new(options), &config);
    let hardware = Hardware::init(
        sensor,
        SimPin(&BUTTON_LEVEL),
        SimPin(&FLOW_LEVEL),
        SimPin(&SSR_LEVEL),
        SimPin(&PSU_LEVEL),
    );
    let reporter = StatusReporter::new(display, StdoutTelemetry);
    let mut control = ControlLoop::new(hardware, HeaterController::new(config), reporter);
    control.run().await
}

#[embassy_executor::task]
pub async fn control_task(options: SimOptions) {
    if let Err(e) = run_simulation(ControllerConfig::new(), options).await {
        error!("Invalid controller configuration, heater stays off: {}", e);
    }
}
