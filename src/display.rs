use core::fmt::Write as _;
use heapless::String;

use crate::config::LCD_COLUMNS;
use crate::heater_controller::HeaterState;
use crate::interlock::InterlockState;
use crate::temperature_sensor::SensorResult;

/// A text display addressed by column and row.
pub trait CharacterDisplay {
    type Error;

    async fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error>;

    async fn write_str(&mut self, text: &str) -> Result<(), Self::Error>;
}

pub type Row = String<LCD_COLUMNS>;

/// Values shown for one control cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySnapshot {
    pub reading: SensorResult,
    pub interlock: InterlockState,
    pub heater: HeaterState,
}

impl DisplaySnapshot {
    pub fn temperature_row(&self) -> Row {
        let mut row = Row::new();
        let _ = match self.reading {
            Ok(reading) => write!(row, "Temp: {:.2} C", reading.celsius),
            Err(fault) => write!(row, "Temp: FAULT {}", fault.tag()),
        };
        pad(row)
    }

    pub fn flow_row(&self) -> Row {
        let mut row = Row::new();
        let _ = row.push_str(if self.interlock.flow_detected {
            "Flow: ON"
        } else {
            "Flow: OFF"
        });
        pad(row)
    }

    pub fn button_row(&self) -> Row {
        let mut row = Row::new();
        let _ = row.push_str(if self.interlock.button_asserted {
            "Btn: Pressed"
        } else {
            "Btn: Released"
        });
        pad(row)
    }

    /// Rows in display order, each padded to the full width.
    pub fn rows(&self) -> [Row; 3] {
        [self.temperature_row(), self.flow_row(), self.button_row()]
    }
}

/// Fill to the display width so shorter text overwrites longer text.
fn pad(mut row: Row) -> Row {
    while row.len() < LCD_COLUMNS {
        if row.push(' ').is_err() {
            break;
        }
    }
    row
}
