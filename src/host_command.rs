//! Line commands sent by the desktop control panel.
//!
//! Heating is decided locally from the button and the thermocouple, so
//! these are recognised for logging only.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub enum HostCommand {
    HeaterOn,
    HeaterOff,
    Motor(u8),
    Step(i32),
}

impl HostCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line {
            "HEATER_ON" => return Some(HostCommand::HeaterOn),
            "HEATER_OFF" => return Some(HostCommand::HeaterOff),
            _ => {}
        }

        let (name, value) = line.split_once(':')?;
        let value = value.trim();
        match name.trim() {
            "MOTOR" => value.parse().ok().map(HostCommand::Motor),
            "STEP" => value.parse().ok().map(HostCommand::Step),
            _ => None,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            HostCommand::HeaterOn => "HEATER_ON",
            HostCommand::HeaterOff => "HEATER_OFF",
            HostCommand::Motor(_) => "MOTOR",
            HostCommand::Step(_) => "STEP",
        }
    }
}
