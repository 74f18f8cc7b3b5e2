use core::fmt;

/// Reasons a temperature sample could not be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub enum SensorFault {
    /// Amplifier reports the thermocouple input as open.
    OpenCircuit,
    /// Value is NaN or outside the amplifier's measurable range.
    OutOfRange,
    /// The read did not complete within the sensor timeout.
    Timeout,
    /// The bus transfer to the amplifier failed.
    Bus,
}

impl SensorFault {
    /// Short upper-case tag used on the display and the serial line.
    pub fn tag(&self) -> &'static str {
        match self {
            SensorFault::OpenCircuit => "OPEN",
            SensorFault::OutOfRange => "RANGE",
            SensorFault::Timeout => "TIMEOUT",
            SensorFault::Bus => "BUS",
        }
    }
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorFault::OpenCircuit => write!(f, "Thermocouple open circuit"),
            SensorFault::OutOfRange => write!(f, "Temperature out of range"),
            SensorFault::Timeout => write!(f, "Sensor read timed out"),
            SensorFault::Bus => write!(f, "Sensor bus error"),
        }
    }
}

/// Rejected controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub enum ConfigError {
    NonFiniteLimit,
    NegativeHysteresis,
    HysteresisTooWide,
    EmptyValidRange,
    ZeroPeriod,
    ZeroTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonFiniteLimit => write!(f, "Temperature limits must be finite"),
            ConfigError::NegativeHysteresis => write!(f, "Hysteresis must not be negative"),
            ConfigError::HysteresisTooWide => {
                write!(f, "Hysteresis band extends below the valid range")
            }
            ConfigError::EmptyValidRange => write!(f, "Valid temperature range is empty"),
            ConfigError::ZeroPeriod => write!(f, "Cycle period must be non-zero"),
            ConfigError::ZeroTimeout => write!(f, "Sensor timeout must be non-zero"),
        }
    }
}
