use core::fmt;
use embedded_hal_async::spi::SpiDevice;

use crate::error::SensorFault;
use crate::log::debug;
use crate::temperature_sensor::Thermocouple;

/// Scaling factor for the 12-bit temperature field (°C/LSB)
const TEMP_SCALE: f32 = 0.25;

bitflags::bitflags! {
    /// Status bits of the 16-bit MAX6675 frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameFlags: u16 {
        const DEVICE_ID         = 0b0000_0000_0000_0010;
        const OPEN_THERMOCOUPLE = 0b0000_0000_0000_0100;
        const DUMMY_SIGN        = 0b1000_0000_0000_0000;
    }
}

/// MAX6675 driver error
#[derive(Debug)]
pub enum Error<SpiE> {
    Spi(SpiE),
    /// All-zero frame: MISO held low by an absent or unpowered chip
    NoResponse,
    OpenThermocouple,
    DataFormat,
}

impl<SpiE: fmt::Debug> fmt::Display for Error<SpiE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Spi(_) => write!(f, "SPI error"),
            Error::NoResponse => write!(f, "No response from MAX6675"),
            Error::OpenThermocouple => write!(f, "Thermocouple input open"),
            Error::DataFormat => write!(f, "Data format error"),
        }
    }
}

/// MAX6675 K-type thermocouple-to-digital converter
pub struct Max6675<SPI> {
    spi: SPI,
}

impl<SPI, E> Max6675<SPI>
where
    SPI: SpiDevice<Error = E>,
{
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Read the raw 16-bit frame (big-endian)
    pub async fn read_frame(&mut self) -> Result<u16, Error<E>> {
        let mut buf = [0u8; 2];
        self.spi.read(&mut buf).await.map_err(Error::Spi)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read hot-junction temperature in Celsius
    pub async fn read_celsius(&mut self) -> Result<f32, Error<E>> {
        let frame = self.read_frame().await?;
        Self::decode(frame)
    }

    /// Decode a frame into Celsius, checking the status bits
    ///
    /// A frame of all zeros is rejected even though it would decode to 0 °C:
    /// it is what a missing chip looks like on a floating-low MISO line.
    pub fn decode(frame: u16) -> Result<f32, Error<E>> {
        if frame == 0 {
            return Err(Error::NoResponse);
        }
        let flags = FrameFlags::from_bits_truncate(frame);
        // D15 is a dummy sign bit and D1 the device ID; both always read 0
        if flags.intersects(FrameFlags::DUMMY_SIGN | FrameFlags::DEVICE_ID) {
            return Err(Error::DataFormat);
        }
        if flags.contains(FrameFlags::OPEN_THERMOCOUPLE) {
            return Err(Error::OpenThermocouple);
        }
        let counts = (frame >> 3) & 0x0FFF;
        Ok(counts as f32 * TEMP_SCALE)
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, E> Thermocouple for Max6675<SPI>
where
    SPI: SpiDevice<Error = E>,
{
    async fn read_celsius(&mut self) -> Result<f32, SensorFault> {
        Max6675::read_celsius(self).await.map_err(|err| match err {
            Error::OpenThermocouple => SensorFault::OpenCircuit,
            Error::DataFormat => SensorFault::OutOfRange,
            Error::NoResponse => {
                debug!("MAX6675 returned an all-zero frame");
                SensorFault::Bus
            }
            Error::Spi(_) => {
                debug!("MAX6675 SPI transfer failed");
                SensorFault::Bus
            }
        })
    }
}
