use core::fmt::Write as _;
use embedded_io_async::Write;
use heapless::String;

use crate::temperature_sensor::SensorResult;

pub type TelemetryLine = String<32>;

/// Line-oriented status channel
pub trait TelemetrySink {
    type Error;

    /// Write one line; the terminator is appended by the sink.
    async fn write_line(&mut self, line: &str) -> Result<(), Self::Error>;
}

/// `TEMP(C): <value>` with two decimals, or `TEMP(C): FAULT <KIND>`.
pub fn temperature_line(reading: &SensorResult) -> TelemetryLine {
    let mut line = TelemetryLine::new();
    let _ = match reading {
        Ok(reading) => write!(line, "TEMP(C): {:.2}", reading.celsius),
        Err(fault) => write!(line, "TEMP(C): FAULT {}", fault.tag()),
    };
    line
}

/// Telemetry over a byte-oriented serial writer, CRLF terminated
pub struct SerialTelemetry<W> {
    writer: W,
}

impl<W: Write> SerialTelemetry<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn release(self) -> W {
        self.writer
    }
}

impl<W: Write> TelemetrySink for SerialTelemetry<W> {
    type Error = W::Error;

    async fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await
    }
}
