use crate::display::{CharacterDisplay, DisplaySnapshot};
use crate::log::warn;
use crate::telemetry::{temperature_line, TelemetrySink};

/// Writes each cycle's snapshot to the display and the telemetry line.
///
/// Failures on either output are logged and otherwise ignored.
pub struct StatusReporter<D, T> {
    display: D,
    telemetry: T,
}

impl<D, T> StatusReporter<D, T>
where
    D: CharacterDisplay,
    T: TelemetrySink,
{
    pub fn new(display: D, telemetry: T) -> Self {
        Self { display, telemetry }
    }

    pub async fn render(&mut self, snapshot: &DisplaySnapshot) {
        for (row, text) in snapshot.rows().iter().enumerate() {
            if self.display.set_cursor(0, row as u8).await.is_err() {
                warn!("Display cursor move to row {} failed", row);
                continue;
            }
            if self.display.write_str(text.as_str()).await.is_err() {
                warn!("Display write to row {} failed", row);
            }
        }

        let line = temperature_line(&snapshot.reading);
        if self.telemetry.write_line(line.as_str()).await.is_err() {
            warn!("Telemetry write failed");
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }
}
