use core::fmt;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::config::{LCD_COLUMNS, LCD_ROWS};
use crate::display::CharacterDisplay;

/// HD44780 LCD driver error
#[derive(Debug)]
pub enum Error<I2cE> {
    I2c(I2cE),
    InvalidPosition,
}

impl<I2cE: fmt::Debug> fmt::Display for Error<I2cE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(_) => write!(f, "I2C error"),
            Error::InvalidPosition => write!(f, "Invalid cursor position"),
        }
    }
}

/// PCF8574 port bits wired to the HD44780
mod pin {
    pub const RS: u8 = 0b0000_0001;
    pub const EN: u8 = 0b0000_0100;
    pub const BACKLIGHT: u8 = 0b0000_1000;
}

pub enum LcdCommand {
    ClearDisplay = 0x01,
    EntryModeIncrement = 0x06,
    DisplayOn = 0x0C,
    FunctionSet4Bit2Line = 0x28,
    SetDdramAddress = 0x80,
}

/// DDRAM start address of each row on a 20x4 module
const ROW_OFFSETS: [u8; LCD_ROWS] = [0x00, 0x40, 0x14, 0x54];

/// HD44780 character LCD behind a PCF8574 I2C expander, driven in 4-bit mode
pub struct Lcd<I2C, D> {
    addr: u8,
    i2c: I2C,
    delay: D,
    backlight: u8,
}

impl<I2C, D, E> Lcd<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, addr: u8) -> Self {
        Lcd {
            addr,
            i2c,
            delay,
            backlight: pin::BACKLIGHT,
        }
    }

    /// Power-on reset into 4-bit mode, clear, display on, backlight on
    pub async fn init(&mut self) -> Result<(), Error<E>> {
        self.delay.delay_ms(50).await;

        // Three 8-bit function sets, then switch to 4-bit
        self.write_nibble(0x30, 0).await?;
        self.delay.delay_us(4500).await;
        self.write_nibble(0x30, 0).await?;
        self.delay.delay_us(4500).await;
        self.write_nibble(0x30, 0).await?;
        self.delay.delay_us(150).await;
        self.write_nibble(0x20, 0).await?;

        self.command(LcdCommand::FunctionSet4Bit2Line as u8).await?;
        self.command(LcdCommand::DisplayOn as u8).await?;
        self.clear().await?;
        self.command(LcdCommand::EntryModeIncrement as u8).await?;
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<(), Error<E>> {
        self.command(LcdCommand::ClearDisplay as u8).await?;
        self.delay.delay_ms(2).await;
        Ok(())
    }

    pub async fn set_backlight(&mut self, on: bool) -> Result<(), Error<E>> {
        self.backlight = if on { pin::BACKLIGHT } else { 0 };
        self.i2c
            .write(self.addr, &[self.backlight])
            .await
            .map_err(Error::I2c)
    }

    pub async fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Error<E>> {
        if col as usize >= LCD_COLUMNS || row as usize >= LCD_ROWS {
            return Err(Error::InvalidPosition);
        }
        let address = ROW_OFFSETS[row as usize] + col;
        self.command(LcdCommand::SetDdramAddress as u8 | address).await
    }

    pub async fn write_str(&mut self, text: &str) -> Result<(), Error<E>> {
        for byte in text.bytes() {
            // The character ROM only covers printable ASCII reliably
            let ch = if byte.is_ascii() && !byte.is_ascii_control() {
                byte
            } else {
                b'?'
            };
            self.send(ch, pin::RS).await?;
        }
        Ok(())
    }

    async fn command(&mut self, value: u8) -> Result<(), Error<E>> {
        self.send(value, 0).await
    }

    async fn send(&mut self, value: u8, mode: u8) -> Result<(), Error<E>> {
        self.write_nibble(value & 0xF0, mode).await?;
        self.write_nibble((value << 4) & 0xF0, mode).await?;
        Ok(())
    }

    /// Present the high nibble on D4..D7 and strobe EN
    async fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), Error<E>> {
        let data = nibble | mode | self.backlight;
        self.i2c
            .write(self.addr, &[data | pin::EN, data])
            .await
            .map_err(Error::I2c)?;
        self.delay.delay_us(50).await;
        Ok(())
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D, E> CharacterDisplay for Lcd<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    type Error = Error<E>;

    async fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        Lcd::set_cursor(self, col, row).await
    }

    async fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
        Lcd::write_str(self, text).await
    }
}
