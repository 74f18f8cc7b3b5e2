use assign_resources::assign_resources;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{self, Spi};
use embassy_rp::{peripherals, Peri};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;

pub type Spi0Bus = Mutex<NoopRawMutex, Spi<'static, SPI0, spi::Async>>;

assign_resources! {
    thermocouple: ThermocoupleResources {
        spi: SPI0,
        clk: PIN_2,
        miso: PIN_0,
        cs: PIN_3,
        tx_dma: DMA_CH0,
        rx_dma: DMA_CH1,
    },
    interlock: InterlockResources {
        button: PIN_7,
        flow: PIN_6,
    },
    power: PowerResources {
        ssr: PIN_5,
        psu: PIN_8,
    },
    lcd: LcdResources {
        i2c: I2C0,
        sda: PIN_20,
        scl: PIN_21,
    },
    telemetry: TelemetryResources {
        uart: UART0,
        tx: PIN_12,
    },
    usb: UsbResources {
        usb: USB,
    },
}
