use defmt::{error, Debug2Format};
use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUartTx};
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use static_cell::StaticCell;

use crate::config::{ControllerConfig, LCD_I2C_ADDR, SERIAL_BAUD_RATE};
use crate::control_loop::ControlLoop;
use crate::hardware::Hardware;
use crate::heater_controller::HeaterController;
use crate::lcd_i2c::Lcd;
use crate::max6675::Max6675;
use crate::resources::{
    InterlockResources, LcdResources, PowerResources, Spi0Bus, TelemetryResources,
    ThermocoupleResources,
};
use crate::status_reporter::StatusReporter;
use crate::telemetry::SerialTelemetry;
use crate::temperature_sensor::TemperatureSensor;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// MAX6675 tops out at 4.3 MHz and shifts data out on the falling edge.
pub fn thermocouple_spi_config() -> spi::Config {
    let mut config = spi::Config::default();
    config.frequency = 1_000_000;
    config.phase = spi::Phase::CaptureOnSecondTransition;
    config.polarity = spi::Polarity::IdleLow;
    config
}

#[embassy_executor::task]
pub async fn control_task(
    thermocouple: ThermocoupleResources,
    interlock: InterlockResources,
    power: PowerResources,
    lcd: LcdResources,
    telemetry: TelemetryResources,
) {
    let config = ControllerConfig::new();
    // Pins are left untouched, so the SSR stays off
    if let Err(e) = config.validate() {
        error!("Invalid controller configuration, heater stays off: {}", e);
        return;
    }

    let spi = Spi::new_rxonly(
        thermocouple.spi,
        thermocouple.clk,
        thermocouple.miso,
        thermocouple.tx_dma,
        thermocouple.rx_dma,
        thermocouple_spi_config(),
    );
    static SPI_BUS: StaticCell<Spi0Bus> = StaticCell::new();
    let spi_bus = SPI_BUS.init(Mutex::new(spi));

    let cs = Output::new(thermocouple.cs, Level::High);
    let sensor = TemperatureSensor::new(Max6675::new(SpiDevice::new(spi_bus, cs)), &config);

    let button = Input::new(interlock.button, Pull::Up);
    let flow = Input::new(interlock.flow, Pull::None);
    let ssr = Output::new(power.ssr, Level::Low);
    let psu = Output::new(power.psu, Level::Low);
    let hardware = Hardware::init(sensor, button, flow, ssr, psu);

    let bus = I2c::new_async(lcd.i2c, lcd.scl, lcd.sda, Irqs, i2c::Config::default());
    let mut display = Lcd::new(bus, Delay, LCD_I2C_ADDR);
    if let Err(e) = display.init().await {
        error!("LCD init failed: {}", Debug2Format(&e));
    }

    static TX_BUFFER: StaticCell<[u8; 64]> = StaticCell::new();
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = SERIAL_BAUD_RATE;
    let tx = BufferedUartTx::new(
        telemetry.uart,
        Irqs,
        telemetry.tx,
        TX_BUFFER.init([0; 64]),
        uart_config,
    );

    let reporter = StatusReporter::new(display, SerialTelemetry::new(tx));
    let mut control = ControlLoop::new(hardware, HeaterController::new(config), reporter);
    control.run().await
}
