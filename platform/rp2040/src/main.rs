#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use heater_controller::platform::control_task;
use heater_controller::usb_interface::usb_task;
use heater_controller::resources::{
    AssignedResources, InterlockResources, LcdResources, PowerResources, TelemetryResources,
    ThermocoupleResources, UsbResources,
};
use heater_controller::split_resources;
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let r = split_resources!(p);

    info!("Heater controller {}", heater_controller::VERSION);

    spawner.spawn(unwrap!(usb_task(spawner, r.usb)));
    spawner.spawn(unwrap!(control_task(
        r.thermocouple,
        r.interlock,
        r.power,
        r.lcd,
        r.telemetry,
    )));
}
