use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::USB;
use embassy_rp::rom_data::reset_to_usb_boot;
use embassy_rp::usb::{Driver, InterruptHandler};
use embassy_usb_logger::ReceiverHandler;

use core::str;
use embassy_executor::Spawner;
use embassy_time::Timer;

use crate::host_command::HostCommand;
use crate::resources::UsbResources;
use crate::CURRENT_STATE;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

struct Handler;

impl ReceiverHandler for Handler {
    async fn handle_data(&self, data: &[u8]) {
        if let Ok(data) = str::from_utf8(data) {
            let data = data.trim();

            // elf2uf2-term sends this when the monitor closes with '-t'
            if data == "q" || data == "elf2uf2-term" {
                reset_to_usb_boot(0, 0);
            } else if let Some(cmd) = HostCommand::parse(data) {
                defmt::info!(
                    "Ignoring host command {}: heating follows the interlock button",
                    cmd.to_str()
                );
            } else {
                defmt::warn!("Unknown command: {}", data);
            }
        }
    }

    fn new() -> Self {
        Self
    }
}

#[embassy_executor::task]
async fn logger_task(driver: Driver<'static, USB>) {
    embassy_usb_logger::run!(1024, log::LevelFilter::Info, driver, Handler);
}

#[embassy_executor::task]
pub async fn usb_task(spawner: Spawner, r: UsbResources) {
    let driver = Driver::new(r.usb, Irqs);
    spawner.spawn(defmt::unwrap!(logger_task(driver)));

    let Some(mut receiver) = CURRENT_STATE.receiver() else {
        defmt::error!("No state receiver available for USB stream");
        return;
    };

    loop {
        let state = receiver.changed().await;
        match state.to_json() {
            Some(json) => log::info!("{}", json.as_str()),
            None => defmt::warn!("State did not fit the JSON buffer"),
        }
        Timer::after_secs(1).await;
    }
}
