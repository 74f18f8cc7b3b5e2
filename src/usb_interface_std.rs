use crate::log::{error, info, warn};
use crate::CURRENT_STATE;
use embassy_time::Timer;

/// Mirrors the JSON state stream the board sends over USB.
#[embassy_executor::task]
pub async fn usb_task() {
    info!("Starting state stream");
    let Some(mut receiver) = CURRENT_STATE.receiver() else {
        error!("No state receiver available");
        return;
    };

    loop {
        let state = receiver.changed().await;
        match state.to_json() {
            Some(json) => info!("{}", json.as_str()),
            None => warn!("State did not fit the JSON buffer"),
        }
        Timer::after_secs(1).await;
    }
}
