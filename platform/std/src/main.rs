use clap::Parser;
use embassy_executor::Spawner;
use heater_controller::platform::{control_task, SimOptions};
use heater_controller::usb_interface::usb_task;
use log::*;

/// Run the heater controller against a simulated oven.
#[derive(Parser, Debug)]
#[clap(version)]
struct Args {
    /// Starting and ambient temperature in °C
    #[clap(long, default_value_t = 25.0)]
    ambient: f32,

    /// Heating rate with the SSR closed, °C per second
    #[clap(long, default_value_t = 3.0)]
    heating_rate: f32,

    /// Simulate the interlock button released
    #[clap(long)]
    released: bool,

    /// Simulate no flow on the hall sensor
    #[clap(long)]
    no_flow: bool,

    /// Report an open thermocouple after this many reads
    #[clap(long)]
    open_after: Option<u32>,

    /// Draw the status rows on a simulated pixel panel (shown with RUST_LOG=trace)
    #[clap(long)]
    panel: bool,
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .parse_default_env()
        .format_timestamp_nanos()
        .init();

    let args = Args::parse();
    info!("Starting simulation: {:?}", args);

    let options = SimOptions {
        ambient_c: args.ambient,
        heating_rate: args.heating_rate,
        button_pressed: !args.released,
        flow: !args.no_flow,
        open_circuit_after: args.open_after,
        panel: args.panel,
        ..SimOptions::default()
    };

    spawner.spawn(control_task(options).unwrap());
    spawner.spawn(usb_task().unwrap());
}
