//! Audio output device listing command.

use clap::Args;
use tonada_io::{default_output_device, list_devices};

#[derive(Args)]
pub struct DevicesArgs {}

pub fn run(_args: DevicesArgs) -> anyhow::Result<()> {
    let devices = list_devices()?;

    if devices.is_empty() {
        println!("No audio output devices found.");
        return Ok(());
    }

    println!("Output Devices");
    println!("==============\n");

    for (idx, device) in devices.iter().enumerate() {
        println!(
            "  [{}] {} ({} Hz, {} ch)",
            idx, device.name, device.default_sample_rate, device.channels
        );
    }
    println!();

    match default_output_device()? {
        Some(device) => println!("Default: {}", device.name),
        None => println!("Default: none"),
    }

    println!();
    println!("Tip: pick a device by index, exact name, or partial name:");
    println!("  tonada play --device 0");
    println!("  tonada play --device \"USB\"");

    Ok(())
}
