use clap::Parser;
use linux_embedded_hal::{
    CdevPin, Delay,
    gpio_cdev::{Chip, LineRequestFlags},
};
use onewire_bitbang::{BitBang, HalLine, OneWireSearch};

/// Enumerate the devices on a bit-banged 1-Wire bus
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the GPIO character device (e.g., /dev/gpiochip0)
    #[arg(short, long, default_value = "/dev/gpiochip0")]
    chip: String,
    /// Offset of the line wired to the 1-Wire bus
    #[arg(short, long)]
    line: u32,
    /// Only list devices of this family code (hex, e.g. 28)
    #[arg(short, long, value_parser = parse_family)]
    family: Option<u8>,
    /// Number of sweeps over the bus
    #[arg(short, long, default_value_t = 1)]
    sweeps: u32,
}

fn parse_family(arg: &str) -> Result<u8, String> {
    let digits = arg.trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(digits, 16).map_err(|e| format!("invalid family code {arg:?}: {e}"))
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    // Request the line as an open-drain output, released
    let mut chip = Chip::new(&args.chip).expect("Failed to open GPIO chip");
    let handle = chip
        .get_line(args.line)
        .expect("Failed to get GPIO line")
        .request(
            LineRequestFlags::OUTPUT | LineRequestFlags::OPEN_DRAIN,
            1,
            "onewire-bitbang",
        )
        .expect("Failed to request GPIO line");
    let pin = CdevPin::new(handle).expect("Failed to create GPIO pin");
    // Create the 1-Wire bus master
    let mut bus =
        BitBang::new(HalLine::new(pin, Delay)).expect("Failed to initialize the 1-Wire line");
    for sweep in 1..=args.sweeps {
        let mut search = match args.family {
            Some(family) => OneWireSearch::with_family(&mut bus, family),
            None => OneWireSearch::new(&mut bus),
        };
        let mut devices = 0;
        while let Some(rom) = search.next().expect("Failed to search the 1-Wire bus") {
            log::info!("ROM: {rom} ({rom:016x})");
            devices += 1;
        }
        if let Some(fault) = search.state().last_fault() {
            log::debug!("Sweep {sweep} ended with {fault:?}");
        }
        log::info!("Sweep {sweep}: found {devices} devices");
    }
}
