use clap::Parser;
use icon_caster::{ArgumentResolver, CliArguments, IconCaster};
use log::info;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args = CliArguments::parse();

    // Log to stdout (if you run with `RUST_LOG=debug`).
    tracing_subscriber::fmt::init();

    info!("Started generation.");
    let request = ArgumentResolver::default()
        .resolve_cli(args)
        .unwrap_or_else(|error| error.exit());
    info!("Acquired arguments: {request:?}.");

    match IconCaster::new().cast(&request) {
        Ok(report) => println!("{report}"),
        Err(error) if error.is_fatal() => return Err(error.into()),
        // Already logged by the caster.
        Err(_) => {}
    }
    Ok(())
}
