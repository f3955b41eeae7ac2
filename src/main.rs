use clap::Parser;
use log::warn;
use snafu::ErrorCompat;

mod args;
mod intake;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    match intake::run_intake(&args) {
        Ok(outcome) => {
            if outcome.forwarded == Some(false) {
                warn!(
                    "main: artifact {} was stored but could not be forwarded",
                    outcome.artifact_name
                );
            }
            println!("{}", outcome.artifact_name);
        }
        Err(e) => {
            eprintln!("An error occurred {}", e);
            if let Some(bt) = ErrorCompat::backtrace(e.as_ref()) {
                eprintln!("trace: {}", bt);
            }
            std::process::exit(1);
        }
    }
}
