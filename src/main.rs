mod args;
mod topsis_cli;

use clap::Parser;
use log::{debug, LevelFilter};

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    debug!("args: {:?}", args);

    if let Err(e) = topsis_cli::run_with_args(&args) {
        eprintln!("{}", topsis_cli::error_report(&e));
        std::process::exit(1);
    }
}
