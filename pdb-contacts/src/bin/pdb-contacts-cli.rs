use clap::Parser;
use env_logger::Builder;
use log::{error, LevelFilter};
use pdb_contacts::application::{run, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
    } else {
        let mut verbosity_level = LevelFilter::Info;
        if cli.verbose {
            verbosity_level = LevelFilter::Debug
        };
        if cli.trace {
            verbosity_level = LevelFilter::Trace
        };

        let mut builder = Builder::new();
        builder
            .filter_module("pdb_contacts", verbosity_level)
            .filter_module("pdb_contacts_cli", verbosity_level)
            .format_target(false)
            .init();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            ExitCode::FAILURE
        }
    }
}
