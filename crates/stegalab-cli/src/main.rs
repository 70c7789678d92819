use clap::Parser;
use log::debug;

mod cli;
mod commands;

use cli::{CliArgs, Commands};
use stegalab_core::SteganoError;

pub type CliResult<T> = Result<T, SteganoError>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let options = args.codec_options();
    debug!("codec options: {options:?}");

    match args.command {
        Commands::Hide(hide) => hide.run(options),
        Commands::Unveil(unveil) => unveil.run(options),
        Commands::Evaluate(evaluate) => evaluate.run(),
        Commands::Compare(compare) => compare.run(options),
        Commands::Capacity(capacity) => capacity.run(options),
    }
}
