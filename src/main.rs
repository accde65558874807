use std::{error::Error, process::ExitCode};

use clap::Parser;
use svnfetch::{
    cli::args::{CliArgs, Command},
    Svnfetch,
};

fn run() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = CliArgs::parse();

    let mut builder = Svnfetch::builder()
        .descriptor_file_name(&cli_args.descriptor)
        .source_directory_name(&cli_args.source_directory);
    if let Some(home) = &cli_args.home {
        builder = builder.home(home);
    }
    if let Some(client) = &cli_args.client {
        builder = builder.client(client);
    }
    if let Some(settings) = &cli_args.settings {
        builder = builder.settings_file_name(settings);
    }
    let svnfetch = builder.try_build()?;

    match cli_args.cmd {
        Command::Fetch => svnfetch.fetch(),
        Command::Validate => svnfetch.validate(),
        Command::Url => {
            println!("{}", svnfetch.url()?);
            Ok(())
        }
        Command::Clean => svnfetch.clean(),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
