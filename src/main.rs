use clap::{CommandFactory, Parser};
use console::style;
use cpignore::config::Cli;
use cpignore::CpignoreError;
use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cpignore=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // No arguments at all: show usage instead of a missing --dist error.
    if std::env::args_os().len() <= 1 {
        if let Err(err) = Cli::command().print_help() {
            eprintln!("{}", style(err).red());
            return ExitCode::FAILURE;
        }
        println!();
        return ExitCode::SUCCESS;
    }

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", style(err).red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let manifest_path = cli.manifest.clone();
    let options = cli.into_options()?;
    let manifest = cpignore::run(options)?;

    if let Some(path) = manifest_path {
        let file = File::create(&path).map_err(|e| CpignoreError::at(&path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &manifest)?;
    }

    Ok(())
}
