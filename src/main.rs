use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Context;

use datavis::config::Settings;
use datavis::data::loader::load_file;
use datavis::menu;
use datavis::session::{self, Session};

fn run(input: impl BufRead, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    menu::display_banner(out)?;

    let cwd = std::env::current_dir().context("resolving working directory")?;
    let settings = Settings::discover(&cwd).context("loading datavis.toml")?;

    let dataset = match load_file(&settings.input) {
        Ok(ds) => ds,
        Err(e) => {
            log::error!("Failed to load {}: {e}", settings.input.display());
            eprintln!("Error: {e}");
            eprintln!("Cannot proceed without data. Exiting...");
            return Ok(ExitCode::FAILURE);
        }
    };
    session::describe_load(&dataset, out)?;

    let mut session = Session::new(dataset, settings);
    menu::run(&mut session, input, out)?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match run(stdin.lock(), &mut stdout) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\nAn unexpected error occurred: {e:#}");
            ExitCode::FAILURE
        }
    }
}
