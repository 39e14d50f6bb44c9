use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use cli::args::{Cli, Command};
use scenario_store::{FileStore, ScenarioStore, Session};

fn main() -> Result<()> {
    let args = Cli::parse();

    let settings = settings_loader::load_settings_with_fallback(args.settings.as_ref())
        .context("Loading settings")?;
    let settings = settings_loader::with_env_overrides(settings);
    logger::init(&settings.log_filter);
    tracing::debug!(
        "Using storage dir {} (key '{}')",
        settings.storage_dir.display(),
        settings.scenarios_key
    );

    let pretty = settings.pretty_json;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.command {
        Command::Template { out: path, force } => cli::template(path, *force, pretty, &mut out)?,
        Command::Analyze { input, json } => cli::analyze(input, *json, pretty, &mut out)?,
        Command::Report { input, out: path } => cli::report(input, path.as_deref(), &mut out)?,
        Command::Set { input, field, value } => {
            cli::set_field(input, field, value, pretty, &mut out)?
        }
        Command::Mode { input, mode } => cli::set_mode(input, *mode, pretty, &mut out)?,
        Command::Unit(cmd) => cli::unit(cmd, pretty, &mut out)?,
        Command::Scenario(cmd) => {
            let backend = FileStore::new(&settings.storage_dir);
            let mut session = Session::new(ScenarioStore::open(backend, settings.scenarios_key.as_str()));
            cli::scenario(cmd, &mut session, pretty, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
