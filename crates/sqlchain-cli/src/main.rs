use std::fs;

use clap::Parser;
use cli::{Args, Commands};
use error::{CliError, Result};
use logging::setup_logging;
use sqlchain_config::config::{
    self, generate_default_config, get_config, set_config_path, Config, LiteralSets,
};
use sqlchain_db::{Backend, Db, LiteralMode};
use tracing::{debug, info};

mod cli;
mod error;
mod logging;
mod schema;
mod users;
mod utils;

fn literal_mode(config: &Config) -> LiteralMode {
    match config.literal_sets() {
        LiteralSets::Inline => LiteralMode::Inline,
        LiteralSets::Bind => LiteralMode::Bind,
    }
}

/// Opens the configured database, creating its parent directory.
fn open_db(config: &Config) -> Result<Db> {
    let backend: Backend = config.backend().parse()?;
    let path = config.get_db_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| CliError::IoError {
            action: format!("creating directory {}", parent.display()),
            source,
        })?;
    }

    debug!("using {} database at {}", backend, path.display());
    Ok(Db::new(backend, path)?)
}

fn load() -> Result<(Config, Db, LiteralMode)> {
    config::init()?;
    let config = get_config();
    let db = open_db(&config)?;
    let mode = literal_mode(&config);
    Ok((config, db, mode))
}

fn handle_cli() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        utils::set_color(false);
    }

    if let Some(ref c) = args.config {
        set_config_path(c)?;
    }

    match args.command {
        Commands::DefConfig => {
            let path = generate_default_config()?;
            info!("Default configuration file generated at {}", path.display());
        }
        Commands::Schema => {
            for statement in schema::create_statements()? {
                println!("{statement};");
            }
        }
        Commands::Init {
            seed,
        } => {
            let (_, db, mode) = load()?;
            schema::init_database(&db, mode, seed)?;
        }
        Commands::Users {
            since,
        } => {
            let (config, db, mode) = load()?;
            let since = since
                .or(config.since)
                .unwrap_or_else(|| users::DEFAULT_SINCE.to_string());
            users::print_users(&db, mode, &since, args.json)?;
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
