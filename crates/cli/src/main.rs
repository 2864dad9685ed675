use std::io::{stdout, Write};
use std::process::ExitCode;

use clap::Parser;
use log::debug;
use mita_cli::cli_args::Args;
use mita_cli::command_selection::{build_selector, TerminalConsole};
use mita_cli::router::{RunOptions, Router};
use mita_cli::subcommands;
use mita_cli::system_commands::Session;
use mita_core::config::{get_editor, Config};
use mita_core::error::Result;
use mita_core::store::Store;

fn execute() -> Result<()> {
    let args = Args::parse();
    let config = Config::resolve(&args.database_path, &args.selector);
    debug!("Database path: `{}`", config.database_path);

    let store = Store::open(&config.database_path)?;

    if let Some(command) = args.command {
        let mut stdout = stdout();
        subcommands::run(command, &store, &config, &mut stdout)?;
        stdout.flush()?;
        return Ok(());
    }

    let selector = build_selector(&config.selector);
    let console = TerminalConsole::new(get_editor());
    let router = Router::new(Session {
        store: &store,
        selector: selector.as_ref(),
        console: &console,
        reserved_prefix: &config.reserved_prefix,
    });

    let options = RunOptions {
        find_mode: args.find_mode,
        no_render: args.no_render,
    };

    if let Some(text) = router.run(options)?.printable(options) {
        let mut stdout = stdout();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
