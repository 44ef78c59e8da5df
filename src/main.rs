//! `myenv` command-line entry point.
use std::io::Write as _;
use std::process::ExitCode;

use clap::Parser;

use myenv::cli::{Cli, Command};
use myenv::commands;
use myenv::exec::SystemExecutor;
use myenv::logging::{self, Logger};
use myenv::platform::SystemEnvironment;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let name = args.command.log_name();
    logging::init_subscriber(args.verbose, name);
    let log = Logger::new(name);

    let env = SystemEnvironment;
    let executor = SystemExecutor;
    let global = &args.global;
    let mut stdout = std::io::stdout().lock();

    let result = match &args.command {
        Command::Create(opts) => commands::edit::create(global, &opts.name, &env, &executor, &log),
        Command::Edit(opts) => commands::edit::edit(global, &opts.name, &env, &executor, &log),
        Command::Install => commands::install::run(global, &env, &executor, &log),
        Command::Profile => commands::profile::run(global, &env, &executor, &log, &mut stdout),
        Command::List => commands::list::run(global, &env, &executor, &log, &mut stdout),
        Command::Git(opts) => commands::git::run(global, &opts.args, &env, &executor, &log),
        Command::Version => commands::version::run(&mut stdout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = stdout.flush();
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
