//! Main entry point for the wc3mdl CLI

mod cli;
mod commands;
mod utils;

use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::{Generator, generate};
use std::io;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if cli.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    match cli.command {
        Commands::Info { file, detailed } => commands::info::execute(&file, detailed, cli.strict),
        Commands::Validate { patterns, warnings } => {
            commands::validate::execute(&patterns, warnings, cli.strict, cli.quiet)
        }
        Commands::Convert {
            input,
            output,
            comment,
            no_timestamp,
            no_validate,
        } => commands::convert::execute(
            &input,
            &output,
            &commands::convert::ConvertOptions {
                comment,
                no_timestamp,
                validate: !no_validate,
                strict: cli.strict,
            },
        ),
        Commands::Optimize {
            input,
            output,
            tolerance,
            skip,
        } => commands::optimize::execute(&input, &output, tolerance, &skip, cli.strict),
        Commands::Tree {
            file,
            depth,
            no_color,
            compact,
        } => commands::tree::execute(&file, depth, no_color, compact, cli.strict),
        #[cfg(feature = "serde")]
        Commands::Dump { file, compact } => commands::dump::execute(&file, compact, cli.strict),
        Commands::Completions { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
