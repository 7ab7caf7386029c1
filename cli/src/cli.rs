// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf, process::ExitCode};

use almanac_core::{APP_NAME, Almanac, ExpansionCache, FileCache, MemoryCache, MemoryStore};
use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::cmd_conflicts::CmdConflicts;
use crate::cmd_day::CmdDay;
use crate::cmd_expand::CmdExpand;
use crate::cmd_generate_completion::CmdGenerateCompletion;
use crate::cmd_matrix::CmdMatrix;
use crate::cmd_split::CmdSplit;
use crate::config::{Config, parse_config};
use crate::data::DataFile;

/// The engine as driven from the command line.
pub type Engine = Almanac<MemoryStore, Box<dyn ExpansionCache>>;

/// Run the Almanac command-line interface.
pub fn run() -> ExitCode {
    let result = Cli::parse().and_then(|cli| {
        init_tracing(cli.verbose);
        cli.run()
    });
    report(result)
}

/// Print a failed command in red and turn the outcome into an exit status.
fn report(result: Result<(), Box<dyn Error>>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` unless verbose output is requested.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// Log debug output
    pub verbose: bool,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Recurrence expansion and scheduling conflicts for shared calendars.")
            .author("The Almanac Authors")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $ALMANAC_CONFIG, then \
$XDG_CONFIG_HOME/almanac/config.toml on Linux and MacOS, %APPDATA%/almanac/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath)
                    .global(true),
            )
            .arg(arg!(-v --verbose "Log debug output to stderr").global(true))
            .subcommand(CmdExpand::command())
            .subcommand(CmdDay::command())
            .subcommand(CmdConflicts::command())
            .subcommand(CmdSplit::command())
            .subcommand(CmdMatrix::command())
            .subcommand(CmdGenerateCompletion::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some((CmdExpand::NAME, matches)) => Expand(CmdExpand::from(matches)),
            Some((CmdDay::NAME, matches)) => Day(CmdDay::from(matches)),
            Some((CmdConflicts::NAME, matches)) => Conflicts(CmdConflicts::from(matches)),
            Some((CmdSplit::NAME, matches)) => Split(CmdSplit::from(matches)),
            Some((CmdMatrix::NAME, matches)) => Matrix(CmdMatrix::from(matches)),
            Some((CmdGenerateCompletion::NAME, matches)) => {
                GenerateCompletion(CmdGenerateCompletion::from(matches))
            }
            Some((name, _)) => return Err(format!("Unknown command: {name}").into()),
            None => return Err("No command given".into()),
        };

        let config = matches.get_one("config").cloned();
        let verbose = matches.get_flag("verbose");
        Ok(Cli {
            config,
            verbose,
            command,
        })
    }

    /// Run the command
    pub fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config)
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// List the dates of a repeating entry
    Expand(CmdExpand),

    /// Show the merged entries of a day
    Day(CmdDay),

    /// Check a proposed entry for conflicts
    Conflicts(CmdConflicts),

    /// Show the midnight fragments of an entry
    Split(CmdSplit),

    /// Show the free/busy matrix
    Matrix(CmdMatrix),

    /// Generate shell completion
    GenerateCompletion(CmdGenerateCompletion),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            Expand(a)    => Self::run_with(config, |x, _| a.run(x)),
            Day(a)       => Self::run_with(config, |x, c| a.run(x, c)),
            Conflicts(a) => Self::run_with(config, |x, c| a.run(x, c)),
            Split(a)     => Self::run_with(config, |x, _| a.run(x)),
            Matrix(a)    => Self::run_with(config, |x, _| a.run(x)),
            GenerateCompletion(a) => a.run(),
        }
    }

    fn run_with<F>(config: Option<PathBuf>, f: F) -> Result<(), Box<dyn Error>>
    where
        F: FnOnce(&Engine, &Config) -> Result<(), Box<dyn Error>>,
    {
        tracing::debug!("parsing configuration...");
        let (mut core_config, config) = parse_config(config)?;
        core_config.normalize()?;

        let cache: Box<dyn ExpansionCache> = match &core_config.cache_dir {
            Some(dir) => Box::new(FileCache::open(dir)?),
            None => Box::new(MemoryCache::new()),
        };
        let store = DataFile::load(config.data_path()?)?.into_store()?;
        let almanac = Almanac::new(core_config, store, cache)?;

        f(&almanac, &config)
    }
}
