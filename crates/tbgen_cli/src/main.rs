//! tbgen CLI: parse SystemVerilog DUT headers and generate testbenches.
//!
//! Provides `tbgen parse` to print a DUT's parameters and ports, `tbgen check`
//! to report (and optionally fix) malformed headers, `tbgen generate` to write
//! a testbench skeleton, and `tbgen init` to create a `tbgen.toml`.

#![warn(missing_docs)]

mod check;
mod generate;
mod init;
mod logging;
mod parse;
mod pipeline;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// tbgen: DUT header parser and testbench generator.
#[derive(Parser, Debug)]
#[command(name = "tbgen", version, about = "SystemVerilog DUT parser and testbench generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `tbgen.toml` to use instead of searching for one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the parameters and ports of each DUT.
    Parse(ParseArgs),
    /// Report problems in DUT headers.
    Check(CheckArgs),
    /// Write a testbench for a DUT.
    Generate(GenerateArgs),
    /// Write a default tbgen.toml.
    Init {
        /// Directory to write it in. Defaults to the current directory.
        dir: Option<PathBuf>,
    },
}

/// Arguments for the `tbgen parse` subcommand.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// DUT files, or directories to search for `.sv`/`.v` files.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format for the parsed DUTs and diagnostics.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Module to treat as the DUT (default: the first module in each file).
    #[arg(long)]
    pub top: Option<String>,
}

/// Arguments for the `tbgen check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// DUT files, or directories to search for `.sv`/`.v` files.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Apply suggested fixes in place.
    #[arg(long)]
    pub fix: bool,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the `tbgen generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// The DUT file.
    pub file: PathBuf,

    /// Output path (default: `<dut dir>/<dut><suffix>.sv`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Module to treat as the DUT (default: the first module).
    #[arg(long)]
    pub top: Option<String>,

    /// Regenerate even if the existing testbench is up to date, and overwrite
    /// files tbgen did not write.
    #[arg(long)]
    pub force: bool,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format for `tbgen parse` and `tbgen check`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Dict-style DUT listings and rustc-style diagnostics.
    Text,
    /// A JSON array of DUTs and one JSON object per diagnostic.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Parse(ref args) => parse::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Generate(ref args) => generate::run(args, &global),
        Command::Init { dir } => init::run(dir, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
