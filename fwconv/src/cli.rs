use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "fwconv")]
#[command(about = "Translate firewall configurations between vendor dialects")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Convert one config to another vendor dialect.
    Convert(ConvertArgs),
    /// List supported vendors.
    Vendors(VendorsArgs),
    /// List conversion targets for a source vendor.
    Targets(TargetsArgs),
    /// Parse one config and show what was recognized.
    Inspect(InspectArgs),
    /// Report unresolved object references in one config.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Source config file to convert.
    pub input: PathBuf,
    /// Source vendor id (cisco-asa, cisco-ftd, fortigate, palo-alto).
    #[arg(long)]
    pub from: String,
    /// Target vendor id.
    #[arg(long)]
    pub to: String,
    /// Output file path. Generated text goes to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Output format for the result summary.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Alternative vendor catalogue / support matrix (TOML).
    #[arg(long)]
    pub matrix_file: Option<PathBuf>,
    /// Fail when an address group names an undeclared object.
    #[arg(long)]
    pub strict_references: bool,
}

#[derive(Parser, Debug)]
pub struct VendorsArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Alternative vendor catalogue / support matrix (TOML).
    #[arg(long)]
    pub matrix_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct TargetsArgs {
    /// Source vendor id.
    pub source: String,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Alternative vendor catalogue / support matrix (TOML).
    #[arg(long)]
    pub matrix_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Config file to parse.
    pub input: PathBuf,
    /// Source vendor id.
    #[arg(long)]
    pub from: String,
    /// Output format (json prints the full parsed model).
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Config file to check.
    pub input: PathBuf,
    /// Source vendor id.
    #[arg(long)]
    pub from: String,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Treat warnings as failures.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
