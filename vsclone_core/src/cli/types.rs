use clap::{Args, Parser, Subcommand, ValueHint};
use clap_verbosity_flag::Verbosity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Parser)]
#[command(name = "vsclone", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub commands: Commands,
    #[command(flatten)]
    pub verbose: Verbosity,

    /// Inventory snapshot to resolve identifiers against (json).
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub inventory: Option<String>,
}

#[derive(Debug, Subcommand, Clone, Eq, PartialEq)]
pub enum Commands {
    /// Check that the clone source fits the declaration.
    #[command(arg_required_else_help = true)]
    Validate(DeclarationArgs),
    /// Build the clone request of a declaration.
    #[command(arg_required_else_help = true)]
    Clone(DeclarationArgs),
    /// Build the instant clone request of a declaration.
    #[command(arg_required_else_help = true)]
    InstantClone(InstantCloneArgs),
}

#[derive(Default, Debug, Args, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DeclarationArgs {
    /// Virtual machine declaration (toml).
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: String,
}

#[derive(Default, Debug, Args, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct InstantCloneArgs {
    #[command(flatten)]
    pub declaration: DeclarationArgs,
    /// Managed object id of the folder to create the virtual machine in.
    #[arg(long, value_name = "MOID")]
    pub folder: String,
}
