use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "filerctl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative reconciliation of filer qtrees and volumes", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: filerctl.toml in the config directory)
    #[arg(long, global = true, env = "FILERCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Manifest file, overriding the configured one
    #[arg(short, long, global = true)]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show what apply would change
    Plan(PlanArgs),

    /// Converge the filer to the manifest
    Apply(ApplyArgs),

    /// Show every declared resource and whether it is converged
    Status(TargetArgs),

    /// Validate the manifest without contacting the filer
    Validate,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Qtree,
    Volume,
}

impl KindArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Qtree => "qtree",
            Self::Volume => "volume",
        }
    }
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Only this kind
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,

    /// Only resources whose name contains this text
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Show what would change without committing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Worker threads used to evaluate declarations
    #[arg(short, long, default_value = "4")]
    pub jobs: usize,
}
