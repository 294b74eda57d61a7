use clap::Parser;
use std::path::PathBuf;

/// Run a stride program by small-step rewriting
#[derive(Parser)]
#[command(name = "stride", version, about, long_about = None)]
pub struct Cli {
    /// Path to the program to run
    #[arg(value_name = "FILE", default_value = "./test")]
    pub file: PathBuf,
    /// Print every rewrite step to stderr
    #[arg(long, default_value_t = false)]
    pub trace: bool,
    /// Let unbound names reduce to null instead of failing
    #[arg(long, default_value_t = false)]
    pub permissive: bool,
    /// Lex and parse only (don't execute)
    #[arg(long, default_value_t = false)]
    pub check: bool,
    /// Compare what the program prints with the `.out` file next to it
    #[arg(long, default_value_t = false, conflicts_with = "check")]
    pub test: bool,
    /// Configuration file (defaults to `stride.toml` if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Level of verbosity
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
