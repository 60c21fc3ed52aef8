use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "datestamp-renamer")]
#[command(
    about = "Renames 'dd_mm_yyyy hh_mm_ss' file names in watched folders to 'yyyy-mm-dd hh-mm-ss'",
    long_about = None
)]
pub struct Cli {
    /// Watch list file with one directory per line, overriding the configured one
    #[arg(long, global = true)]
    pub watch_list: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sweep the watched directories, then watch them and retry locked files until Ctrl-C (default)
    Run,
    /// Sweep the watched directories once and exit
    Sweep,
    /// Print the renames a sweep would perform without touching any file
    Preview,
    /// Print configuration values
    PrintConfig,
}
