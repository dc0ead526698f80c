//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// shimpack - Package a SWIG shim and its extension behind a clean facade
#[derive(Parser)]
#[command(name = "shimpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Destination root. An existing <ROOT>/<package> is deleted and replaced
    ///
    /// Relative paths given on the command line are resolved against the
    /// directory shimpack is run from, even with `-C`.
    pub target_root: Option<PathBuf>,

    /// Directory containing the shim and its compiled extension
    #[arg(short = 'C', long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// Configuration file (defaults to shimpack.toml in the working directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read the shim namespace from a symbol manifest instead of Python
    /// (`shim.manifest` in a config file is relative to the working directory)
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Python interpreter used to introspect the shim
    #[arg(long, value_name = "EXE", env = "SHIMPACK_PYTHON")]
    pub python: Option<PathBuf>,

    /// Package directory name
    #[arg(long)]
    pub package_name: Option<String>,

    /// Shim module name
    #[arg(long)]
    pub shim_module: Option<String>,

    /// Show what would be written and moved without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
