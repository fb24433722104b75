// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "voxel-lattice")]
#[command(about = "Global lattice voxel renderer", long_about = None)]
pub struct Cli {
    /// Render the lattice with line polygon mode
    #[arg(long, default_value = "false")]
    pub wireframe: bool,

    /// Disable the debug overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Path to a JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}
