use super::IOArgs;
use clap::Subcommand;
use std::path::PathBuf;

mod export;
pub use export::ExportFormat;

#[derive(Subcommand)]
pub enum Commands {
    /// Solve the division and report the allocation
    Solve {
        #[command(flatten)]
        io: IOArgs,
    },

    /// Re-certify a stored allocation against its division, failing on envy
    Verify {
        #[command(flatten)]
        io: IOArgs,

        /// The allocation JSON file, as written by `solve`
        #[arg(short, long)]
        allocation: PathBuf,
    },

    /// Report whether two agents of a stored allocation would trade places
    Swap {
        #[command(flatten)]
        io: IOArgs,

        /// The allocation JSON file, as written by `solve`
        #[arg(short, long)]
        allocation: PathBuf,

        /// The first agent
        agent_a: String,

        /// The second agent
        agent_b: String,
    },

    /// Construct the envy-free pricing program and export to a standard format
    Export {
        #[command(flatten)]
        io: IOArgs,

        /// The file format to use (if omitted, will infer based on filename)
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },
}
