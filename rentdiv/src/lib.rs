use clap::Parser;
use rent_solver::{
    io::{AgentId, LabelledDivision},
    verify,
};
use std::{io::Write as _, path::PathBuf};
use tracing::{Level, event};

mod config;
pub use config::{AppConfig, ClarabelConfig};

mod io;
pub use io::*;

mod commands;
pub use commands::*;

// The top-level arguments: an optional config file and the subcommand to execute
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// A TOML configuration file
    #[arg(long, env = "RENTDIV_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    pub fn evaluate(self) -> anyhow::Result<()> {
        let config = AppConfig::load(self.config.as_deref())?;
        let divider = config.divider();

        match self.command {
            Commands::Solve { io } => {
                let division = io.division()?;
                let allocation = divider.divide(&division)?;
                io.report(&allocation)?;
            }
            Commands::Verify { io, allocation } => {
                let division = io.division()?;
                let allocation = read_allocation(&allocation)?;
                let certificate = verify::certify(&division, &allocation, config.precision)?;
                io.report(&certificate)?;

                if !certificate.is_valid() {
                    return Err(CliError::Uncertified)?;
                }
            }
            Commands::Swap {
                io,
                allocation,
                agent_a,
                agent_b,
            } => {
                let division: LabelledDivision = io.division()?;
                let allocation = read_allocation(&allocation)?;
                let report = verify::swap(
                    &division,
                    &allocation,
                    &AgentId::from(agent_a.as_str()),
                    &AgentId::from(agent_b.as_str()),
                )?;
                io.report(&report)?;
            }
            Commands::Export { io, format } => {
                let division = io.division()?;

                let format = if let Some(format) = format {
                    format
                } else if let Some(ext) = io.extension() {
                    ext.parse()?
                } else {
                    return Err(CliError::ExportInference)?;
                };

                event!(Level::DEBUG, ?format, "exporting pricing program");
                let mut output = io.write()?;
                format.export(&division, &mut output)?;
                output.flush()?;
            }
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Unable to infer export format, please specify a valid format")]
    ExportInference,
    #[error("The allocation failed certification")]
    Uncertified,
}
