use clap::ValueEnum;
use rent_solver::{
    assignment::welfare_maximizing,
    export::{export_lp, export_mps},
    io::LabelledDivision,
    pricing::envy_free_program,
};
use std::{io::Write, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Mps,
    Lp,
}

impl ExportFormat {
    /// Write the pricing program for the division's welfare-maximizing assignment
    pub fn export<W: Write>(
        &self,
        division: &LabelledDivision,
        buffer: &mut W,
    ) -> anyhow::Result<()> {
        let valuations = division.valuations();
        let assignment = welfare_maximizing(valuations);
        let program = envy_free_program(valuations, &assignment, division.budget());

        match self {
            Self::Mps => export_mps("rent_division", &program, buffer)?,
            Self::Lp => export_lp(&program, buffer)?,
        };
        Ok(())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mps" | "MPS" => Ok(Self::Mps),
            "lp" | "LP" => Ok(Self::Lp),
            _ => Err(Self::Err::ExportExtension(s.to_owned())),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ExportFormatError {
    #[error("Unknown export format: {0}")]
    ExportExtension(String),
}
