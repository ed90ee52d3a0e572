//! Output dataset formats.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error raised for a format name outside the supported set.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("format should be one of: NEXUS, PHYLIP, FASTA, TNT, MEGA, GenBankFASTA or Bankit (got '{0}')")]
pub struct UnknownFormat(pub String);

/// A dataset format this crate can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Nexus,
    Phylip,
    Fasta,
    Tnt,
    Mega,
    GenbankFasta,
    Bankit,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Nexus => "NEXUS",
            OutputFormat::Phylip => "PHYLIP",
            OutputFormat::Fasta => "FASTA",
            OutputFormat::Tnt => "TNT",
            OutputFormat::Mega => "MEGA",
            OutputFormat::GenbankFasta => "GenBankFASTA",
            OutputFormat::Bankit => "Bankit",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nexus" => Ok(OutputFormat::Nexus),
            "phylip" => Ok(OutputFormat::Phylip),
            "fasta" => Ok(OutputFormat::Fasta),
            "tnt" => Ok(OutputFormat::Tnt),
            "mega" => Ok(OutputFormat::Mega),
            "genbankfasta" => Ok(OutputFormat::GenbankFasta),
            "bankit" => Ok(OutputFormat::Bankit),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}
