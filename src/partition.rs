//! Dataset layout options.
//!
//! Two settings drive the charset/partition layout of a dataset:
//!
//! - the codon-position selection (which positions of each codon triplet
//!   end up in the matrix), and
//! - the partitioning scheme (how those positions are split into charsets).
//!
//! Both come from user input, so each enum parses from the textual values
//! accepted on the command line and rejects anything outside the fixed set.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised when a layout option falls outside its enumerated set.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum OptionError {
    #[error("codon positions should be one of: 1st, 2nd, 3rd, 1st-2nd or ALL (got '{0}')")]
    UnknownCodonPositions(String),

    #[error("partitioning should be one of: 'by gene', 'by codon position' or '1st-2nd, 3rd' (got '{0}')")]
    UnknownPartitioning(String),
}

/// Which codon positions of each triplet are kept in the output matrix.
///
/// An unset selection normalizes to `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodonPositions {
    First,
    Second,
    Third,
    FirstSecond,
    #[default]
    All,
}

impl CodonPositions {
    /// True for the single-position selections (1st, 2nd or 3rd).
    pub fn is_single(self) -> bool {
        matches!(self, Self::First | Self::Second | Self::Third)
    }
}

impl fmt::Display for CodonPositions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::First => "1st",
            Self::Second => "2nd",
            Self::Third => "3rd",
            Self::FirstSecond => "1st-2nd",
            Self::All => "ALL",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for CodonPositions {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1st" => Ok(Self::First),
            "2nd" => Ok(Self::Second),
            "3rd" => Ok(Self::Third),
            "1st-2nd" => Ok(Self::FirstSecond),
            "ALL" | "all" => Ok(Self::All),
            other => Err(OptionError::UnknownCodonPositions(other.to_string())),
        }
    }
}

/// How codon positions are split across charsets and sub-blocks.
///
/// An unset scheme normalizes to `ByGene`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Partitioning {
    /// One charset per gene.
    #[default]
    ByGene,
    /// One charset per codon position of each gene.
    ByCodonPosition,
    /// Combined 1st-2nd positions in one charset, 3rd in another.
    FirstSecondThird,
}

impl fmt::Display for Partitioning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ByGene => "by gene",
            Self::ByCodonPosition => "by codon position",
            Self::FirstSecondThird => "1st-2nd, 3rd",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Partitioning {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by gene" => Ok(Self::ByGene),
            "by codon position" => Ok(Self::ByCodonPosition),
            "1st-2nd, 3rd" | "1st-2nd & 3rd" => Ok(Self::FirstSecondThird),
            other => Err(OptionError::UnknownPartitioning(other.to_string())),
        }
    }
}
