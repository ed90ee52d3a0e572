//! Zwick-style degeneration of protein-coding nucleotide sequences.
//!
//! Degeneration recodes each codon so that synonymous positions carry IUPAC
//! ambiguity codes (`GCA` and `GCG` both become `GCN`), removing most
//! third-position substitution noise before tree inference. The baseline
//! table follows the Degen coding: six-fold leucine collapses to `YTN`,
//! six-fold arginine to `MGN`, and the two serine families stay apart as
//! `TCN` and `AGY`.
//!
//! The method variants differ only in how serine is handled:
//!
//! - `Normal`: baseline table, both serine families kept.
//! - `S`: the `TCN` serine family is recoded to `NNN`.
//! - `Z`: the `AGY` serine family is recoded to `NNN`.
//! - `SZ`: every serine codon is recoded to `NNN`.
//!
//! Codons containing ambiguity or missing characters come back as `NNN`;
//! all-gap codons are kept as `---`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error raised for a degeneration method outside the fixed set.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("degenerate method should be one of: S, Z, SZ or normal (got '{0}')")]
pub struct UnknownMethod(pub String);

/// A serine-handling variant of the Degen coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenMethod {
    S,
    Z,
    SZ,
    Normal,
}

impl fmt::Display for DegenMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::S => "S",
            Self::Z => "Z",
            Self::SZ => "SZ",
            Self::Normal => "normal",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DegenMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" | "s" => Ok(Self::S),
            "Z" | "z" => Ok(Self::Z),
            "SZ" | "sz" => Ok(Self::SZ),
            "normal" | "Normal" => Ok(Self::Normal),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

/// Degenerates a single upper-case codon.
pub fn degenerate_codon(codon: &str, method: DegenMethod) -> &'static str {
    if codon == "---" {
        return "---";
    }
    match base_degenerate(codon) {
        Some("TCN") if matches!(method, DegenMethod::S | DegenMethod::SZ) => "NNN",
        Some("AGY") if matches!(method, DegenMethod::Z | DegenMethod::SZ) => "NNN",
        Some(degen) => degen,
        None => "NNN",
    }
}

/// Degenerates a whole sequence codon by codon, starting at `offset`.
///
/// A trailing incomplete codon is dropped, matching the codon-wise reading
/// used for translation.
pub fn degenerate_sequence(seq: &str, offset: usize, method: DegenMethod) -> String {
    let chars: Vec<char> = seq.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut pos = offset;
    while pos + 3 <= chars.len() {
        let codon: String = chars[pos..pos + 3]
            .iter()
            .map(|c| c.to_ascii_uppercase())
            .collect();
        out.push_str(degenerate_codon(&codon, method));
        pos += 3;
    }
    out
}

/// The baseline Degen table over the standard code's amino acid families.
fn base_degenerate(codon: &str) -> Option<&'static str> {
    let degen = match codon {
        "TTT" | "TTC" => "TTY",
        "TTA" | "TTG" | "CTT" | "CTC" | "CTA" | "CTG" => "YTN",
        "ATT" | "ATC" | "ATA" => "ATH",
        "ATG" => "ATG",
        "GTT" | "GTC" | "GTA" | "GTG" => "GTN",
        "TCT" | "TCC" | "TCA" | "TCG" => "TCN",
        "AGT" | "AGC" => "AGY",
        "CCT" | "CCC" | "CCA" | "CCG" => "CCN",
        "ACT" | "ACC" | "ACA" | "ACG" => "ACN",
        "GCT" | "GCC" | "GCA" | "GCG" => "GCN",
        "TAT" | "TAC" => "TAY",
        "TAA" | "TAG" => "TAR",
        "TGA" => "TGA",
        "CAT" | "CAC" => "CAY",
        "CAA" | "CAG" => "CAR",
        "AAT" | "AAC" => "AAY",
        "AAA" | "AAG" => "AAR",
        "GAT" | "GAC" => "GAY",
        "GAA" | "GAG" => "GAR",
        "TGT" | "TGC" => "TGY",
        "TGG" => "TGG",
        "CGT" | "CGC" | "CGA" | "CGG" | "AGA" | "AGG" => "MGN",
        "GGT" | "GGC" | "GGA" | "GGG" => "GGN",
        _ => return None,
    };
    Some(degen)
}
