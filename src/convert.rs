//! Conversion of an interleaved NEXUS matrix into FASTA or relaxed PHYLIP.
//!
//! PHYLIP and plain FASTA datasets are produced by first rendering the
//! NEXUS header and matrix, then re-reading that matrix here. Sequence
//! chunks for the same taxon label are concatenated across gene blocks,
//! so the interleaved matrix comes out sequential.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised during NEXUS conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("could not find a MATRIX section in the NEXUS input")]
    MissingMatrix,

    #[error("malformed matrix line: '{0}'")]
    MalformedLine(String),

    #[error("scratch file error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Formats a NEXUS matrix can be converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Fasta,
    PhylipRelaxed,
}

/// Converts a NEXUS-formatted dataset into the target format.
pub fn convert_nexus(nexus: &str, target: TargetFormat) -> ConvertResult<String> {
    let entries = parse_matrix(nexus)?;
    let rendered = match target {
        TargetFormat::Fasta => render_fasta(&entries),
        TargetFormat::PhylipRelaxed => render_phylip(&entries),
    };
    Ok(roundtrip_through_scratch(&rendered)?)
}

/// Taxon labels mapped to their concatenated sequences, in first-seen order.
fn parse_matrix(nexus: &str) -> ConvertResult<Vec<(String, String)>> {
    let mut in_matrix = false;
    let mut entries: Vec<(String, String)> = Vec::new();

    for line in nexus.lines() {
        let line = line.trim();

        if !in_matrix {
            if line.eq_ignore_ascii_case("MATRIX") {
                in_matrix = true;
            }
            continue;
        }

        if line.starts_with(';') || line.eq_ignore_ascii_case("END;") {
            break;
        }
        // Gene markers in the matrix are bracketed comments.
        if line.is_empty() || line.starts_with('[') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let label = tokens
            .next()
            .ok_or_else(|| ConvertError::MalformedLine(line.to_string()))?;
        let chunk: String = tokens.collect();
        if chunk.is_empty() {
            return Err(ConvertError::MalformedLine(line.to_string()));
        }

        match entries.iter_mut().find(|(name, _)| name == label) {
            Some((_, seq)) => seq.push_str(&chunk),
            None => entries.push((label.to_string(), chunk)),
        }
    }

    if !in_matrix || entries.is_empty() {
        return Err(ConvertError::MissingMatrix);
    }
    Ok(entries)
}

fn render_fasta(entries: &[(String, String)]) -> String {
    let mut out = String::new();
    for (label, seq) in entries {
        out.push_str(&format!(">{}\n{}\n", label, seq));
    }
    out
}

fn render_phylip(entries: &[(String, String)]) -> String {
    let nchars = entries.iter().map(|(_, seq)| seq.len()).max().unwrap_or(0);
    let longest_label = entries.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let mut out = format!("{} {}\n", entries.len(), nchars);
    for (label, seq) in entries {
        out.push_str(&format!("{:<width$}{}\n", label, seq, width = longest_label + 2));
    }
    out
}

fn scratch_path() -> PathBuf {
    let tag: u64 = rand::random();
    env::temp_dir().join(format!("phylowriter-{:016x}.txt", tag))
}

/// Writes the rendered text to a uniquely named scratch file, reads it
/// back and removes the file.
fn roundtrip_through_scratch(contents: &str) -> io::Result<String> {
    let path = scratch_path();
    fs::write(&path, contents)?;
    let read_back = fs::read_to_string(&path);
    fs::remove_file(&path)?;
    read_back
}
