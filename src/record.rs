//! Annotated sequence records.
//!
//! A [`SeqRecord`] carries one gene fragment for one voucher specimen along
//! with the metadata the dataset writers need: taxonomy ranks, the reading
//! frame and the genetic code table. The record also exposes the codon-aware
//! views of its sequence (single codon positions, translation, Zwick-style
//! degeneration) so the rendering code never touches biology directly.
//!
//! Records are read-only during a rendering pass. Input lists are expected
//! to be sorted by gene code and then by voucher code.

use thiserror::Error;

use crate::degen::{self, DegenMethod};
use crate::genetic_code::{self, CodonAa};
use crate::partition::CodonPositions;

/// Errors raised while deriving a view of a record's sequence.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("sequence {voucher} of gene {gene} has no reading frame")]
    MissingReadingFrame { gene: String, voucher: String },

    #[error("unknown genetic code table {0}")]
    UnknownTable(u8),

    #[error("cannot translate sequence {voucher} of gene {gene}: codon '{codon}' mixes gaps and nucleotides")]
    MixedGapCodon {
        gene: String,
        voucher: String,
        codon: String,
    },
}

/// Result type for record operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// The 1-based offset at which codon triplets begin within a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingFrame {
    One,
    Two,
    Three,
}

impl ReadingFrame {
    /// Builds a frame from its 1-based integer form.
    pub fn from_int(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    /// Zero-based offset of the first complete codon.
    pub fn offset(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
            Self::Three => 2,
        }
    }
}

/// Taxonomy ranks attached to a record. Every rank is optional.
///
/// The rank order below is the order used when flattening the taxonomy
/// into a taxon label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomy {
    pub orden: Option<String>,
    pub superfamily: Option<String>,
    pub family: Option<String>,
    pub subfamily: Option<String>,
    pub tribe: Option<String>,
    pub subtribe: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
    pub subspecies: Option<String>,
    pub author: Option<String>,
    pub hostorg: Option<String>,
}

impl Taxonomy {
    /// The genus, or an empty string when unset.
    pub fn genus(&self) -> &str {
        self.genus.as_deref().unwrap_or("")
    }

    /// The species, or an empty string when unset.
    pub fn species(&self) -> &str {
        self.species.as_deref().unwrap_or("")
    }

    /// Flattens the present ranks into an underscore-joined suffix.
    ///
    /// The result starts with an underscore when any rank is present, so it
    /// can be appended directly to a voucher code. Spaces become
    /// underscores, runs of underscores collapse, and a trailing underscore
    /// is dropped.
    pub fn flatten(&self) -> String {
        let ranks = [
            &self.orden,
            &self.superfamily,
            &self.family,
            &self.subfamily,
            &self.tribe,
            &self.subtribe,
            &self.genus,
            &self.species,
            &self.subspecies,
            &self.author,
            &self.hostorg,
        ];

        let mut out = String::new();
        for rank in ranks.into_iter().flatten() {
            out.push('_');
            out.push_str(rank);
        }
        let out = out.replace(' ', "_");

        // Collapse duplicate underscores and drop a trailing one.
        let mut collapsed = String::with_capacity(out.len());
        let mut last_underscore = false;
        for c in out.chars() {
            if c == '_' {
                if !last_underscore {
                    collapsed.push(c);
                }
                last_underscore = true;
            } else {
                collapsed.push(c);
                last_underscore = false;
            }
        }
        if collapsed.ends_with('_') {
            collapsed.pop();
        }
        collapsed
    }
}

/// One annotated sequence: a gene fragment for one voucher specimen.
#[derive(Debug, Clone)]
pub struct SeqRecord {
    /// Gene this fragment belongs to.
    pub gene_code: String,
    /// Voucher code of the specimen.
    pub voucher_code: String,
    /// Taxonomy ranks, all optional.
    pub taxonomy: Taxonomy,
    /// Raw sequence over {A,C,G,T,N,?,-}.
    pub seq: String,
    /// Reading frame, when known.
    pub reading_frame: Option<ReadingFrame>,
    /// NCBI genetic code table ID.
    pub table: u8,
    /// Free-form lineage text for GenBank-style headers.
    pub lineage: Option<String>,
}

impl SeqRecord {
    /// Creates a record with the Standard genetic code and no frame.
    pub fn new(
        gene_code: impl Into<String>,
        voucher_code: impl Into<String>,
        seq: impl Into<String>,
    ) -> Self {
        Self {
            gene_code: gene_code.into(),
            voucher_code: voucher_code.into(),
            taxonomy: Taxonomy::default(),
            seq: seq.into(),
            reading_frame: None,
            table: 1,
            lineage: None,
        }
    }

    fn frame_offset(&self) -> RecordResult<usize> {
        self.reading_frame
            .map(ReadingFrame::offset)
            .ok_or_else(|| RecordError::MissingReadingFrame {
                gene: self.gene_code.clone(),
                voucher: self.voucher_code.clone(),
            })
    }

    /// Characters whose position within their codon matches `keep`.
    fn select_positions(&self, keep: impl Fn(usize) -> bool) -> RecordResult<String> {
        let offset = self.frame_offset()?;
        Ok(self
            .seq
            .chars()
            .skip(offset)
            .enumerate()
            .filter(|(i, _)| keep(i % 3))
            .map(|(_, c)| c)
            .collect())
    }

    /// Every first codon position.
    pub fn first_codon_position(&self) -> RecordResult<String> {
        self.select_positions(|p| p == 0)
    }

    /// Every second codon position.
    pub fn second_codon_position(&self) -> RecordResult<String> {
        self.select_positions(|p| p == 1)
    }

    /// Every third codon position.
    pub fn third_codon_position(&self) -> RecordResult<String> {
        self.select_positions(|p| p == 2)
    }

    /// First and second codon positions, in sequence order.
    pub fn first_and_second_codon_positions(&self) -> RecordResult<String> {
        self.select_positions(|p| p != 2)
    }

    /// The sequence restricted to the given codon-position selection.
    ///
    /// `All` returns the sequence unchanged and needs no reading frame.
    pub fn codon_positions(&self, which: CodonPositions) -> RecordResult<String> {
        match which {
            CodonPositions::First => self.first_codon_position(),
            CodonPositions::Second => self.second_codon_position(),
            CodonPositions::Third => self.third_codon_position(),
            CodonPositions::FirstSecond => self.first_and_second_codon_positions(),
            CodonPositions::All => Ok(self.seq.clone()),
        }
    }

    /// Translates the sequence to amino acids using the record's table.
    ///
    /// Ambiguous codons become `X` and all-gap codons become `-`. A codon
    /// mixing gaps with nucleotides is malformed input and fails.
    pub fn translate(&self) -> RecordResult<String> {
        let code =
            genetic_code::by_id(self.table).ok_or(RecordError::UnknownTable(self.table))?;
        let offset = self.frame_offset()?;
        let chars: Vec<char> = self.seq.chars().collect();

        let mut out = String::with_capacity(chars.len() / 3);
        let mut pos = offset;
        while pos + 3 <= chars.len() {
            let codon: String = chars[pos..pos + 3].iter().collect();
            match code.translate_codon(&codon) {
                CodonAa::Residue(aa) => out.push(aa),
                CodonAa::Gap => out.push('-'),
                CodonAa::Unknown => out.push('X'),
                CodonAa::Mixed => {
                    return Err(RecordError::MixedGapCodon {
                        gene: self.gene_code.clone(),
                        voucher: self.voucher_code.clone(),
                        codon,
                    })
                }
            }
            pos += 3;
        }
        Ok(out)
    }

    /// Degenerates the sequence with the given Zwick-style method.
    pub fn degenerate(&self, method: DegenMethod) -> RecordResult<String> {
        let offset = self.frame_offset()?;
        Ok(degen::degenerate_sequence(&self.seq, offset, method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seq: &str, frame: u8) -> SeqRecord {
        let mut rec = SeqRecord::new("wingless", "CP100-10", seq);
        rec.reading_frame = ReadingFrame::from_int(frame);
        rec
    }

    #[test]
    fn test_codon_position_slicing_frame_one() {
        let rec = record("ATGCCCGGG", 1);
        assert_eq!(rec.first_codon_position().unwrap(), "ACG");
        assert_eq!(rec.second_codon_position().unwrap(), "TCG");
        assert_eq!(rec.third_codon_position().unwrap(), "GCG");
        assert_eq!(rec.first_and_second_codon_positions().unwrap(), "ATCCGG");
    }

    #[test]
    fn test_codon_position_slicing_frame_two() {
        // Frame 2 drops the first base before slicing.
        let rec = record("AATGCCCGGG", 2);
        assert_eq!(rec.first_codon_position().unwrap(), "ACG");
        assert_eq!(rec.third_codon_position().unwrap(), "GCG");
    }

    #[test]
    fn test_all_positions_needs_no_frame() {
        let rec = SeqRecord::new("wingless", "CP100-10", "ATGCCC");
        assert_eq!(rec.codon_positions(CodonPositions::All).unwrap(), "ATGCCC");
    }

    #[test]
    fn test_slicing_without_frame_fails() {
        let rec = SeqRecord::new("wingless", "CP100-10", "ATGCCC");
        let err = rec.first_codon_position().unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingReadingFrame {
                gene: "wingless".to_string(),
                voucher: "CP100-10".to_string(),
            }
        );
    }

    #[test]
    fn test_translate_with_stop_codon() {
        let rec = record("TTTCAGTAG", 1);
        assert_eq!(rec.translate().unwrap(), "FQ*");
    }

    #[test]
    fn test_translate_gap_and_ambiguity() {
        let rec = record("ATG---TTN", 1);
        assert_eq!(rec.translate().unwrap(), "M-X");
    }

    #[test]
    fn test_translate_mixed_gap_codon_fails() {
        let rec = record("ATGC--", 1);
        assert!(matches!(
            rec.translate().unwrap_err(),
            RecordError::MixedGapCodon { .. }
        ));
    }

    #[test]
    fn test_translate_unknown_table() {
        let mut rec = record("ATG", 1);
        rec.table = 7;
        assert_eq!(rec.translate().unwrap_err(), RecordError::UnknownTable(7));
    }

    #[test]
    fn test_degenerate() {
        let rec = record("ATGGCATTA", 1);
        assert_eq!(rec.degenerate(DegenMethod::Normal).unwrap(), "ATGGCNYTN");
    }

    #[test]
    fn test_flatten_taxonomy_genus_species() {
        let mut tax = Taxonomy::default();
        tax.genus = Some("Euptychia".to_string());
        tax.species = Some("ordinaria".to_string());
        assert_eq!(tax.flatten(), "_Euptychia_ordinaria");
    }

    #[test]
    fn test_flatten_taxonomy_spaces_and_runs() {
        let mut tax = Taxonomy::default();
        tax.family = Some("Nymphalidae ".to_string());
        tax.genus = Some("Euptychia".to_string());
        assert_eq!(tax.flatten(), "_Nymphalidae_Euptychia");
    }

    #[test]
    fn test_flatten_empty_taxonomy() {
        assert_eq!(Taxonomy::default().flatten(), "");
    }
}
