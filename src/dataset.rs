//! Dataset assembly: input preparation and the user-facing facade.
//!
//! [`DataBundle`] digests a sorted record list into the counts the writers
//! need (gene codes, taxa, matrix width, per-gene lengths and reading
//! frames). [`Dataset`] ties a bundle to a [`Settings`] choice and renders
//! the final text.
//!
//! ```no_run
//! use phylowriter::dataset::{Dataset, Settings};
//! use phylowriter::formats::OutputFormat;
//! # let records = vec![];
//!
//! let settings = Settings::new(OutputFormat::Nexus);
//! let dataset = Dataset::new(records, &settings)?;
//! println!("{}", dataset.dataset_str);
//! # Ok::<(), phylowriter::dataset::DatasetError>(())
//! ```

use thiserror::Error;

use crate::blocks::{resolve_seq, RenderError};
use crate::convert::ConvertError;
use crate::counts::CountError;
use crate::creator;
use crate::degen::DegenMethod;
use crate::formats::OutputFormat;
use crate::partition::{CodonPositions, Partitioning};
use crate::record::{ReadingFrame, SeqRecord};

/// Errors raised while building a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("no sequence records were given")]
    Empty,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Count(#[from] CountError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// How a dataset should be rendered.
#[derive(Debug, Clone)]
pub struct Settings {
    pub format: OutputFormat,
    pub codon_positions: CodonPositions,
    pub partitioning: Partitioning,
    /// Emit translated amino acid sequences instead of nucleotides.
    pub aminoacids: bool,
    /// Degenerate nucleotide sequences with the given method.
    pub degenerate: Option<DegenMethod>,
    /// Voucher code used as outgroup in NEXUS and TNT files.
    pub outgroup: Option<String>,
}

impl Settings {
    /// Settings for the given format with all positions, partitioned by
    /// gene, plain nucleotides and no outgroup.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            codon_positions: CodonPositions::default(),
            partitioning: Partitioning::default(),
            aminoacids: false,
            degenerate: None,
            outgroup: None,
        }
    }
}

/// Digested input: the records plus everything counted from them.
///
/// Records must be sorted by gene code and then by voucher code before the
/// bundle is built.
pub struct DataBundle {
    /// Unique gene codes, sorted case-insensitively.
    pub gene_codes: Vec<String>,
    /// Largest number of records any single gene has.
    pub number_taxa: usize,
    /// Width of the concatenated matrix, summed over canonical lengths.
    pub number_chars: usize,
    /// Canonical (longest) output length per gene, in order of appearance.
    pub gene_lengths: Vec<(String, usize)>,
    pub records: Vec<SeqRecord>,
    frames: Vec<(String, Option<ReadingFrame>)>,
}

impl DataBundle {
    /// Builds a bundle, resolving every sequence once to measure it.
    ///
    /// Lengths depend on the requested transformation: a translated gene is
    /// a third as wide as its nucleotide form, a 1st-2nd selection two
    /// thirds. Sequences of the same gene may differ in length; the longest
    /// is taken as the gene's canonical length.
    pub fn new(
        records: Vec<SeqRecord>,
        codon_positions: CodonPositions,
        aminoacids: bool,
        degenerate: Option<DegenMethod>,
    ) -> DatasetResult<Self> {
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut gene_lengths: Vec<(String, usize)> = Vec::new();
        let mut frames: Vec<(String, Option<ReadingFrame>)> = Vec::new();
        let mut taxa_per_gene: Vec<(String, usize)> = Vec::new();

        for record in &records {
            let resolved = resolve_seq(record, codon_positions, aminoacids, degenerate)?;
            let length = resolved.seq.len();

            match gene_lengths
                .iter_mut()
                .find(|(gene, _)| gene == &record.gene_code)
            {
                Some((_, max)) => *max = (*max).max(length),
                None => gene_lengths.push((record.gene_code.clone(), length)),
            }
            match taxa_per_gene
                .iter_mut()
                .find(|(gene, _)| gene == &record.gene_code)
            {
                Some((_, count)) => *count += 1,
                None => taxa_per_gene.push((record.gene_code.clone(), 1)),
            }
            if !frames.iter().any(|(gene, _)| gene == &record.gene_code) {
                frames.push((record.gene_code.clone(), record.reading_frame));
            }
        }

        let mut gene_codes: Vec<String> =
            gene_lengths.iter().map(|(gene, _)| gene.clone()).collect();
        gene_codes.sort_by_key(|gene| gene.to_lowercase());

        let number_chars = gene_lengths.iter().map(|(_, len)| len).sum();
        let number_taxa = taxa_per_gene
            .iter()
            .map(|(_, count)| *count)
            .max()
            .unwrap_or(0);

        Ok(Self {
            gene_codes,
            number_taxa,
            number_chars,
            gene_lengths,
            records,
            frames,
        })
    }

    /// The reading frame recorded for a gene (from its first record).
    pub fn reading_frame_of(&self, gene_code: &str) -> Option<ReadingFrame> {
        self.frames
            .iter()
            .find(|(gene, _)| gene == gene_code)
            .and_then(|(_, frame)| *frame)
    }
}

/// A rendered dataset.
pub struct Dataset {
    /// The dataset text in the requested format.
    pub dataset_str: String,
    /// Companion file content, currently the PHYLIP partition file.
    pub extra_dataset_str: Option<String>,
    /// Non-fatal issues found while rendering, one message each.
    pub warnings: Vec<String>,
}

impl Dataset {
    /// Renders the records with the given settings.
    pub fn new(records: Vec<SeqRecord>, settings: &Settings) -> DatasetResult<Self> {
        let data = DataBundle::new(
            records,
            settings.codon_positions,
            settings.aminoacids,
            settings.degenerate,
        )?;
        creator::render(&data, settings)
    }
}
