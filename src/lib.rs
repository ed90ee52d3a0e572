//! # phylowriter
//!
//! Builds multi-gene phylogenetic datasets in NEXUS, PHYLIP, FASTA, TNT,
//! MEGA, GenBank FASTA and Bankit formats from annotated sequence records.
//!
//! ## Architecture
//!
//! The pipeline is split along the structure of the output files:
//! - `record`: annotated sequence records and their codon-aware views
//! - `genetic_code`: NCBI translation tables
//! - `degen`: Zwick-style codon degeneration
//! - `partition`: codon-position and partitioning options
//! - `blocks`: gene-block splitting and per-format matrix bodies
//! - `counts`: corrected base-pair ranges for charset lines
//! - `footer`: charset blocks, partition lines and the MrBayes footer
//! - `creator`: header/body/footer assembly per format
//! - `convert`: NEXUS to FASTA and relaxed PHYLIP conversion
//! - `dataset`: input digestion and the user-facing facade
//!
//! ## Example
//!
//! ```no_run
//! use phylowriter::dataset::{Dataset, Settings};
//! use phylowriter::formats::OutputFormat;
//! use phylowriter::record::SeqRecord;
//!
//! let records: Vec<SeqRecord> = vec![/* sorted by gene, then voucher */];
//! let dataset = Dataset::new(records, &Settings::new(OutputFormat::Nexus))?;
//! print!("{}", dataset.dataset_str);
//! # Ok::<(), phylowriter::dataset::DatasetError>(())
//! ```

pub mod blocks;
pub mod convert;
pub mod counts;
pub mod creator;
pub mod dataset;
pub mod degen;
pub mod footer;
pub mod formats;
pub mod genetic_code;
pub mod partition;
pub mod record;
