//! Puts a dataset together: header, matrix body and footer per format.
//!
//! NEXUS is the pivot format. PHYLIP and plain FASTA datasets are rendered
//! as NEXUS first and then converted, which is how the matrix stays
//! identical across the three. TNT, MEGA, GenBank FASTA and Bankit have
//! their own bodies and never go through the converter.

use crate::blocks::{split_records, BlockRenderer};
use crate::convert::{convert_nexus, TargetFormat};
use crate::dataset::{DataBundle, Dataset, DatasetResult, Settings};
use crate::footer::DatasetFooter;
use crate::formats::OutputFormat;
use crate::partition::Partitioning;

/// The header lines preceding the matrix, or an empty string for the
/// header-less submission formats.
pub fn dataset_header(data: &DataBundle, format: OutputFormat, aminoacids: bool) -> String {
    match format {
        OutputFormat::Nexus | OutputFormat::Phylip | OutputFormat::Fasta => {
            let datatype = if aminoacids { "PROTEIN" } else { "DNA" };
            format!(
                "#NEXUS\n\nBEGIN DATA;\nDIMENSIONS NTAX={} NCHAR={};\n\
                 FORMAT INTERLEAVE DATATYPE={} MISSING=? GAP=-;\nMATRIX",
                data.number_taxa, data.number_chars, datatype
            )
        }
        OutputFormat::Mega => "#MEGA\n!TITLE title;".to_string(),
        OutputFormat::Tnt => {
            let molecule = if aminoacids { "prot" } else { "dna" };
            format!(
                "nstates {};\nxread\n{} {}",
                molecule, data.number_chars, data.number_taxa
            )
        }
        OutputFormat::GenbankFasta | OutputFormat::Bankit => String::new(),
    }
}

/// Renders the full dataset for the settings' format.
pub fn render(data: &DataBundle, settings: &Settings) -> DatasetResult<Dataset> {
    let renderer = BlockRenderer::new(
        settings.codon_positions,
        settings.aminoacids,
        settings.degenerate,
    );
    let blocks = split_records(&data.records);
    let header = dataset_header(data, settings.format, settings.aminoacids);
    let footer = DatasetFooter::new(
        data,
        settings.codon_positions,
        settings.partitioning,
        settings.outgroup.as_deref(),
    );

    match settings.format {
        OutputFormat::Nexus => {
            let block = renderer.nexus_body(&blocks)?;
            Ok(Dataset {
                dataset_str: format!("{}\n\n{}\n\n{}", header, block.body, footer.footer()?),
                extra_dataset_str: None,
                warnings: block.warnings,
            })
        }

        OutputFormat::Phylip => {
            let block = renderer.nexus_body(&blocks)?;
            let as_nexus = format!("{}\n\n{}", header, block.body);
            Ok(Dataset {
                dataset_str: convert_nexus(&as_nexus, TargetFormat::PhylipRelaxed)?,
                extra_dataset_str: Some(footer.phylip_charset_block()?),
                warnings: block.warnings,
            })
        }

        OutputFormat::Fasta => {
            // The combined 1st-2nd/3rd scheme needs per-position sub-blocks
            // that a NEXUS matrix cannot carry, so it is written directly.
            if settings.partitioning == Partitioning::FirstSecondThird {
                let block = renderer.fasta_split_body(&blocks)?;
                return Ok(Dataset {
                    dataset_str: block.body,
                    extra_dataset_str: None,
                    warnings: block.warnings,
                });
            }
            let block = renderer.nexus_body(&blocks)?;
            let as_nexus = format!("{}\n\n{}", header, block.body);
            Ok(Dataset {
                dataset_str: convert_nexus(&as_nexus, TargetFormat::Fasta)?,
                extra_dataset_str: None,
                warnings: block.warnings,
            })
        }

        OutputFormat::Tnt => {
            let block = renderer.tnt_body(&blocks, settings.outgroup.as_deref())?;
            Ok(Dataset {
                dataset_str: format!("{}\n\n{}", header, block.body),
                extra_dataset_str: None,
                warnings: block.warnings,
            })
        }

        OutputFormat::Mega => {
            let block = renderer.mega_body(&blocks, data.number_taxa)?;
            Ok(Dataset {
                dataset_str: format!("{}\n\n{}", header, block.body),
                extra_dataset_str: None,
                warnings: block.warnings,
            })
        }

        OutputFormat::GenbankFasta => {
            let block = renderer.genbank_fasta_body(&blocks)?;
            Ok(Dataset {
                dataset_str: block.body,
                extra_dataset_str: None,
                warnings: block.warnings,
            })
        }

        OutputFormat::Bankit => {
            let block = renderer.bankit_body(&blocks)?;
            Ok(Dataset {
                dataset_str: block.body,
                extra_dataset_str: None,
                warnings: block.warnings,
            })
        }
    }
}
