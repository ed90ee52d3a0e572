//! Gene-block splitting and per-format body rendering.
//!
//! The input record list is assumed to be sorted by gene code and then by
//! voucher code. [`split_records`] cuts it into contiguous per-gene runs;
//! [`BlockRenderer`] turns those runs into the matrix body of a target
//! format. Rendering never mutates shared state: warnings (for example
//! stop codons found during translation) travel back inside the returned
//! [`RenderedBlock`].

use thiserror::Error;

use crate::degen::DegenMethod;
use crate::partition::CodonPositions;
use crate::record::{RecordError, SeqRecord};

/// Sequences in NEXUS/TNT/MEGA blocks start at this column at minimum.
const MIN_PAD: usize = 55;

/// GenBank and Bankit entries wrap sequence text at this width.
const WRAP_WIDTH: usize = 60;

/// Errors raised while rendering gene blocks.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("outgroup voucher '{0}' is not present in the data")]
    OutgroupNotFound(String),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// A rendered matrix body plus the warnings collected along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub body: String,
    pub warnings: Vec<String>,
}

/// Splits records into contiguous per-gene runs, preserving input order.
///
/// The split happens strictly on gene-code change: a gene code that
/// reappears later (out-of-order input) starts a fresh run rather than
/// being merged back.
pub fn split_records(records: &[SeqRecord]) -> Vec<&[SeqRecord]> {
    let mut blocks = Vec::new();
    let mut start = 0;
    for i in 1..records.len() {
        if records[i].gene_code != records[i - 1].gene_code {
            blocks.push(&records[start..i]);
            start = i;
        }
    }
    if !records.is_empty() {
        blocks.push(&records[start..]);
    }
    blocks
}

/// A record's sequence after applying the requested transformation.
#[derive(Debug)]
pub(crate) struct ResolvedSeq {
    pub seq: String,
    pub warning: Option<String>,
}

/// Resolves a record's output sequence.
///
/// Precedence: translation first, then degeneration, then plain
/// codon-position slicing. A stop codon in the translation is reported as
/// a warning; the sequence is still emitted.
pub(crate) fn resolve_seq(
    record: &SeqRecord,
    positions: CodonPositions,
    aminoacids: bool,
    degenerate: Option<DegenMethod>,
) -> RenderResult<ResolvedSeq> {
    if aminoacids {
        let aa = record.translate()?;
        let warning = aa.contains('*').then(|| {
            format!(
                "Gene {}, sequence {} contains stop codons '*'",
                record.gene_code, record.voucher_code
            )
        });
        return Ok(ResolvedSeq { seq: aa, warning });
    }

    if let Some(method) = degenerate {
        return Ok(ResolvedSeq {
            seq: record.degenerate(method)?,
            warning: None,
        });
    }

    Ok(ResolvedSeq {
        seq: record.codon_positions(positions)?,
        warning: None,
    })
}

/// The taxon label used in NEXUS/TNT/MEGA matrix lines.
fn taxon_label(record: &SeqRecord) -> String {
    format!("{}{}", record.voucher_code, record.taxonomy.flatten())
}

/// Column at which sequences start: one past the longest label, floored.
fn pad_width(block: &[SeqRecord]) -> usize {
    let longest = block
        .iter()
        .map(|rec| taxon_label(rec).len())
        .max()
        .unwrap_or(0);
    (longest + 1).max(MIN_PAD)
}

fn wrap_sequence(seq: &str) -> String {
    let chars: Vec<char> = seq.chars().collect();
    chars
        .chunks(WRAP_WIDTH)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders gene blocks into format-specific matrix bodies.
pub struct BlockRenderer {
    pub codon_positions: CodonPositions,
    pub aminoacids: bool,
    pub degenerate: Option<DegenMethod>,
}

impl BlockRenderer {
    pub fn new(
        codon_positions: CodonPositions,
        aminoacids: bool,
        degenerate: Option<DegenMethod>,
    ) -> Self {
        Self {
            codon_positions,
            aminoacids,
            degenerate,
        }
    }

    fn resolve(&self, record: &SeqRecord) -> RenderResult<ResolvedSeq> {
        resolve_seq(record, self.codon_positions, self.aminoacids, self.degenerate)
    }

    /// One gene's block: a `[gene]` comment line followed by padded
    /// taxon/sequence lines.
    fn gene_block(&self, block: &[SeqRecord], warnings: &mut Vec<String>) -> RenderResult<String> {
        let pad = pad_width(block);
        let mut out = format!("[{}]\n", block[0].gene_code);
        for record in block {
            let resolved = self.resolve(record)?;
            if let Some(warning) = resolved.warning {
                warnings.push(warning);
            }
            out.push_str(&format!(
                "{:<pad$}{}\n",
                taxon_label(record),
                resolved.seq
            ));
        }
        Ok(out)
    }

    /// The NEXUS matrix body, closed by the `;`/`END;` sentinel.
    pub fn nexus_body(&self, blocks: &[&[SeqRecord]]) -> RenderResult<RenderedBlock> {
        let mut warnings = Vec::new();
        let mut parts = Vec::with_capacity(blocks.len());
        for block in blocks {
            parts.push(self.gene_block(block, &mut warnings)?);
        }
        let body = format!("{}\n;\nEND;", parts.join("\n").trim());
        Ok(RenderedBlock { body, warnings })
    }

    /// The TNT matrix body. Each block opens with the molecule marker and
    /// the named outgroup, when given, is moved to the front of the block.
    pub fn tnt_body(
        &self,
        blocks: &[&[SeqRecord]],
        outgroup: Option<&str>,
    ) -> RenderResult<RenderedBlock> {
        let molecule = if self.aminoacids { "protein" } else { "dna" };
        let mut warnings = Vec::new();
        let mut parts = Vec::with_capacity(blocks.len());

        for block in blocks {
            let ordered: Vec<&SeqRecord> = match outgroup {
                Some(voucher) => reorder_outgroup_first(block, voucher)?,
                None => block.iter().collect(),
            };

            let pad = pad_width(block);
            let mut out = format!("&[{}]\n", molecule);
            for record in ordered {
                let resolved = self.resolve(record)?;
                if let Some(warning) = resolved.warning {
                    warnings.push(warning);
                }
                out.push_str(&format!(
                    "{:<pad$}{}\n",
                    taxon_label(record),
                    resolved.seq
                ));
            }
            parts.push(out);
        }

        let body = format!("{}\n;\nproc/;", parts.join("\n").trim());
        Ok(RenderedBlock { body, warnings })
    }

    /// The MEGA body: one `#taxon` entry per taxon, with that taxon's
    /// sequences concatenated across all gene blocks. Taxa are matched by
    /// position, so every block is expected to list the same taxa in the
    /// same order.
    pub fn mega_body(
        &self,
        blocks: &[&[SeqRecord]],
        number_taxa: usize,
    ) -> RenderResult<RenderedBlock> {
        let mut warnings = Vec::new();
        let mut taxa = vec![String::new(); number_taxa];
        let mut sequences = vec![String::new(); number_taxa];

        for block in blocks {
            for (index, record) in block.iter().enumerate() {
                if index >= number_taxa {
                    break;
                }
                let resolved = resolve_seq(record, self.codon_positions, false, None)?;
                if let Some(warning) = resolved.warning {
                    warnings.push(warning);
                }
                taxa[index] = taxon_label(record);
                sequences[index].push_str(&resolved.seq);
            }
        }

        let mut body = String::new();
        for (taxon, seq) in taxa.iter().zip(&sequences) {
            body.push_str(&format!("#{}\n{}\n", taxon, seq));
        }
        Ok(RenderedBlock { body, warnings })
    }

    /// GenBank-style FASTA entries with bracketed metadata headers.
    pub fn genbank_fasta_body(&self, blocks: &[&[SeqRecord]]) -> RenderResult<RenderedBlock> {
        self.bracketed_fasta(blocks, |record| {
            format!(
                ">{genus}_{species}_{voucher} [org={genus} {species}] \
                 [Specimen-voucher={voucher}] [note={gene} gene, partial cds.] [Lineage={lineage}]",
                genus = record.taxonomy.genus(),
                species = record.taxonomy.species(),
                voucher = record.voucher_code,
                gene = record.gene_code,
                lineage = record.lineage.as_deref().unwrap_or(""),
            )
        })
    }

    /// Bankit submission FASTA entries.
    pub fn bankit_body(&self, blocks: &[&[SeqRecord]]) -> RenderResult<RenderedBlock> {
        self.bracketed_fasta(blocks, |record| {
            format!(
                ">{voucher}_{gene} [organism={genus} {species}] \
                 [Specimen_voucher={voucher}] {gene} gene, partial cds",
                voucher = record.voucher_code,
                gene = record.gene_code,
                genus = record.taxonomy.genus(),
                species = record.taxonomy.species(),
            )
        })
    }

    fn bracketed_fasta(
        &self,
        blocks: &[&[SeqRecord]],
        header: impl Fn(&SeqRecord) -> String,
    ) -> RenderResult<RenderedBlock> {
        let mut warnings = Vec::new();
        let mut parts = Vec::with_capacity(blocks.len());
        for block in blocks {
            let mut out = String::new();
            for record in *block {
                let resolved = self.resolve(record)?;
                if let Some(warning) = resolved.warning {
                    warnings.push(warning);
                }
                out.push_str(&format!(
                    "{}\n{}\n",
                    header(record),
                    wrap_sequence(&resolved.seq)
                ));
            }
            parts.push(out);
        }
        Ok(RenderedBlock {
            body: parts.join("\n").trim_end().to_string(),
            warnings,
        })
    }

    /// FASTA body for the combined 1st-2nd/3rd partitioning: every gene is
    /// split into parallel sub-blocks (1st-2nd, 1st, 2nd, 3rd), each under
    /// a `>{gene}_{suffix}` spacer header, and only the sub-blocks matching
    /// the codon-position selection are emitted.
    ///
    /// Because each record appears in several sub-blocks, translation and
    /// degeneration do not apply here.
    pub fn fasta_split_body(&self, blocks: &[&[SeqRecord]]) -> RenderResult<RenderedBlock> {
        let mut parts = Vec::with_capacity(blocks.len());
        for block in blocks {
            let gene = &block[0].gene_code;
            let mut out = String::new();

            let leading = match self.codon_positions {
                CodonPositions::All | CodonPositions::FirstSecond => Some("1st-2nd"),
                CodonPositions::First => Some("1st"),
                CodonPositions::Second => Some("2nd"),
                CodonPositions::Third => None,
            };
            if let Some(suffix) = leading {
                out.push_str(&format!(">{}_{}\n----\n", gene, suffix));
                for record in *block {
                    let seq = match self.codon_positions {
                        CodonPositions::First => record.first_codon_position()?,
                        CodonPositions::Second => record.second_codon_position()?,
                        _ => record.first_and_second_codon_positions()?,
                    };
                    out.push_str(&format!(">{}\n{}\n", taxon_label(record), seq));
                }
            }

            if matches!(
                self.codon_positions,
                CodonPositions::All | CodonPositions::Third
            ) {
                out.push_str(&format!("\n>{}_3rd\n----\n", gene));
                for record in *block {
                    out.push_str(&format!(
                        ">{}\n{}\n",
                        taxon_label(record),
                        record.third_codon_position()?
                    ));
                }
            }

            parts.push(out);
        }
        Ok(RenderedBlock {
            body: parts.join("\n").trim().to_string(),
            warnings: Vec::new(),
        })
    }
}

/// Moves the outgroup record to the front of the block.
fn reorder_outgroup_first<'a>(
    block: &'a [SeqRecord],
    voucher: &str,
) -> RenderResult<Vec<&'a SeqRecord>> {
    let mut outgroup = None;
    let mut others = Vec::with_capacity(block.len());
    for record in block {
        if record.voucher_code == voucher {
            outgroup = Some(record);
        } else {
            others.push(record);
        }
    }
    let outgroup = outgroup.ok_or_else(|| RenderError::OutgroupNotFound(voucher.to_string()))?;
    let mut ordered = vec![outgroup];
    ordered.extend(others);
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ReadingFrame, Taxonomy};

    fn record(gene: &str, voucher: &str, genus: &str, species: &str, seq: &str) -> SeqRecord {
        let mut rec = SeqRecord::new(gene, voucher, seq);
        rec.reading_frame = Some(ReadingFrame::One);
        rec.taxonomy = Taxonomy {
            genus: Some(genus.to_string()),
            species: Some(species.to_string()),
            ..Taxonomy::default()
        };
        rec
    }

    fn sample_records() -> Vec<SeqRecord> {
        vec![
            record("ArgKin", "CP100-10", "Aus", "aus", "ATGCCCGGG"),
            record("ArgKin", "CP100-11", "Aus", "bus", "ATGCCCGGT"),
            record("wingless", "CP100-10", "Aus", "aus", "TTTCAGCAG"),
            record("wingless", "CP100-11", "Aus", "bus", "TTTCAGCAA"),
        ]
    }

    #[test]
    fn test_split_records_contiguous_runs() {
        let records = sample_records();
        let blocks = split_records(&records);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].len(), 2);
        assert_eq!(blocks[0][0].gene_code, "ArgKin");
        assert_eq!(blocks[1][0].gene_code, "wingless");
    }

    #[test]
    fn test_split_records_is_idempotent_on_grouped_input() {
        let records = sample_records();
        let blocks = split_records(&records);
        let regrouped: Vec<SeqRecord> = blocks.iter().flat_map(|b| b.iter().cloned()).collect();
        assert_eq!(split_records(&regrouped).len(), blocks.len());
    }

    #[test]
    fn test_split_records_noncontiguous_gene_starts_new_block() {
        let mut records = sample_records();
        records.push(record("ArgKin", "CP100-12", "Aus", "cus", "ATGCCCGGG"));
        let blocks = split_records(&records);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2][0].gene_code, "ArgKin");
    }

    #[test]
    fn test_split_records_empty() {
        assert!(split_records(&[]).is_empty());
    }

    #[test]
    fn test_nexus_body_padding_and_sentinel() {
        let records = sample_records();
        let renderer = BlockRenderer::new(CodonPositions::All, false, None);
        let rendered = renderer.nexus_body(&split_records(&records)).unwrap();

        assert!(rendered.body.starts_with("[ArgKin]\n"));
        assert!(rendered.body.ends_with("\n;\nEND;"));
        for line in rendered.body.lines() {
            if line.starts_with("CP100-") {
                // Sequences line up at column 55 for these short labels.
                assert_eq!(line.find("ATG").or(line.find("TTT")), Some(55));
            }
        }
        assert!(rendered.warnings.is_empty());
    }

    #[test]
    fn test_padding_grows_past_minimum_with_long_labels() {
        let mut rec = record("ArgKin", "CP100-10", "Aus", "aus", "ATG");
        rec.taxonomy.family = Some("A".repeat(60).to_string());
        let records = vec![rec];
        let blocks = split_records(&records);
        let renderer = BlockRenderer::new(CodonPositions::All, false, None);
        let rendered = renderer.nexus_body(&blocks).unwrap();

        let line = rendered.body.lines().nth(1).unwrap();
        let label_len = taxon_label(&records[0]).len();
        assert_eq!(line.find("ATG"), Some(label_len + 1));
    }

    #[test]
    fn test_stop_codon_warning_is_collected() {
        let records = vec![record("wingless", "CP100-10", "Aus", "aus", "TTTCAGTAG")];
        let renderer = BlockRenderer::new(CodonPositions::All, true, None);
        let rendered = renderer.nexus_body(&split_records(&records)).unwrap();

        assert!(rendered.body.contains("FQ*"));
        assert_eq!(
            rendered.warnings,
            vec!["Gene wingless, sequence CP100-10 contains stop codons '*'".to_string()]
        );
    }

    #[test]
    fn test_tnt_body_moves_outgroup_first() {
        let records = sample_records();
        let renderer = BlockRenderer::new(CodonPositions::All, false, None);
        let rendered = renderer
            .tnt_body(&split_records(&records), Some("CP100-11"))
            .unwrap();

        assert!(rendered.body.starts_with("&[dna]\n"));
        assert!(rendered.body.ends_with("\n;\nproc/;"));
        let first_taxon = rendered.body.lines().nth(1).unwrap();
        assert!(first_taxon.starts_with("CP100-11_Aus_bus"));
    }

    #[test]
    fn test_tnt_body_unknown_outgroup_fails() {
        let records = sample_records();
        let renderer = BlockRenderer::new(CodonPositions::All, false, None);
        let err = renderer
            .tnt_body(&split_records(&records), Some("CP999-99"))
            .unwrap_err();
        assert_eq!(err, RenderError::OutgroupNotFound("CP999-99".to_string()));
    }

    #[test]
    fn test_mega_body_concatenates_per_taxon() {
        let records = sample_records();
        let renderer = BlockRenderer::new(CodonPositions::All, false, None);
        let rendered = renderer.mega_body(&split_records(&records), 2).unwrap();

        let expected = "#CP100-10_Aus_aus\nATGCCCGGGTTTCAGCAG\n\
                        #CP100-11_Aus_bus\nATGCCCGGTTTTCAGCAA\n";
        assert_eq!(rendered.body, expected);
    }

    #[test]
    fn test_genbank_fasta_body() {
        let mut records = vec![record("wingless", "CP100-10", "Aus", "aus", "ATGCCC")];
        records[0].lineage = Some("Insecta; Lepidoptera".to_string());
        let renderer = BlockRenderer::new(CodonPositions::All, false, None);
        let rendered = renderer
            .genbank_fasta_body(&split_records(&records))
            .unwrap();

        assert_eq!(
            rendered.body,
            ">Aus_aus_CP100-10 [org=Aus aus] [Specimen-voucher=CP100-10] \
             [note=wingless gene, partial cds.] [Lineage=Insecta; Lepidoptera]\nATGCCC"
        );
    }

    #[test]
    fn test_bankit_body_wraps_at_sixty() {
        let seq = "ACGT".repeat(20); // 80 bases
        let records = vec![record("COI", "CP100-10", "Aus", "aus", &seq)];
        let renderer = BlockRenderer::new(CodonPositions::All, false, None);
        let rendered = renderer.bankit_body(&split_records(&records)).unwrap();

        let lines: Vec<&str> = rendered.body.lines().collect();
        assert_eq!(
            lines[0],
            ">CP100-10_COI [organism=Aus aus] [Specimen_voucher=CP100-10] COI gene, partial cds"
        );
        assert_eq!(lines[1].len(), 60);
        assert_eq!(lines[2].len(), 20);
    }

    #[test]
    fn test_fasta_split_body_all_positions() {
        let records = vec![record("wingless", "CP100-10", "Aus", "aus", "ATGCCCGGG")];
        let renderer = BlockRenderer::new(CodonPositions::All, false, None);
        let rendered = renderer.fasta_split_body(&split_records(&records)).unwrap();

        assert!(rendered.body.contains(">wingless_1st-2nd\n----\n"));
        assert!(rendered.body.contains(">CP100-10_Aus_aus\nATCCGG\n"));
        assert!(rendered.body.contains(">wingless_3rd\n----\n"));
        assert!(rendered.body.contains(">CP100-10_Aus_aus\nGCG"));
        assert!(!rendered.body.contains(">wingless_1st\n"));
    }

    #[test]
    fn test_fasta_split_body_third_only() {
        let records = vec![record("wingless", "CP100-10", "Aus", "aus", "ATGCCCGGG")];
        let renderer = BlockRenderer::new(CodonPositions::Third, false, None);
        let rendered = renderer.fasta_split_body(&split_records(&records)).unwrap();

        assert!(!rendered.body.contains("1st-2nd"));
        assert!(rendered.body.starts_with(">wingless_3rd\n----\n"));
    }
}
