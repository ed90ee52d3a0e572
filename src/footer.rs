//! NEXUS charset blocks, partition lines and the MrBayes footer.
//!
//! Charset coordinates are derived from the canonical gene lengths in the
//! [`DataBundle`](crate::dataset::DataBundle): a running 1-based counter
//! walks the genes in order of appearance, and each gene's window is
//! corrected for reading frame and partitioning by
//! [`BasePairCount`](crate::counts::BasePairCount).
//!
//! Example output for a seven gene dataset partitioned by gene:
//!
//! ```text
//! begin mrbayes;
//!     charset ArgKin = 1-596;
//!     charset COI-begin = 597-1265;
//!     ...
//!     charset wingless = 4340-4739;
//! partition GENES = 7: ArgKin, COI-begin, ..., wingless;
//!
//! set partition = GENES;
//! ...
//! END;
//! ```

use crate::counts::{BasePairCount, CountResult};
use crate::dataset::DataBundle;
use crate::partition::{CodonPositions, Partitioning};

/// MrBayes MCMC boilerplate appended after the partition lines.
const MRBAYES_TAIL: &str = "\
prset applyto=(all) ratepr=variable brlensp=unconstrained:Exp(100.0) shapepr=exp(1.0) tratiopr=beta(2.0,1.0);
lset applyto=(all) nst=mixed rates=gamma [invgamma];
unlink statefreq=(all);
unlink shape=(all) revmat=(all) tratio=(all) [pinvar=(all)];
mcmc ngen=10000000 printfreq=1000 samplefreq=1000 nchains=4 nruns=2 savebrlens=yes [temp=0.11];
 sump relburnin=yes [no] burninfrac=0.25 [2500];
 sumt relburnin=yes [no] burninfrac=0.25 [2500] contype=halfcompat [allcompat];
END;";

/// Builds the charset block, partition line and footer of a dataset.
pub struct DatasetFooter<'a> {
    data: &'a DataBundle,
    codon_positions: CodonPositions,
    partitioning: Partitioning,
    outgroup: Option<&'a str>,
}

impl<'a> DatasetFooter<'a> {
    pub fn new(
        data: &'a DataBundle,
        codon_positions: CodonPositions,
        partitioning: Partitioning,
        outgroup: Option<&'a str>,
    ) -> Self {
        Self {
            data,
            codon_positions,
            partitioning,
            outgroup,
        }
    }

    /// The `begin mrbayes;` block with one charset line per gene sub-block.
    pub fn charset_block(&self) -> CountResult<String> {
        let mut out = String::from("begin mrbayes;\n");
        out.push_str(&self.make_charsets()?);
        Ok(out.trim().to_string())
    }

    /// Charset lines rewritten for a RAxML-style partition file:
    /// `DNA, gene_pos1 = 100-512\3` instead of `    charset ...;`.
    pub fn phylip_charset_block(&self) -> CountResult<String> {
        let block = self.make_charsets()?;
        let converted = block
            .replace("    charset", "DNA,")
            .replace(';', "");
        Ok(converted.trim().to_string())
    }

    fn make_charsets(&self) -> CountResult<String> {
        let mut count_start = 1;
        let mut out = String::new();
        for (gene_code, length) in &self.data.gene_lengths {
            let count_end = length + count_start - 1;
            out.push_str(&self.format_charset_line(gene_code, count_start, count_end)?);
            count_start = count_end + 1;
        }
        Ok(out)
    }

    fn format_charset_line(
        &self,
        gene_code: &str,
        count_start: usize,
        count_end: usize,
    ) -> CountResult<String> {
        let slash = self.slash_number();
        let bp = BasePairCount::new(
            self.data.reading_frame_of(gene_code),
            self.codon_positions,
            self.partitioning,
            count_start,
            count_end,
        )?;
        let corrected = bp.corrected_count();

        let mut out = String::new();
        for (suffix, count) in self.gene_suffixes().iter().zip(&corrected) {
            out.push_str(&format!(
                "    charset {}{} = {}{};\n",
                gene_code, suffix, count, slash
            ));
        }
        Ok(out)
    }

    /// The `\2` or `\3` stride marker on charset lines, when the
    /// partitioning needs one.
    fn slash_number(&self) -> &'static str {
        use CodonPositions as Cp;
        use Partitioning as Pt;

        match (self.partitioning, self.codon_positions) {
            (Pt::ByCodonPosition, Cp::FirstSecond) => "\\2",
            (Pt::ByCodonPosition | Pt::FirstSecondThird, Cp::All) => "\\3",
            _ => "",
        }
    }

    /// The `_posN` suffixes appended to gene codes, one per sub-block.
    fn gene_suffixes(&self) -> Vec<&'static str> {
        use CodonPositions as Cp;
        use Partitioning as Pt;

        match (self.codon_positions, self.partitioning) {
            (Cp::First, _) => vec!["_pos1"],
            (Cp::Second, _) => vec!["_pos2"],
            (Cp::Third, _) => vec!["_pos3"],
            (Cp::All, Pt::ByGene) => vec![""],
            (Cp::FirstSecond, Pt::ByGene | Pt::FirstSecondThird) => vec!["_pos12"],
            (Cp::FirstSecond, Pt::ByCodonPosition) => vec!["_pos1", "_pos2"],
            (Cp::All, Pt::ByCodonPosition) => vec!["_pos1", "_pos2", "_pos3"],
            (Cp::All, Pt::FirstSecondThird) => vec!["_pos12", "_pos3"],
        }
    }

    /// The `partition GENES = N: ...;` line plus the `set partition` line.
    /// Gene codes are listed in case-insensitive sorted order.
    pub fn partition_line(&self) -> String {
        let suffixes = self.gene_suffixes();
        let mut names = Vec::with_capacity(self.data.gene_codes.len() * suffixes.len());
        for gene_code in &self.data.gene_codes {
            for suffix in &suffixes {
                names.push(format!("{}{}", gene_code, suffix));
            }
        }
        format!(
            "partition GENES = {}: {};\n\nset partition = GENES;",
            names.len(),
            names.join(", ")
        )
    }

    /// The `outgroup` line, or an empty string when no outgroup was set.
    ///
    /// The taxonomy suffix comes from the first record matching the
    /// voucher; an unmatched voucher still produces a line so the problem
    /// is visible in the output.
    fn outgroup_line(&self) -> String {
        match self.outgroup {
            Some(voucher) => {
                let taxonomy = self
                    .data
                    .records
                    .iter()
                    .find(|rec| rec.voucher_code == voucher)
                    .map(|rec| {
                        format!("{}_{}", rec.taxonomy.genus(), rec.taxonomy.species())
                    })
                    .unwrap_or_default();
                format!("\noutgroup {}_{};", voucher, taxonomy)
            }
            None => String::new(),
        }
    }

    /// The complete NEXUS footer, from `begin mrbayes;` to `END;`.
    pub fn footer(&self) -> CountResult<String> {
        Ok(format!(
            "{}\n{}\n\nset autoclose=yes;{}\n{}",
            self.charset_block()?,
            self.partition_line(),
            self.outgroup_line(),
            MRBAYES_TAIL
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DataBundle;
    use crate::record::{ReadingFrame, SeqRecord, Taxonomy};

    fn record(gene: &str, voucher: &str, len: usize) -> SeqRecord {
        let mut rec = SeqRecord::new(gene, voucher, "ACG".repeat(len / 3));
        rec.reading_frame = Some(ReadingFrame::One);
        rec.taxonomy = Taxonomy {
            genus: Some("Aus".to_string()),
            species: Some("aus".to_string()),
            ..Taxonomy::default()
        };
        rec
    }

    fn seven_gene_bundle() -> DataBundle {
        let genes = [
            ("ArgKin", 596),
            ("COI-begin", 669),
            ("COI_end", 806),
            ("ef1a", 1240),
            ("RpS2", 411),
            ("RpS5", 617),
            ("wingless", 400),
        ];
        let records: Vec<SeqRecord> = genes
            .iter()
            .map(|(gene, len)| {
                let mut rec = record(gene, "CP100-10", *len);
                // Lengths are not multiples of three; keep the raw length.
                rec.seq = "A".repeat(*len);
                rec
            })
            .collect();
        DataBundle::new(records, CodonPositions::All, false, None).unwrap()
    }

    #[test]
    fn test_charset_block_by_gene() {
        let data = seven_gene_bundle();
        let footer = DatasetFooter::new(&data, CodonPositions::All, Partitioning::ByGene, None);
        let expected = "begin mrbayes;\n\
                        \u{20}   charset ArgKin = 1-596;\n\
                        \u{20}   charset COI-begin = 597-1265;\n\
                        \u{20}   charset COI_end = 1266-2071;\n\
                        \u{20}   charset ef1a = 2072-3311;\n\
                        \u{20}   charset RpS2 = 3312-3722;\n\
                        \u{20}   charset RpS5 = 3723-4339;\n\
                        \u{20}   charset wingless = 4340-4739;";
        assert_eq!(footer.charset_block().unwrap(), expected);
    }

    #[test]
    fn test_charset_block_by_codon_position_has_stride_marker() {
        let data = seven_gene_bundle();
        let footer = DatasetFooter::new(
            &data,
            CodonPositions::All,
            Partitioning::ByCodonPosition,
            None,
        );
        let block = footer.charset_block().unwrap();
        assert!(block.contains("    charset ArgKin_pos1 = 1-596\\3;"));
        assert!(block.contains("    charset ArgKin_pos2 = 2-596\\3;"));
        assert!(block.contains("    charset ArgKin_pos3 = 3-596\\3;"));
    }

    #[test]
    fn test_charset_block_first_second_third() {
        let data = seven_gene_bundle();
        let footer = DatasetFooter::new(
            &data,
            CodonPositions::All,
            Partitioning::FirstSecondThird,
            None,
        );
        let block = footer.charset_block().unwrap();
        assert!(block.contains("    charset ArgKin_pos12 = 1-596\\3 2-596\\3;"));
        assert!(block.contains("    charset ArgKin_pos3 = 3-596\\3;"));
    }

    #[test]
    fn test_partition_line_by_gene() {
        let data = seven_gene_bundle();
        let footer = DatasetFooter::new(&data, CodonPositions::All, Partitioning::ByGene, None);
        assert_eq!(
            footer.partition_line(),
            "partition GENES = 7: ArgKin, COI-begin, COI_end, ef1a, RpS2, RpS5, wingless;\
             \n\nset partition = GENES;"
        );
    }

    #[test]
    fn test_partition_line_suffixes_multiply_gene_count() {
        let data = seven_gene_bundle();
        let footer = DatasetFooter::new(
            &data,
            CodonPositions::All,
            Partitioning::ByCodonPosition,
            None,
        );
        let line = footer.partition_line();
        assert!(line.starts_with("partition GENES = 21: ArgKin_pos1, ArgKin_pos2, ArgKin_pos3,"));
    }

    #[test]
    fn test_footer_with_outgroup() {
        let data = seven_gene_bundle();
        let footer = DatasetFooter::new(
            &data,
            CodonPositions::All,
            Partitioning::ByGene,
            Some("CP100-10"),
        );
        let text = footer.footer().unwrap();
        assert!(text.contains("set autoclose=yes;\noutgroup CP100-10_Aus_aus;\n"));
        assert!(text.contains("mcmc ngen=10000000"));
        assert!(text.ends_with("END;"));
    }

    #[test]
    fn test_footer_without_outgroup() {
        let data = seven_gene_bundle();
        let footer = DatasetFooter::new(&data, CodonPositions::All, Partitioning::ByGene, None);
        let text = footer.footer().unwrap();
        assert!(text.contains("set autoclose=yes;\nprset applyto=(all)"));
    }

    #[test]
    fn test_phylip_charset_block() {
        let data = seven_gene_bundle();
        let footer = DatasetFooter::new(&data, CodonPositions::All, Partitioning::ByGene, None);
        let block = footer.phylip_charset_block().unwrap();
        assert!(block.starts_with("DNA, ArgKin = 1-596\n"));
        assert!(block.ends_with("DNA, wingless = 4340-4739"));
        assert!(!block.contains(';'));
    }

    #[test]
    fn test_first_second_by_codon_position_pair() {
        let data = seven_gene_bundle();
        let footer = DatasetFooter::new(
            &data,
            CodonPositions::FirstSecond,
            Partitioning::ByCodonPosition,
            None,
        );
        let block = footer.charset_block().unwrap();
        // 1st-2nd keeps only two of every three columns per gene.
        assert!(block.contains("charset ArgKin_pos1 = 1-"));
        assert!(block.contains("\\2;"));
    }
}
