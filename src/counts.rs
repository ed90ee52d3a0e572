//! Corrected base-pair ranges for charset and partition lines.
//!
//! Charset coordinates are 1-based and inclusive. Given a gene's window
//! `(count_start, count_end)` within the concatenated matrix, the selected
//! codon positions and the partitioning scheme, [`BasePairCount`] produces
//! the range strings that go on the charset lines, one per emitted
//! sub-block. When the partitioning follows codon positions, the start
//! offsets are rotated by the gene's reading frame so that "position 1"
//! always lands on the frame's first codon base.

use thiserror::Error;

use crate::partition::{CodonPositions, Partitioning};
use crate::record::ReadingFrame;

/// Errors raised while building a corrected count.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CountError {
    #[error("a reading frame is needed when partitioning is '{0}'")]
    MissingReadingFrame(Partitioning),
}

/// Result type for count operations.
pub type CountResult<T> = Result<T, CountError>;

/// Computes corrected base-pair ranges for one gene's charset lines.
#[derive(Debug)]
pub struct BasePairCount {
    reading_frame: ReadingFrame,
    codon_positions: CodonPositions,
    partitioning: Partitioning,
    count_start: usize,
    count_end: usize,
}

impl BasePairCount {
    /// Builds a count over the window `[count_start, count_end]`.
    ///
    /// The reading frame is mandatory whenever partitioning is anything
    /// other than `ByGene`; this fails fast so a malformed request never
    /// reaches the formatting stage.
    pub fn new(
        reading_frame: Option<ReadingFrame>,
        codon_positions: CodonPositions,
        partitioning: Partitioning,
        count_start: usize,
        count_end: usize,
    ) -> CountResult<Self> {
        let reading_frame = match reading_frame {
            Some(frame) => frame,
            None if partitioning == Partitioning::ByGene => ReadingFrame::One,
            None => return Err(CountError::MissingReadingFrame(partitioning)),
        };
        Ok(Self {
            reading_frame,
            codon_positions,
            partitioning,
            count_start,
            count_end,
        })
    }

    /// The ordered range strings for this gene, one per charset sub-block.
    pub fn corrected_count(&self) -> Vec<String> {
        use CodonPositions as Cp;
        use Partitioning as Pt;

        match (self.codon_positions, self.partitioning) {
            (Cp::FirstSecond, _) => self.first_second_pair(),
            (Cp::All, Pt::ByCodonPosition) => self.rotated_triplet(),
            (Cp::All, Pt::FirstSecondThird) => self.compound_pair(),
            // A single requested position, or anything partitioned by gene,
            // covers the window as-is.
            _ => vec![self.range(0)],
        }
    }

    fn range(&self, shift: usize) -> String {
        format!("{}-{}", self.count_start + shift, self.count_end)
    }

    /// 1st-2nd selections always emit two ranges offset by one base. Both
    /// ranges share the same end coordinate; a widely copied historical
    /// example shows `101-513` for the window `(100, 512)`, but the end is
    /// not shifted.
    fn first_second_pair(&self) -> Vec<String> {
        vec![self.range(0), self.range(1)]
    }

    /// One range per codon position, with start offsets rotated so the
    /// first emitted range is the frame's position 1.
    fn rotated_triplet(&self) -> Vec<String> {
        let shifts = match self.reading_frame {
            ReadingFrame::One => [0, 1, 2],
            ReadingFrame::Two => [1, 2, 0],
            ReadingFrame::Three => [2, 0, 1],
        };
        shifts.iter().map(|&s| self.range(s)).collect()
    }

    /// The combined 1st-2nd descriptor (two striding ranges joined by a
    /// `\3` marker) followed by the plain 3rd-position range.
    fn compound_pair(&self) -> Vec<String> {
        let (a, b, third) = match self.reading_frame {
            ReadingFrame::One => (0, 1, 2),
            ReadingFrame::Two => (1, 2, 0),
            ReadingFrame::Three => (2, 0, 1),
        };
        vec![
            format!("{}\\3 {}", self.range(a), self.range(b)),
            self.range(third),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(
        frame: Option<ReadingFrame>,
        positions: CodonPositions,
        partitioning: Partitioning,
    ) -> CountResult<BasePairCount> {
        BasePairCount::new(frame, positions, partitioning, 100, 512)
    }

    #[test]
    fn test_missing_reading_frame_fails_fast() {
        let err = count(
            None,
            CodonPositions::FirstSecond,
            Partitioning::ByCodonPosition,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CountError::MissingReadingFrame(Partitioning::ByCodonPosition)
        );

        assert!(count(None, CodonPositions::All, Partitioning::FirstSecondThird).is_err());
    }

    #[test]
    fn test_by_gene_needs_no_frame() {
        let bp = count(None, CodonPositions::All, Partitioning::ByGene).unwrap();
        assert_eq!(bp.corrected_count(), vec!["100-512"]);
    }

    #[test]
    fn test_first_second_by_codon_position() {
        let bp = count(
            Some(ReadingFrame::One),
            CodonPositions::FirstSecond,
            Partitioning::ByCodonPosition,
        )
        .unwrap();
        // The long-standing doctest for this input lists `101-513`; the
        // computed pair keeps the shared end coordinate instead.
        assert_eq!(bp.corrected_count(), vec!["100-512", "101-512"]);
    }

    #[test]
    fn test_first_second_under_other_partitionings() {
        for partitioning in [Partitioning::ByGene, Partitioning::FirstSecondThird] {
            let bp = count(
                Some(ReadingFrame::One),
                CodonPositions::FirstSecond,
                partitioning,
            )
            .unwrap();
            assert_eq!(bp.corrected_count(), vec!["100-512", "101-512"]);
        }
    }

    #[test]
    fn test_all_by_codon_position_rotates_with_frame() {
        let cases = [
            (ReadingFrame::One, vec!["100-512", "101-512", "102-512"]),
            (ReadingFrame::Two, vec!["101-512", "102-512", "100-512"]),
            (ReadingFrame::Three, vec!["102-512", "100-512", "101-512"]),
        ];
        for (frame, expected) in cases {
            let bp = count(
                Some(frame),
                CodonPositions::All,
                Partitioning::ByCodonPosition,
            )
            .unwrap();
            assert_eq!(bp.corrected_count(), expected);
        }
    }

    #[test]
    fn test_single_position_selections() {
        for positions in [
            CodonPositions::First,
            CodonPositions::Second,
            CodonPositions::Third,
        ] {
            for partitioning in [
                Partitioning::ByGene,
                Partitioning::ByCodonPosition,
                Partitioning::FirstSecondThird,
            ] {
                let bp = count(Some(ReadingFrame::Two), positions, partitioning).unwrap();
                assert_eq!(bp.corrected_count(), vec!["100-512"]);
            }
        }
    }

    #[test]
    fn test_all_with_combined_partitioning() {
        let cases = [
            (ReadingFrame::One, vec!["100-512\\3 101-512", "102-512"]),
            (ReadingFrame::Two, vec!["101-512\\3 102-512", "100-512"]),
            (ReadingFrame::Three, vec!["102-512\\3 100-512", "101-512"]),
        ];
        for (frame, expected) in cases {
            let bp = count(
                Some(frame),
                CodonPositions::All,
                Partitioning::FirstSecondThird,
            )
            .unwrap();
            assert_eq!(bp.corrected_count(), expected);
        }
    }
}
