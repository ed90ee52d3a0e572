//! NCBI genetic code tables and codon translation.
//!
//! Tables are stored as the 64-character NCBI `ncbieaa` strings, indexed in
//! the standard TCAG order (TTT, TTC, TTA, TTG, TCT, ...). Translation of a
//! codon reports one of four outcomes so callers can decide what is a
//! warning and what is fatal:
//!
//! - a residue (including `*` for stop codons),
//! - a gap (`---`),
//! - a mixed codon (gaps and nucleotides in the same triplet),
//! - an unknown codon (ambiguity characters such as `N` or `?`).

/// Outcome of translating a single codon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodonAa {
    /// A residue from the code table; stop codons come back as `*`.
    Residue(char),
    /// All three characters are gaps.
    Gap,
    /// Gaps mixed with nucleotides; the triplet cannot be resolved.
    Mixed,
    /// Ambiguous or missing nucleotides (`N`, `?`, IUPAC codes).
    Unknown,
}

/// A genetic code table in NCBI format.
#[derive(Debug)]
pub struct GeneticCode {
    /// NCBI genetic code ID.
    pub id: u8,
    /// Name of the genetic code.
    pub name: &'static str,
    /// Amino acids in NCBI codon order.
    aas: &'static [u8; 64],
}

impl GeneticCode {
    /// Translates one codon.
    ///
    /// `U` is accepted as `T`, case is ignored, and `-`, `!` and `.` count
    /// as gap characters.
    pub fn translate_codon(&self, codon: &str) -> CodonAa {
        let chars: Vec<char> = codon.chars().collect();
        if chars.len() != 3 {
            return CodonAa::Unknown;
        }

        let gaps = chars.iter().filter(|c| is_gap(**c)).count();
        if gaps == 3 {
            return CodonAa::Gap;
        }
        if gaps > 0 {
            return CodonAa::Mixed;
        }

        match codon_index(&chars) {
            Some(idx) => CodonAa::Residue(self.aas[idx] as char),
            None => CodonAa::Unknown,
        }
    }
}

fn is_gap(c: char) -> bool {
    matches!(c, '-' | '!' | '.')
}

/// Maps a codon to its index in NCBI table order (T=0, C=1, A=2, G=3).
fn codon_index(chars: &[char]) -> Option<usize> {
    let mut idx = 0;
    for &c in chars {
        let digit = match c.to_ascii_uppercase() {
            'T' | 'U' => 0,
            'C' => 1,
            'A' => 2,
            'G' => 3,
            _ => return None,
        };
        idx = idx * 4 + digit;
    }
    Some(idx)
}

/// Looks up a genetic code by its NCBI ID.
pub fn by_id(id: u8) -> Option<&'static GeneticCode> {
    CODES.iter().find(|code| code.id == id)
}

/// The Standard genetic code (table 1).
pub fn standard() -> &'static GeneticCode {
    &CODES[0]
}

static CODES: [GeneticCode; 27] = [
    GeneticCode { id: 1, name: "Standard",
        aas: b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 2, name: "Vertebrate Mitochondrial",
        aas: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG" },
    GeneticCode { id: 3, name: "Yeast Mitochondrial",
        aas: b"FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 4, name: "Mold/Protozoan/Coelenterate Mitochondrial",
        aas: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 5, name: "Invertebrate Mitochondrial",
        aas: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG" },
    GeneticCode { id: 6, name: "Ciliate/Dasycladacean/Hexamita Nuclear",
        aas: b"FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 9, name: "Echinoderm/Flatworm Mitochondrial",
        aas: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG" },
    GeneticCode { id: 10, name: "Euplotid Nuclear",
        aas: b"FFLLSSSSYY**CCCWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 11, name: "Bacterial/Archaeal/Plant Plastid",
        aas: b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 12, name: "Alternative Yeast Nuclear",
        aas: b"FFLLSSSSYY**CC*WLLLSPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 13, name: "Ascidian Mitochondrial",
        aas: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSGGVVVVAAAADDEEGGGG" },
    GeneticCode { id: 14, name: "Alternative Flatworm Mitochondrial",
        aas: b"FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG" },
    GeneticCode { id: 15, name: "Blepharisma Macronuclear",
        aas: b"FFLLSSSSYY*QCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 16, name: "Chlorophycean Mitochondrial",
        aas: b"FFLLSSSSYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 21, name: "Trematode Mitochondrial",
        aas: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNNKSSSSVVVVAAAADDEEGGGG" },
    GeneticCode { id: 22, name: "Scenedesmus obliquus Mitochondrial",
        aas: b"FFLLSS*SYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 23, name: "Thraustochytrium Mitochondrial",
        aas: b"FF*LSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 24, name: "Rhabdopleuridae Mitochondrial",
        aas: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG" },
    GeneticCode { id: 25, name: "Candidate Division SR1/Gracilibacteria",
        aas: b"FFLLSSSSYY**CCGWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 26, name: "Pachysolen tannophilus Nuclear",
        aas: b"FFLLSSSSYY**CC*WLLLAPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 27, name: "Karyorelict Nuclear",
        aas: b"FFLLSSSSYYQQCCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 28, name: "Condylostoma Nuclear",
        aas: b"FFLLSSSSYYQQCCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 29, name: "Mesodinium Nuclear",
        aas: b"FFLLSSSSYYYYCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 30, name: "Peritrich Nuclear",
        aas: b"FFLLSSSSYYEECC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 31, name: "Blastocrithidia Nuclear",
        aas: b"FFLLSSSSYYEECCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 32, name: "Balanophoraceae Plastid",
        aas: b"FFLLSSSSYY*WCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG" },
    GeneticCode { id: 33, name: "Cephalodiscidae Mitochondrial",
        aas: b"FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG" },
];
