//! phylowriter - Phylogenetic dataset writer
//!
//! Reads annotated FASTA input and writes a dataset in the requested
//! format.
//!
//! ## Usage
//!
//! ```bash
//! phylowriter sequences.fasta -f nexus -o dataset.nex
//! phylowriter sequences.fasta -f phylip -p "by codon position" -o dataset.phy
//! ```
//!
//! ## Input
//!
//! FASTA records with pipe-separated header fields:
//!
//! ```text
//! >voucher|gene|genus|species[|reading_frame[|table]]
//! ACGT...
//! ```
//!
//! Records are sorted by gene code and then voucher code before the
//! dataset is built.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use phylowriter::dataset::{Dataset, Settings};
use phylowriter::degen::DegenMethod;
use phylowriter::formats::OutputFormat;
use phylowriter::partition::{CodonPositions, Partitioning};
use phylowriter::record::{ReadingFrame, SeqRecord};

/// Output format specification for the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// NEXUS with a MrBayes charset footer
    Nexus,
    /// Relaxed PHYLIP plus a RAxML-style partition file
    Phylip,
    /// Plain FASTA
    Fasta,
    /// TNT with an xread header
    Tnt,
    /// MEGA with concatenated per-taxon sequences
    Mega,
    /// FASTA with GenBank submission headers
    GenbankFasta,
    /// FASTA with Bankit submission headers
    Bankit,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Nexus => OutputFormat::Nexus,
            FormatArg::Phylip => OutputFormat::Phylip,
            FormatArg::Fasta => OutputFormat::Fasta,
            FormatArg::Tnt => OutputFormat::Tnt,
            FormatArg::Mega => OutputFormat::Mega,
            FormatArg::GenbankFasta => OutputFormat::GenbankFasta,
            FormatArg::Bankit => OutputFormat::Bankit,
        }
    }
}

/// phylowriter - Build phylogenetic datasets from annotated FASTA input
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Annotated FASTA file (>voucher|gene|genus|species[|frame[|table]])
    file: PathBuf,

    /// Output dataset format
    #[arg(short = 'f', long = "format", value_enum, default_value = "nexus")]
    format: FormatArg,

    /// Codon positions to include: 1st, 2nd, 3rd, 1st-2nd or ALL
    #[arg(short = 'c', long = "codon-positions", default_value = "ALL")]
    codon_positions: CodonPositions,

    /// Partitioning scheme: "by gene", "by codon position" or "1st-2nd, 3rd"
    #[arg(short = 'p', long = "partitioning", default_value = "by gene")]
    partitioning: Partitioning,

    /// Write translated amino acid sequences instead of nucleotides
    #[arg(short = 'a', long = "aminoacids")]
    aminoacids: bool,

    /// Degenerate sequences with the given method: S, Z, SZ or normal
    #[arg(short = 'd', long = "degenerate")]
    degenerate: Option<DegenMethod>,

    /// Voucher code to use as outgroup (NEXUS and TNT)
    #[arg(long = "outgroup")]
    outgroup: Option<String>,

    /// Output file. Use "-" for stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: String,

    /// Where to write the PHYLIP partition file (default: <output>.charsets)
    #[arg(long = "charsets")]
    charsets: Option<PathBuf>,
}

/// Parses the annotated FASTA input into records sorted by gene, then
/// voucher.
fn parse_input(path: &PathBuf) -> Result<Vec<SeqRecord>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let mut records: Vec<SeqRecord> = Vec::new();
    for (line_number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            records.push(parse_header(header).with_context(|| {
                format!("Bad record header on line {}", line_number + 1)
            })?);
        } else {
            let record = records
                .last_mut()
                .context("Sequence data found before the first '>' header")?;
            record.seq.push_str(line);
        }
    }

    if records.is_empty() {
        anyhow::bail!("No sequence records found in {}", path.display());
    }

    records.sort_by(|a, b| {
        (a.gene_code.to_lowercase(), &a.voucher_code)
            .cmp(&(b.gene_code.to_lowercase(), &b.voucher_code))
    });
    Ok(records)
}

fn parse_header(header: &str) -> Result<SeqRecord> {
    let fields: Vec<&str> = header.split('|').collect();
    if fields.len() < 4 {
        anyhow::bail!(
            "Expected at least 4 pipe-separated fields \
             (voucher|gene|genus|species), got {}",
            fields.len()
        );
    }

    let mut record = SeqRecord::new(fields[1], fields[0], "");
    record.taxonomy.genus = Some(fields[2].to_string());
    record.taxonomy.species = Some(fields[3].to_string());

    if let Some(frame) = fields.get(4).filter(|f| !f.is_empty()) {
        let value: u8 = frame
            .parse()
            .with_context(|| format!("Reading frame is not a number: '{}'", frame))?;
        record.reading_frame = Some(
            ReadingFrame::from_int(value)
                .with_context(|| format!("Reading frame must be 1-3 (got {})", value))?,
        );
    }
    if let Some(table) = fields.get(5).filter(|f| !f.is_empty()) {
        record.table = table
            .parse()
            .with_context(|| format!("Genetic code table is not a number: '{}'", table))?;
    }
    Ok(record)
}

fn write_output(output: &str, contents: &str) -> Result<()> {
    if output == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", contents)?;
    } else {
        fs::write(output, contents)
            .with_context(|| format!("Failed to write output file: {}", output))?;
        eprintln!("Wrote dataset to {}", output);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.aminoacids && args.degenerate.is_some() {
        anyhow::bail!("--aminoacids and --degenerate cannot be combined");
    }

    let records = parse_input(&args.file)?;

    let settings = Settings {
        format: args.format.into(),
        codon_positions: args.codon_positions,
        partitioning: args.partitioning,
        aminoacids: args.aminoacids,
        degenerate: args.degenerate,
        outgroup: args.outgroup,
    };

    let dataset = Dataset::new(records, &settings)?;

    write_output(&args.output, &dataset.dataset_str)?;

    if let Some(extra) = &dataset.extra_dataset_str {
        let charsets_path = match (&args.charsets, args.output.as_str()) {
            (Some(path), _) => Some(path.clone()),
            // Stdout mode: append the partition file after the dataset.
            (None, "-") => None,
            (None, output) => Some(PathBuf::from(format!("{}.charsets", output))),
        };
        match charsets_path {
            Some(path) => {
                fs::write(&path, extra).with_context(|| {
                    format!("Failed to write charsets file: {}", path.display())
                })?;
                eprintln!("Wrote charsets to {}", path.display());
            }
            None => println!("\n{}", extra),
        }
    }

    for warning in &dataset.warnings {
        eprintln!("WARNING: {}", warning);
    }

    Ok(())
}
