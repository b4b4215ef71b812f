// mod.rs - Tabular report writers

use crate::core::classify::MutationType;
use crate::core::matrix::FeatureMatrix;
use crate::core::stats::{GeneOrderStats, STAT_COLUMNS};
use crate::core::summary::{MatrixSummaryRow, MutationSummary, MutationTypeRow};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Column separator of a delimited report. Fields are never quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" | "comma" => Ok(Delimiter::Comma),
            "tsv" | "tab" => Ok(Delimiter::Tab),
            _ => Err(format!("Unsupported delimiter: {}. Use: csv, tsv", s)),
        }
    }
}

fn write_err(e: std::io::Error) -> String {
    format!("Write error: {}", e)
}

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &Path) -> Result<(), String> {
    if let Some(parent) = file_path.parent() {
        create_dir_all(parent)
            .map_err(|e| format!("Failed to create parent directory '{}': {}", parent.display(), e))?;
    }
    Ok(())
}

/// Create a buffered writer, making parent directories as needed
fn create_report(file_path: &Path) -> Result<BufWriter<File>, String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path.display(), e))?;
    Ok(BufWriter::new(file))
}

fn finish<W: Write>(mut writer: W) -> Result<(), String> {
    writer.flush().map_err(|e| format!("Flush error: {}", e))
}

/// Two decimals with exact ties rounded away from zero.
///
/// Only odd multiples of 1/8 sit exactly on a third-decimal 5 in binary,
/// so those are the only values `{:.2}` would round to even.
pub fn format_fixed2(value: f64) -> String {
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && (eighths % 2.0).abs() == 1.0 {
        return format!("{:.2}", value + value.signum() * 0.001);
    }
    format!("{:.2}", value)
}

/// One `SeqHeader` header line followed by one line per matrix row
pub fn write_feature_matrix_to<W: Write>(
    writer: &mut W,
    matrix: &FeatureMatrix,
    delimiter: Delimiter,
) -> Result<(), String> {
    let sep = delimiter.as_char();

    write!(writer, "SeqHeader").map_err(write_err)?;
    for label in &matrix.column_labels {
        write!(writer, "{}{}", sep, label).map_err(write_err)?;
    }
    writeln!(writer).map_err(write_err)?;

    for (label, row) in matrix.row_labels.iter().zip(&matrix.rows) {
        write!(writer, "{}", label).map_err(write_err)?;
        for cell in row {
            write!(writer, "{}{}", sep, cell).map_err(write_err)?;
        }
        writeln!(writer).map_err(write_err)?;
    }

    Ok(())
}

pub fn write_feature_matrix(
    file_path: &Path,
    matrix: &FeatureMatrix,
    delimiter: Delimiter,
) -> Result<(), String> {
    let mut writer = create_report(file_path)?;
    write_feature_matrix_to(&mut writer, matrix, delimiter)?;
    finish(writer)
}

/// Detail rows, a blank line, then per-group aggregate rows (tab separated)
pub fn write_mutation_summary_to<W: Write>(
    writer: &mut W,
    summary: &MutationSummary,
) -> Result<(), String> {
    let label = summary.group_label;

    writeln!(writer, "Header\t{}\tMutations", label).map_err(write_err)?;
    for entry in &summary.sequences {
        writeln!(writer, "{}\t{}\t{}", entry.header, entry.group, entry.mutations)
            .map_err(write_err)?;
    }

    writeln!(writer).map_err(write_err)?;
    writeln!(writer, "{}\tNumSequences\tAvgMutations", label).map_err(write_err)?;
    for group in &summary.groups {
        writeln!(
            writer,
            "{}\t{}\t{}",
            group.group,
            group.num_sequences,
            format_fixed2(group.average())
        )
        .map_err(write_err)?;
    }

    Ok(())
}

pub fn write_mutation_summary(file_path: &Path, summary: &MutationSummary) -> Result<(), String> {
    let mut writer = create_report(file_path)?;
    write_mutation_summary_to(&mut writer, summary)?;
    finish(writer)
}

pub fn write_mutation_type_summary_to<W: Write>(
    writer: &mut W,
    rows: &[MutationTypeRow],
) -> Result<(), String> {
    write!(writer, "Gene,Order").map_err(write_err)?;
    for kind in MutationType::REPORTED {
        write!(writer, ",{}", kind).map_err(write_err)?;
    }
    writeln!(writer).map_err(write_err)?;

    for row in rows {
        write!(writer, "{},{}", row.gene, row.order).map_err(write_err)?;
        for kind in MutationType::REPORTED {
            write!(writer, ",{}", row.counts.get(kind)).map_err(write_err)?;
        }
        writeln!(writer).map_err(write_err)?;
    }

    Ok(())
}

pub fn write_mutation_type_summary(file_path: &Path, rows: &[MutationTypeRow]) -> Result<(), String> {
    let mut writer = create_report(file_path)?;
    write_mutation_type_summary_to(&mut writer, rows)?;
    finish(writer)
}

pub fn write_matrix_summary_to<W: Write>(
    writer: &mut W,
    rows: &[MatrixSummaryRow],
) -> Result<(), String> {
    writeln!(writer, "Gene,Order,SeqHeader,PercentMutated,NumMutated,NumPositions")
        .map_err(write_err)?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            row.gene,
            row.order,
            row.seq_header,
            format_fixed2(row.percent_mutated()),
            row.num_mutated,
            row.num_positions
        )
        .map_err(write_err)?;
    }
    Ok(())
}

pub fn write_matrix_summary(file_path: &Path, rows: &[MatrixSummaryRow]) -> Result<(), String> {
    let mut writer = create_report(file_path)?;
    write_matrix_summary_to(&mut writer, rows)?;
    finish(writer)
}

pub fn write_gene_order_stats_to<W: Write>(
    writer: &mut W,
    stats: &[GeneOrderStats],
) -> Result<(), String> {
    writeln!(writer, "Gene\tOrder\t{}", STAT_COLUMNS.join("\t")).map_err(write_err)?;
    for s in stats {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            s.gene,
            s.order,
            s.polymorphic_sites,
            s.nucleotide_diversity,
            s.tajimas_d,
            s.recombination_rate,
            s.mutation_rate_per_base
        )
        .map_err(write_err)?;
    }
    Ok(())
}

pub fn write_gene_order_stats(file_path: &Path, stats: &[GeneOrderStats]) -> Result<(), String> {
    let mut writer = create_report(file_path)?;
    write_gene_order_stats_to(&mut writer, stats)?;
    finish(writer)
}

/// FASTA records with sequences wrapped at `line_width` columns
pub fn write_fasta_to<'a, W, I>(writer: &mut W, records: I, line_width: usize) -> Result<(), String>
where
    W: Write,
    I: IntoIterator<Item = &'a (String, String)>,
{
    let line_width = line_width.max(1);
    for (header, sequence) in records {
        writeln!(writer, ">{}", header).map_err(write_err)?;
        for chunk in sequence.as_bytes().chunks(line_width) {
            writer.write_all(chunk).map_err(write_err)?;
            writeln!(writer).map_err(write_err)?;
        }
    }
    Ok(())
}

pub fn write_fasta<'a, I>(file_path: &Path, records: I, line_width: usize) -> Result<(), String>
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    let mut writer = create_report(file_path)?;
    write_fasta_to(&mut writer, records, line_width)?;
    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classify::MutationTypeCounts;
    use crate::core::matrix::{build_mutation_matrix, build_onehot_matrix, DEFAULT_ALPHABET};
    use crate::core::summary::{GroupSummary, SequenceMutations};
    use crate::data::AlignedSequenceSet;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<(), String>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_binary_matrix_csv() {
        let alignment = AlignedSequenceSet::parse(">ref\nACGT\n>q\nAGGT\n");
        let matrix = build_mutation_matrix(&alignment).unwrap();
        let text = render(|w| write_feature_matrix_to(w, &matrix, Delimiter::Comma));

        assert_eq!(
            text,
            "SeqHeader,Pos1,Pos2,Pos3,Pos4\nSeq1,0,0,0,0\nSeq2,0,1,0,0\n"
        );
    }

    #[test]
    fn test_onehot_matrix_csv_uses_headers() {
        let alignment = AlignedSequenceSet::parse(">ref a\nG\n");
        let matrix = build_onehot_matrix(&alignment, DEFAULT_ALPHABET).unwrap();
        let text = render(|w| write_feature_matrix_to(w, &matrix, Delimiter::Comma));

        assert_eq!(
            text,
            "SeqHeader,Pos1_A,Pos1_C,Pos1_G,Pos1_T,Pos1_-\nref a,0,0,1,0,0\n"
        );
    }

    #[test]
    fn test_tab_delimiter() {
        let alignment = AlignedSequenceSet::parse(">ref\nAC\n");
        let matrix = build_mutation_matrix(&alignment).unwrap();
        let text = render(|w| write_feature_matrix_to(w, &matrix, Delimiter::Tab));
        assert_eq!(text, "SeqHeader\tPos1\tPos2\nSeq1\t0\t0\n");
        assert_eq!("TSV".parse::<Delimiter>().unwrap(), Delimiter::Tab);
        assert!("xml".parse::<Delimiter>().is_err());
    }

    #[test]
    fn test_mutation_summary_sections() {
        let summary = MutationSummary {
            group_label: "Order",
            sequences: vec![
                SequenceMutations { header: "a".into(), group: "Nostocales".into(), mutations: 1 },
                SequenceMutations { header: "b".into(), group: "Nostocales".into(), mutations: 2 },
            ],
            groups: vec![GroupSummary {
                group: "Nostocales".into(),
                num_sequences: 2,
                total_mutations: 3,
            }],
        };
        let text = render(|w| write_mutation_summary_to(w, &summary));

        assert_eq!(
            text,
            "Header\tOrder\tMutations\na\tNostocales\t1\nb\tNostocales\t2\n\nOrder\tNumSequences\tAvgMutations\nNostocales\t2\t1.50\n"
        );
    }

    #[test]
    fn test_fixed2_rounds_ties_away_from_zero() {
        assert_eq!(format_fixed2(0.125), "0.13");
        assert_eq!(format_fixed2(0.375), "0.38");
        assert_eq!(format_fixed2(-0.125), "-0.13");
        assert_eq!(format_fixed2(2.5), "2.50");
        assert_eq!(format_fixed2(1.0 / 3.0), "0.33");
        assert_eq!(format_fixed2(12.5), "12.50");
        assert_eq!(format_fixed2(f64::NAN), "NaN");
    }

    #[test]
    fn test_mutation_summary_tie_average() {
        let summary = MutationSummary {
            group_label: "Order",
            sequences: Vec::new(),
            groups: vec![GroupSummary {
                group: "Nostocales".into(),
                num_sequences: 8,
                total_mutations: 1,
            }],
        };
        let text = render(|w| write_mutation_summary_to(w, &summary));
        assert_eq!(text.lines().last(), Some("Nostocales\t8\t0.13"));
    }

    #[test]
    fn test_mutation_type_summary_csv() {
        let mut counts = MutationTypeCounts::new();
        counts.increment(MutationType::Missense);
        counts.increment(MutationType::FrameshiftDeletion);
        counts.increment(MutationType::FrameshiftDeletion);
        let rows = vec![MutationTypeRow {
            gene: "mcyA".into(),
            order: "Nostocales".into(),
            counts,
        }];
        let text = render(|w| write_mutation_type_summary_to(w, &rows));

        assert_eq!(
            text,
            "Gene,Order,Missense,Frameshift,FrameshiftDeletion,FrameshiftInsertion,Complex,InFrame\nmcyA,Nostocales,1,0,2,0,0,0\n"
        );
    }

    #[test]
    fn test_matrix_summary_and_stats_tables() {
        let rows = vec![MatrixSummaryRow {
            gene: "mcyE".into(),
            order: "Oscillatoriales".into(),
            seq_header: "Seq2".into(),
            num_mutated: 1,
            num_positions: 3,
        }];
        let text = render(|w| write_matrix_summary_to(w, &rows));
        assert_eq!(
            text,
            "Gene,Order,SeqHeader,PercentMutated,NumMutated,NumPositions\nmcyE,Oscillatoriales,Seq2,33.33,1,3\n"
        );

        let stats = vec![GeneOrderStats {
            gene: "mcyA".into(),
            order: "Nostocales".into(),
            polymorphic_sites: 4,
            nucleotide_diversity: 0.25,
            tajimas_d: f64::NAN,
            recombination_rate: 0.0,
            mutation_rate_per_base: -1.5,
        }];
        let text = render(|w| write_gene_order_stats_to(w, &stats));
        assert_eq!(
            text,
            "Gene\tOrder\tPolymorphicSites\tNucleotideDiversity\tTajimasD\tRecombinationRate\tMutationRatePerBase\nmcyA\tNostocales\t4\t0.25\tNaN\t0\t-1.5\n"
        );
    }

    #[test]
    fn test_fasta_wrapping() {
        let records = vec![("h1".to_string(), "ACGTACGTAC".to_string())];
        let text = render(|w| write_fasta_to(w, &records, 4));
        assert_eq!(text, ">h1\nACGT\nACGT\nAC\n");
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("m.csv");
        let alignment = AlignedSequenceSet::parse(">ref\nA\n");
        let matrix = build_mutation_matrix(&alignment).unwrap();

        write_feature_matrix(&path, &matrix, Delimiter::Comma).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "SeqHeader,Pos1\nSeq1,0\n"
        );
    }
}
