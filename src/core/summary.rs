// summary.rs - Per-sequence and per-group mutation summaries

use crate::core::classify::{count_mutations, MutationTypeCounts};
use crate::data::loaders::{load_matrix_counts, parse_matrix_file_name, MATRIX_FILE_SUFFIX};
use crate::data::AlignedSequenceSet;
use indexmap::IndexMap;
use regex::Regex;
use std::path::Path;
use std::str::FromStr;

/// Group label used when no genus/order can be derived
pub const UNKNOWN_GROUP: &str = "Unknown";

/// How sequences are assigned to a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingStrategy {
    /// First alphabetic word of the header
    GenusFromHeader,
    /// `[order=...]` tag in the header
    OrderFromHeader,
    /// Name of the directory holding the alignment file
    OrderFromPath,
}

impl FromStr for GroupingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "genus" => Ok(GroupingStrategy::GenusFromHeader),
            "order-tag" | "order-header" => Ok(GroupingStrategy::OrderFromHeader),
            "order" | "order-path" => Ok(GroupingStrategy::OrderFromPath),
            _ => Err(format!(
                "Invalid grouping: {}. Use: genus, order-tag, order-path",
                s
            )),
        }
    }
}

impl GroupingStrategy {
    /// Column label used in the summary report
    pub fn label(&self) -> &'static str {
        match self {
            GroupingStrategy::GenusFromHeader => "Genus",
            GroupingStrategy::OrderFromHeader | GroupingStrategy::OrderFromPath => "Order",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GroupingStrategy::GenusFromHeader => "genus from header",
            GroupingStrategy::OrderFromHeader => "order from [order=...] tag",
            GroupingStrategy::OrderFromPath => "order from alignment directory",
        }
    }
}

/// First alphabetic word of a header
pub fn genus_from_header(header: &str) -> String {
    thread_local! {
        static WORD: Regex = Regex::new(r"\b([A-Za-z]+)\b").unwrap();
    }
    WORD.with(|re| {
        re.captures(header)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN_GROUP.to_string())
    })
}

/// Value of an `[order=...]` header tag
pub fn order_from_header(header: &str) -> String {
    thread_local! {
        static ORDER: Regex = Regex::new(r"(?i)\[order\s*=\s*([^\]]+)\]").unwrap();
    }
    ORDER.with(|re| {
        re.captures(header)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| UNKNOWN_GROUP.to_string())
    })
}

/// Name of the directory that contains a file
pub fn order_from_path(path: &Path) -> String {
    path.parent()
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_GROUP.to_string())
}

/// Optional header filters applied to the non-reference records
#[derive(Debug, Clone, Default)]
pub struct HeaderFilter {
    pub include: Option<Regex>,
    pub exclude: Option<Regex>,
}

impl HeaderFilter {
    pub fn accepts(&self, header: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.is_match(header) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(header) {
                return false;
            }
        }
        true
    }
}

/// Mutation count of one sequence against the reference
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceMutations {
    pub header: String,
    pub group: String,
    pub mutations: usize,
}

/// Aggregate of one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group: String,
    pub num_sequences: usize,
    pub total_mutations: usize,
}

impl GroupSummary {
    pub fn average(&self) -> f64 {
        if self.num_sequences == 0 {
            0.0
        } else {
            self.total_mutations as f64 / self.num_sequences as f64
        }
    }
}

/// Per-sequence mutation counts and their per-group aggregates for one alignment
#[derive(Debug, Clone, PartialEq)]
pub struct MutationSummary {
    pub group_label: &'static str,
    pub sequences: Vec<SequenceMutations>,
    pub groups: Vec<GroupSummary>,
}

impl MutationSummary {
    /// Count gap-skipping mutations of every record except the reference and
    /// group them. Groups appear in first-seen order; empty groups never appear.
    ///
    /// Fails when the reference header is not part of the alignment.
    pub fn build(
        alignment: &AlignedSequenceSet,
        reference_header: &str,
        strategy: GroupingStrategy,
        source_path: &Path,
        filter: &HeaderFilter,
    ) -> Result<Self, String> {
        let (_, reference) = alignment.reference(Some(reference_header)).ok_or_else(|| {
            format!("Reference header '{}' not found in alignment.", reference_header)
        })?;

        let path_order = match strategy {
            GroupingStrategy::OrderFromPath => Some(order_from_path(source_path)),
            _ => None,
        };

        let mut sequences = Vec::new();
        let mut groups: IndexMap<String, GroupSummary> = IndexMap::new();

        for (header, sequence) in alignment.iter() {
            if header == reference_header || !filter.accepts(header) {
                continue;
            }

            let mutations = count_mutations(reference, sequence);
            let group = match (&path_order, strategy) {
                (Some(order), _) => order.clone(),
                (None, GroupingStrategy::OrderFromHeader) => order_from_header(header),
                (None, _) => genus_from_header(header),
            };

            let entry = groups.entry(group.clone()).or_insert_with(|| GroupSummary {
                group: group.clone(),
                num_sequences: 0,
                total_mutations: 0,
            });
            entry.num_sequences += 1;
            entry.total_mutations += mutations;

            sequences.push(SequenceMutations {
                header: header.to_string(),
                group,
                mutations,
            });
        }

        Ok(Self {
            group_label: strategy.label(),
            sequences,
            groups: groups.into_values().collect(),
        })
    }
}

/// Mutation-type tally of one (gene, order) alignment
#[derive(Debug, Clone, PartialEq)]
pub struct MutationTypeRow {
    pub gene: String,
    pub order: String,
    pub counts: MutationTypeCounts,
}

/// Percent of mutated positions for one matrix row
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSummaryRow {
    pub gene: String,
    pub order: String,
    pub seq_header: String,
    pub num_mutated: usize,
    pub num_positions: usize,
}

impl MatrixSummaryRow {
    /// NaN for a matrix without positions
    pub fn percent_mutated(&self) -> f64 {
        100.0 * self.num_mutated as f64 / self.num_positions as f64
    }
}

/// Re-read every `{order}_{gene}_mutation_matrix.csv` in a directory and
/// report the mutated share of each row. Files are visited in name order.
pub fn summarize_matrix_dir(matrix_dir: &Path) -> Result<Vec<MatrixSummaryRow>, String> {
    let mut files: Vec<_> = std::fs::read_dir(matrix_dir)
        .map_err(|e| format!("Failed to read matrix directory {}: {}", matrix_dir.display(), e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.ends_with(MATRIX_FILE_SUFFIX))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();

    let mut rows = Vec::new();
    for path in files {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let (order, gene) = match parse_matrix_file_name(file_name) {
            Some(parts) => parts,
            None => continue,
        };

        let counts = match load_matrix_counts(&path) {
            Ok(Some(counts)) => counts,
            Ok(None) => continue,
            Err(e) => {
                println!("⚠️  Warning: {}", e);
                continue;
            }
        };

        for (seq_header, num_mutated) in counts.rows {
            rows.push(MatrixSummaryRow {
                gene: gene.clone(),
                order: order.clone(),
                seq_header,
                num_mutated,
                num_positions: counts.num_positions,
            });
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn source() -> PathBuf {
        PathBuf::from("/data/MSA/Nostocales/mcya_aligned.fasta")
    }

    #[test]
    fn test_grouping_helpers() {
        assert_eq!(genus_from_header("Microcystis aeruginosa strain"), "Microcystis");
        assert_eq!(genus_from_header("123 456"), UNKNOWN_GROUP);
        assert_eq!(order_from_header("x [Order = Nostocales ] y"), "Nostocales");
        assert_eq!(order_from_header("x"), UNKNOWN_GROUP);
        assert_eq!(order_from_path(&source()), "Nostocales");
        assert_eq!(order_from_path(Path::new("file.fasta")), UNKNOWN_GROUP);
    }

    #[test]
    fn test_summary_by_path_order() {
        let alignment = AlignedSequenceSet::parse(">ref\nAC-T\n>q1\nAGGT\n>q2\nTTTT\n>q3\nAC-T\n");
        let summary = MutationSummary::build(
            &alignment,
            "ref",
            GroupingStrategy::OrderFromPath,
            &source(),
            &HeaderFilter::default(),
        )
        .unwrap();

        assert_eq!(summary.group_label, "Order");
        let counts: Vec<usize> = summary.sequences.iter().map(|s| s.mutations).collect();
        assert_eq!(counts, vec![1, 2, 0]);
        assert_eq!(summary.groups.len(), 1);
        assert_eq!(summary.groups[0].group, "Nostocales");
        assert_eq!(summary.groups[0].num_sequences, 3);
        assert_eq!(format!("{:.2}", summary.groups[0].average()), "1.00");
    }

    #[test]
    fn test_summary_by_genus_first_seen_order() {
        let alignment = AlignedSequenceSet::parse(
            ">Ref genome\nACGT\n>Nostoc a\nACGA\n>Microcystis b\nTCGA\n>Nostoc c\nACGT\n",
        );
        let summary = MutationSummary::build(
            &alignment,
            "Ref genome",
            GroupingStrategy::GenusFromHeader,
            &source(),
            &HeaderFilter::default(),
        )
        .unwrap();

        let groups: Vec<(&str, usize)> = summary
            .groups
            .iter()
            .map(|g| (g.group.as_str(), g.num_sequences))
            .collect();
        assert_eq!(groups, vec![("Nostoc", 2), ("Microcystis", 1)]);
        assert_eq!(format!("{:.2}", summary.groups[0].average()), "0.50");
        assert_eq!(format!("{:.2}", summary.groups[1].average()), "2.00");
    }

    #[test]
    fn test_summary_missing_reference() {
        let alignment = AlignedSequenceSet::parse(">a\nACGT\n");
        let result = MutationSummary::build(
            &alignment,
            "missing",
            GroupingStrategy::GenusFromHeader,
            &source(),
            &HeaderFilter::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_header_filter() {
        let alignment = AlignedSequenceSet::parse(">ref\nACGT\n>keep 1\nACGA\n>drop 2\nTCGA\n");
        let filter = HeaderFilter {
            include: None,
            exclude: Some(Regex::new("^drop").unwrap()),
        };
        let summary = MutationSummary::build(
            &alignment,
            "ref",
            GroupingStrategy::OrderFromPath,
            &source(),
            &filter,
        )
        .unwrap();

        assert_eq!(summary.sequences.len(), 1);
        assert_eq!(summary.sequences[0].header, "keep 1");
    }

    #[test]
    fn test_only_reference_has_no_groups() {
        let alignment = AlignedSequenceSet::parse(">ref\nACGT\n");
        let summary = MutationSummary::build(
            &alignment,
            "ref",
            GroupingStrategy::OrderFromPath,
            &source(),
            &HeaderFilter::default(),
        )
        .unwrap();
        assert!(summary.sequences.is_empty());
        assert!(summary.groups.is_empty());
    }

    #[test]
    fn test_summarize_matrix_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Nostocales_mcyB_mutation_matrix.csv"),
            "SeqHeader,Pos1,Pos2,Pos3,Pos4\nSeq1,0,0,0,0\nSeq2,1,0,1,1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Chroococcales_mcyA_mutation_matrix.csv"),
            "SeqHeader,Pos1,Pos2,Pos3\nSeq1,0,0,0\nSeq2,1,0,0\n",
        )
        .unwrap();
        fs::write(dir.path().join("mutation_type_summary.csv"), "Gene,Order\n").unwrap();

        let rows = summarize_matrix_dir(dir.path()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].order, "Chroococcales");
        assert_eq!(rows[1].gene, "mcyA");
        assert_eq!(format!("{:.2}", rows[1].percent_mutated()), "33.33");
        assert_eq!(rows[3].num_mutated, 3);
        assert_eq!(format!("{:.2}", rows[3].percent_mutated()), "75.00");
    }

    #[test]
    fn test_matrix_without_positions_reports_nan() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Nostocales_mcyH_mutation_matrix.csv"),
            "SeqHeader\nSeq1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Stigonematales_mcyE_mutation_matrix.csv"),
            b"SeqHeader,Pos1\nSeq\xb5,1\n",
        )
        .unwrap();

        let rows = summarize_matrix_dir(dir.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].seq_header, "Seq1");
        assert_eq!(rows[0].num_positions, 0);
        assert_eq!(rows[0].num_mutated, 0);
        assert!(rows[0].percent_mutated().is_nan());
        assert_eq!(rows[1].seq_header, "Seq\u{FFFD}");
        assert_eq!(rows[1].num_mutated, 1);
    }
}
