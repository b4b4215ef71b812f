// layout.rs - Analysis parameters and on-disk layout of a run

use crate::core::matrix::DEFAULT_ALPHABET;
use crate::tools::{default_jobs, MsaJob};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_GENES: [&str; 4] = ["mcyA", "mcyB", "mcyE", "mcyH"];
pub const DEFAULT_ORDERS: [&str; 3] = ["Chroococcales", "Nostocales", "Oscillatoriales"];
pub const DEFAULT_TARGET_GENES: [&str; 7] = [
    "mcyA",
    "mcyB",
    "mcyE",
    "mcyH",
    "adenylation",
    "ABC transporter",
    "aminotransferase",
];
pub const DEFAULT_MAX_SEQUENCES: usize = 1000;
pub const FASTA_LINE_WIDTH: usize = 60;

pub const MUTATION_TYPE_SUMMARY_FILE: &str = "mutation_type_summary.csv";
pub const MATRIX_SUMMARY_FILE: &str = "mutation_matrix_summary.csv";

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// What is analysed: the (gene, order) grid, extraction targets, MSA jobs
/// and the one-hot alphabet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub genes: Vec<String>,
    pub orders: Vec<String>,
    pub target_genes: Vec<String>,
    pub jobs: Vec<MsaJob>,
    pub alphabet: Vec<u8>,
    pub max_sequences: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            genes: to_strings(&DEFAULT_GENES),
            orders: to_strings(&DEFAULT_ORDERS),
            target_genes: to_strings(&DEFAULT_TARGET_GENES),
            jobs: default_jobs(),
            alphabet: DEFAULT_ALPHABET.to_vec(),
            max_sequences: DEFAULT_MAX_SEQUENCES,
        }
    }
}

impl AnalysisConfig {
    /// (gene, order) pairs, gene-major
    pub fn grid(&self) -> Vec<(&str, &str)> {
        self.genes
            .iter()
            .flat_map(|gene| self.orders.iter().map(move |order| (gene.as_str(), order.as_str())))
            .collect()
    }
}

/// Directory layout of a run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineLayout {
    pub dataset_root: PathBuf,
    pub reference_root: PathBuf,
    pub extracted_root: PathBuf,
    pub msa_root: PathBuf,
    pub stats_output: PathBuf,
}

impl PipelineLayout {
    /// Layout with every directory under `base`, stats table under `MSA/plots`
    pub fn under(base: &Path) -> Self {
        let msa_root = base.join("MSA");
        Self {
            dataset_root: base.join("DataSet"),
            reference_root: base.join("ReferenceGenes"),
            extracted_root: base.join("ExtractedGenes"),
            stats_output: msa_root.join("plots").join("gene_order_stats_table.tsv"),
            msa_root,
        }
    }

    pub fn aligned_fasta(&self, order: &str, gene: &str) -> PathBuf {
        self.msa_root
            .join(order)
            .join(format!("{}_aligned.fasta", gene.to_lowercase()))
    }

    /// Per-sequence summary, written beside the alignment
    pub fn mutation_summary(&self, order: &str, gene: &str) -> PathBuf {
        self.msa_root
            .join(order)
            .join(format!("{}_mutation_summary.tsv", gene.to_lowercase()))
    }

    pub fn stats_file(&self, order: &str, gene: &str) -> PathBuf {
        self.msa_root
            .join(order)
            .join(format!("{}_stats.tsv", gene.to_lowercase()))
    }

    pub fn extracted_fasta(&self, genus: &str, gene: &str) -> PathBuf {
        self.extracted_root.join(genus).join(format!("{}.fasta", gene))
    }

    pub fn matrix_dir(&self) -> PathBuf {
        self.msa_root.join("feature_matrices")
    }

    pub fn onehot_dir(&self) -> PathBuf {
        self.msa_root.join("feature_matrices_onehot")
    }

    pub fn mutation_matrix(&self, order: &str, gene: &str) -> PathBuf {
        self.matrix_dir()
            .join(format!("{}_{}_mutation_matrix.csv", order, gene))
    }

    pub fn onehot_matrix(&self, order: &str, gene: &str) -> PathBuf {
        self.onehot_dir()
            .join(format!("{}_{}_onehot_matrix.csv", order, gene))
    }

    pub fn mutation_type_summary(&self) -> PathBuf {
        self.matrix_dir().join(MUTATION_TYPE_SUMMARY_FILE)
    }

    pub fn matrix_summary(&self) -> PathBuf {
        self.matrix_dir().join(MATRIX_SUMMARY_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_is_gene_major() {
        let config = AnalysisConfig {
            genes: to_strings(&["mcyA", "mcyB"]),
            orders: to_strings(&["Nostocales", "Oscillatoriales"]),
            ..AnalysisConfig::default()
        };
        assert_eq!(
            config.grid(),
            vec![
                ("mcyA", "Nostocales"),
                ("mcyA", "Oscillatoriales"),
                ("mcyB", "Nostocales"),
                ("mcyB", "Oscillatoriales"),
            ]
        );
        assert_eq!(AnalysisConfig::default().grid().len(), 12);
    }

    #[test]
    fn test_layout_paths() {
        let layout = PipelineLayout::under(Path::new("/data"));

        assert_eq!(
            layout.aligned_fasta("Nostocales", "mcyA"),
            PathBuf::from("/data/MSA/Nostocales/mcya_aligned.fasta")
        );
        assert_eq!(
            layout.mutation_matrix("Nostocales", "mcyA"),
            PathBuf::from("/data/MSA/feature_matrices/Nostocales_mcyA_mutation_matrix.csv")
        );
        assert_eq!(
            layout.onehot_matrix("Nostocales", "mcyE"),
            PathBuf::from("/data/MSA/feature_matrices_onehot/Nostocales_mcyE_onehot_matrix.csv")
        );
        assert_eq!(
            layout.stats_file("Chroococcales", "mcyH"),
            PathBuf::from("/data/MSA/Chroococcales/mcyh_stats.tsv")
        );
        assert_eq!(
            layout.stats_output,
            PathBuf::from("/data/MSA/plots/gene_order_stats_table.tsv")
        );
    }
}
