// config.rs - Configuration file support

use crate::tools::MsaJob;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Directories
    pub base_dir: Option<String>,
    pub dataset: Option<String>,
    pub reference_genes: Option<String>,
    pub extracted: Option<String>,
    pub msa_dir: Option<String>,
    pub stats_output: Option<String>,

    // External tools
    pub aligner: Option<String>,
    pub validator: Option<String>,

    // Run selection
    pub stages: Option<String>,
    pub group_by: Option<String>,
    pub reference_header: Option<String>,

    // Analysis grid
    pub genes: Option<Vec<String>>,
    pub orders: Option<Vec<String>>,
    pub target_genes: Option<Vec<String>>,
    pub alphabet: Option<String>,
    pub max_sequences: Option<usize>,

    // Performance
    pub threads: Option<usize>,

    // Header filtering
    pub include_headers: Option<String>,
    pub exclude_headers: Option<String>,

    // Flags
    pub dry_run: Option<bool>,

    // MSA jobs (config file only)
    pub jobs: Option<Vec<MsaJob>>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# mcyscan.toml - Configuration file for mcyscan
# Command line arguments will override these settings

# =============================================================================
# DIRECTORIES
# =============================================================================

# Base directory holding DataSet, ReferenceGenes, ExtractedGenes and MSA
base_dir = "/path/to/Research"

# Individual overrides (default: under base_dir)
# dataset = "/path/to/Research/DataSet"
# reference_genes = "/path/to/Research/ReferenceGenes"
# extracted = "/path/to/Research/ExtractedGenes"
# msa_dir = "/path/to/Research/MSA"
# stats_output = "/path/to/Research/MSA/plots/gene_order_stats_table.tsv"

# =============================================================================
# EXTERNAL TOOLS (align stage only)
# =============================================================================

# MUSCLE-compatible aligner, called as: <aligner> -in X -out Y -maxiters 1 -diags1
aligner = "muscle"

# FASTA validator, called as: <validator> <file>; exit code 0 = valid
# validator = "/usr/local/bin/validate-fasta"

# =============================================================================
# RUN SELECTION
# =============================================================================

# Stages: extract, align, summarize, matrices, onehot, types, matrix-summary, stats
# "default" = summarize, matrices, types, matrix-summary, stats; "all" = every stage
stages = "default"

# Grouping for mutation summaries: genus, order-tag, order-path
group_by = "order-path"

# Explicit reference header (default: first header of each alignment)
# reference_header = "lcl|NC_000000.1_cds_1 [gene=mcyA]"

# =============================================================================
# ANALYSIS GRID
# =============================================================================

genes = ["mcyA", "mcyB", "mcyE", "mcyH"]
orders = ["Chroococcales", "Nostocales", "Oscillatoriales"]
target_genes = ["mcyA", "mcyB", "mcyE", "mcyH", "adenylation", "ABC transporter", "aminotransferase"]

# One-hot alphabet
alphabet = "ACGT-"

# Maximum sequences per extracted FASTA
max_sequences = 1000

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
# threads = 8

# =============================================================================
# HEADER FILTERING (mutation summaries)
# =============================================================================

# include_headers = "Microcystis.*"
# exclude_headers = "partial"

# =============================================================================
# FLAGS
# =============================================================================

# Validate inputs and print the plan without running
dry_run = false

# =============================================================================
# MSA JOBS
# =============================================================================

[[jobs]]
name = "mcya"
reference_fasta = "mcyA.fasta"
extracted_fasta = ["mcyA.fasta", "adenylation.fasta"]

[[jobs]]
name = "mcyb"
reference_fasta = "mcyB.fasta"
extracted_fasta = ["mcyB.fasta", "adenylation.fasta"]

[[jobs]]
name = "mcye"
reference_fasta = "mcyE.fasta"
extracted_fasta = ["mcyE.fasta", "aminotransferase.fasta"]

[[jobs]]
name = "mcyh"
reference_fasta = "mcyH.fasta"
extracted_fasta = ["mcyH.fasta", "ABC transporter.fasta"]
"#
        .to_string()
    }
}
