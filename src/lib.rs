// lib.rs - mcyscan library root

//! # mcyscan - Mutation analysis of microcystin synthetase (mcy) gene alignments
//!
//! This library extracts target genes from genomic CDS FASTA datasets, drives an
//! external multiple sequence aligner, and turns the aligned sequences into
//! per-position mutation matrices, one-hot encodings, mutation-type tallies and
//! per-genus/per-order summaries written as CSV/TSV reports.
//!
//! ## Features
//!
//! - **Gene extraction**: `[gene=...]`/`[protein=...]` header matching over `cds_from_genomic.fna` files
//! - **MSA orchestration**: pluggable [`tools::MsaTool`] seam around MUSCLE and a FASTA validator
//! - **Feature matrices**: binary mismatch and one-hot matrices per (gene, order)
//! - **Summaries**: gap-skipping mutation counts grouped by genus or order
//! - **Parallel**: matrix construction over the (gene, order) grid with rayon
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use mcyscan::prelude::*;
//!
//! let alignment = AlignedSequenceSet::from_file(std::path::Path::new("mcya_aligned.fasta"))?;
//! if let Some(matrix) = build_mutation_matrix(&alignment) {
//!     write_feature_matrix(
//!         std::path::Path::new("Nostocales_mcyA_mutation_matrix.csv"),
//!         &matrix,
//!         Delimiter::Comma,
//!     )?;
//! }
//! # Ok::<(), String>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod output;
pub mod tools;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, Config, ValidationResult};
    pub use crate::core::{build_mutation_matrix, build_onehot_matrix, tally_mutation_types};
    pub use crate::core::{classify, count_mutations, MutationType, MutationTypeCounts};
    pub use crate::core::{AnalysisConfig, Pipeline, PipelineLayout, RunReport, Stage};
    pub use crate::core::{GroupingStrategy, HeaderFilter, MutationSummary};
    pub use crate::data::{AlignedSequenceSet, GeneCollection, GeneExtractor};
    pub use crate::output::{write_feature_matrix, Delimiter};
    pub use crate::tools::{ExternalMsaTool, MsaJob, MsaTool, ToolError};
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use core::{AnalysisConfig, FeatureMatrix, MutationType, Pipeline, PipelineLayout};
pub use data::AlignedSequenceSet;
pub use tools::{MsaTool, ToolError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "mcyscan v{} - Mutation matrices for mcy gene alignments",
        VERSION
    )
}
