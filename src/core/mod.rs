// mod.rs - Core logic module

pub mod classify;
pub mod layout;
pub mod matrix;
pub mod pipeline;
pub mod stats;
pub mod summary;

// Re-export main types for convenience
pub use classify::{classify, count_mutations, MutationType, MutationTypeCounts};
pub use layout::{AnalysisConfig, PipelineLayout};
pub use matrix::{build_mutation_matrix, build_onehot_matrix, tally_mutation_types, FeatureMatrix};
pub use pipeline::{parse_stages, Pipeline, RunReport, Stage};
pub use stats::GeneOrderStats;
pub use summary::{
    summarize_matrix_dir, GroupingStrategy, HeaderFilter, MatrixSummaryRow, MutationSummary,
    MutationTypeRow,
};
