// mod.rs - Data structures module

pub mod alignment;
pub mod extraction;
pub mod loaders;

// Re-export main types for convenience
pub use alignment::{first_header, AlignedSequenceSet, GAP};
pub use extraction::{GeneCollection, GeneExtractor, GeneMatcher, GeneRecords};
