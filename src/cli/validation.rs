// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::core::layout::{AnalysisConfig, PipelineLayout};
use crate::core::pipeline::{parse_stages, Stage};
use crate::core::summary::{GroupingStrategy, HeaderFilter};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct ValidationResult {
    pub stages: Vec<Stage>,
    pub strategy: GroupingStrategy,
    pub analysis: AnalysisConfig,
    pub layout: PipelineLayout,
    pub header_filter: HeaderFilter,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    let stages = parse_stages(&args.stages)?;
    let strategy = GroupingStrategy::from_str(&args.group_by)?;

    if args.threads == Some(0) {
        return Err("--threads must be at least 1".to_string());
    }
    if args.max_sequences == 0 {
        return Err("--max-sequences must be at least 1".to_string());
    }

    // The align stage shells out to both tools
    if stages.contains(&Stage::Align) {
        if args.validator.is_none() {
            return Err("--validator is required for the align stage".to_string());
        }
        if args.aligner.trim().is_empty() {
            return Err("--aligner must not be empty".to_string());
        }
    }

    let alphabet = validate_alphabet(&args.alphabet)?;

    let mut analysis = AnalysisConfig {
        alphabet,
        max_sequences: args.max_sequences,
        ..AnalysisConfig::default()
    };
    if !args.gene.is_empty() {
        analysis.genes = args.gene.clone();
    }
    if !args.order.is_empty() {
        analysis.orders = args.order.clone();
    }
    if !args.target_gene.is_empty() {
        analysis.target_genes = args.target_gene.clone();
    }

    let base = PathBuf::from(args.base_dir.as_deref().unwrap_or("."));
    let mut layout = PipelineLayout::under(&base);
    if let Some(dataset) = &args.dataset {
        layout.dataset_root = PathBuf::from(dataset);
    }
    if let Some(reference) = &args.reference_genes {
        layout.reference_root = PathBuf::from(reference);
    }
    if let Some(extracted) = &args.extracted {
        layout.extracted_root = PathBuf::from(extracted);
    }
    if let Some(msa_dir) = &args.msa_dir {
        layout.msa_root = PathBuf::from(msa_dir);
        layout.stats_output = Path::new(msa_dir)
            .join("plots")
            .join("gene_order_stats_table.tsv");
    }
    if let Some(stats_output) = &args.stats_output {
        layout.stats_output = PathBuf::from(stats_output);
    }

    // Compile regex patterns
    let include = if let Some(pattern) = &args.include_headers {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid include_headers regex: {}", e))?)
    } else {
        None
    };

    let exclude = if let Some(pattern) = &args.exclude_headers {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid exclude_headers regex: {}", e))?)
    } else {
        None
    };

    Ok(ValidationResult {
        stages,
        strategy,
        analysis,
        layout,
        header_filter: HeaderFilter { include, exclude },
    })
}

/// Non-empty ASCII alphabet without repeated symbols
fn validate_alphabet(alphabet: &str) -> Result<Vec<u8>, String> {
    if alphabet.is_empty() {
        return Err("Alphabet must not be empty".to_string());
    }
    if !alphabet.is_ascii() {
        return Err(format!("Alphabet must be ASCII: '{}'", alphabet));
    }

    let mut seen = HashSet::new();
    for symbol in alphabet.bytes() {
        if !seen.insert(symbol) {
            return Err(format!(
                "Alphabet '{}' repeats symbol '{}'",
                alphabet, symbol as char
            ));
        }
    }
    Ok(alphabet.as_bytes().to_vec())
}
