// pipeline.rs - Stage orchestration over the (gene, order) grid

use crate::core::layout::{AnalysisConfig, PipelineLayout, FASTA_LINE_WIDTH};
use crate::core::matrix::{build_mutation_matrix, build_onehot_matrix, tally_mutation_types, FeatureMatrix};
use crate::core::stats::GeneOrderStats;
use crate::core::summary::{
    summarize_matrix_dir, GroupingStrategy, HeaderFilter, MutationSummary, MutationTypeRow,
};
use crate::data::extraction::unique_by_protein;
use crate::data::{first_header, AlignedSequenceSet, GeneExtractor};
use crate::output::{
    write_fasta, write_feature_matrix, write_gene_order_stats, write_matrix_summary,
    write_mutation_summary, write_mutation_type_summary, Delimiter,
};
use crate::tools::{MsaRunner, MsaTool};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

/// One step of a run. Stages always execute in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Extract,
    Align,
    Summarize,
    Matrices,
    OneHot,
    Types,
    MatrixSummary,
    Stats,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Extract,
        Stage::Align,
        Stage::Summarize,
        Stage::Matrices,
        Stage::OneHot,
        Stage::Types,
        Stage::MatrixSummary,
        Stage::Stats,
    ];

    /// Extraction, alignment and one-hot encoding are opt-in
    pub const DEFAULT: [Stage; 5] = [
        Stage::Summarize,
        Stage::Matrices,
        Stage::Types,
        Stage::MatrixSummary,
        Stage::Stats,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Align => "align",
            Stage::Summarize => "summarize",
            Stage::Matrices => "matrices",
            Stage::OneHot => "onehot",
            Stage::Types => "types",
            Stage::MatrixSummary => "matrix-summary",
            Stage::Stats => "stats",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .iter()
            .find(|stage| stage.name() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| {
                let names: Vec<&str> = Stage::ALL.iter().map(|s| s.name()).collect();
                format!("Unknown stage: {}. Use: default, all, {}", s, names.join(", "))
            })
    }
}

/// Parse a comma-separated stage list; `default` and `all` expand to their sets.
/// The result is deduplicated and in execution order.
pub fn parse_stages(list: &str) -> Result<Vec<Stage>, String> {
    let mut stages = Vec::new();
    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.to_lowercase().as_str() {
            "default" => stages.extend(Stage::DEFAULT),
            "all" => stages.extend(Stage::ALL),
            _ => stages.push(token.parse()?),
        }
    }
    if stages.is_empty() {
        return Err("No stages selected".to_string());
    }
    stages.sort();
    stages.dedup();
    Ok(stages)
}

/// Counts of what a run produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub extracted_files: usize,
    pub aligned: usize,
    pub summaries: usize,
    pub matrices: usize,
    pub onehot_matrices: usize,
    pub type_rows: usize,
    pub matrix_summary_rows: usize,
    pub stats_rows: usize,
    /// Units skipped with a warning
    pub skipped: usize,
    /// Stages that stopped on an error
    pub failed_stages: Vec<Stage>,
}

/// Per-cell result of a parallel pass over the grid
enum GridCell<T> {
    Built(T),
    Missing(PathBuf),
    Unreadable(String),
}

/// Runs selected stages against one layout
pub struct Pipeline<'a> {
    config: AnalysisConfig,
    layout: PipelineLayout,
    strategy: GroupingStrategy,
    reference_header: Option<String>,
    filter: HeaderFilter,
    tool: Option<&'a dyn MsaTool>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: AnalysisConfig, layout: PipelineLayout) -> Self {
        Self {
            config,
            layout,
            strategy: GroupingStrategy::OrderFromPath,
            reference_header: None,
            filter: HeaderFilter::default(),
            tool: None,
        }
    }

    pub fn with_grouping(mut self, strategy: GroupingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_reference_header(mut self, header: Option<String>) -> Self {
        self.reference_header = header;
        self
    }

    pub fn with_filter(mut self, filter: HeaderFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_tool(mut self, tool: &'a dyn MsaTool) -> Self {
        self.tool = Some(tool);
        self
    }

    /// Run `stages` in execution order. A missing dataset root is the only
    /// error returned; any other stage failure is logged and the run goes on.
    pub fn run(&self, stages: &[Stage]) -> Result<RunReport, String> {
        let mut report = RunReport::default();

        for stage in Stage::ALL.iter().filter(|s| stages.contains(*s)) {
            let start = Instant::now();
            println!("\n🧬 Stage: {}", stage);

            let result = match stage {
                Stage::Extract => {
                    if !self.layout.dataset_root.is_dir() {
                        return Err(format!(
                            "DataSet directory not found at: {}",
                            self.layout.dataset_root.display()
                        ));
                    }
                    self.extract(&mut report)
                }
                Stage::Align => self.align(&mut report),
                Stage::Summarize => self.summarize(&mut report),
                Stage::Matrices => self.matrices(&mut report),
                Stage::OneHot => self.onehot(&mut report),
                Stage::Types => self.mutation_types(&mut report),
                Stage::MatrixSummary => self.matrix_summary(&mut report),
                Stage::Stats => self.stats(&mut report),
            };

            match result {
                Ok(()) => println!("✅ {} done in {:.2}s", stage, start.elapsed().as_secs_f64()),
                Err(e) => {
                    println!("❌ {} failed: {}", stage, e);
                    report.failed_stages.push(*stage);
                }
            }
        }

        Ok(report)
    }

    /// Pull target genes out of the dataset into `{extracted}/{genus}/{gene}.fasta`
    pub fn extract(&self, report: &mut RunReport) -> Result<(), String> {
        let extractor = GeneExtractor::new(&self.config.target_genes)?;
        let reference_root = Some(self.layout.reference_root.as_path());
        let collection = extractor.traverse_dataset(&self.layout.dataset_root, reference_root)?;

        println!("📊 Found {} matching records", collection.total_records());

        for genus in collection.genera() {
            for gene_records in collection.genes_of(genus) {
                let unique = unique_by_protein(&gene_records.records, self.config.max_sequences);
                for duplicate in &unique.duplicates {
                    println!("⚠️  Warning: Duplicate protein name found: {}, skipping.", duplicate);
                }

                let out_file = self.layout.extracted_fasta(genus, &gene_records.gene);
                write_fasta(&out_file, unique.kept.iter().copied(), FASTA_LINE_WIDTH)?;
                println!(
                    "   [{}] {}: {} sequences saved to {}",
                    genus,
                    gene_records.gene,
                    unique.kept.len(),
                    out_file.display()
                );
                report.extracted_files += 1;
            }
        }

        Ok(())
    }

    /// Concatenate, validate and align every job for every order
    pub fn align(&self, report: &mut RunReport) -> Result<(), String> {
        let tool = self
            .tool
            .ok_or_else(|| "No alignment tool configured".to_string())?;
        println!("🔧 Aligner: {}", tool.name());

        let runner = MsaRunner::new(
            tool,
            &self.layout.reference_root,
            &self.layout.extracted_root,
            &self.layout.msa_root,
        );
        let outcomes = runner.run_all(&self.config.orders, &self.config.jobs);

        let aligned = outcomes.iter().filter(|o| o.is_aligned()).count();
        report.aligned += aligned;
        report.skipped += outcomes.len() - aligned;
        Ok(())
    }

    fn reference_for(&self, aligned_path: &Path) -> Result<Option<String>, String> {
        match &self.reference_header {
            Some(header) => Ok(Some(header.clone())),
            None => first_header(aligned_path),
        }
    }

    /// Per-sequence and per-group mutation counts beside each aligned file
    pub fn summarize(&self, report: &mut RunReport) -> Result<(), String> {
        println!("👥 Grouping: {}", self.strategy.description());

        for order in &self.config.orders {
            for job in &self.config.jobs {
                let aligned_path = self.layout.aligned_fasta(order, &job.name);
                if !aligned_path.is_file() {
                    println!("⚠️  Alignment file not found: {}", aligned_path.display());
                    report.skipped += 1;
                    continue;
                }

                let outcome = self.reference_for(&aligned_path).and_then(|reference| {
                    let reference = reference.ok_or_else(|| {
                        format!("No reference header in {}", aligned_path.display())
                    })?;
                    let alignment = AlignedSequenceSet::from_file(&aligned_path)?;
                    MutationSummary::build(
                        &alignment,
                        &reference,
                        self.strategy,
                        &aligned_path,
                        &self.filter,
                    )
                });

                match outcome {
                    Ok(summary) => {
                        let out_file = self.layout.mutation_summary(order, &job.name);
                        write_mutation_summary(&out_file, &summary)?;
                        println!("   📝 {}", out_file.display());
                        report.summaries += 1;
                    }
                    Err(e) => {
                        println!("⚠️  Warning: {}", e);
                        report.skipped += 1;
                    }
                }
            }
        }

        Ok(())
    }

    /// Load every aligned file of the grid and apply `build` in parallel.
    /// Results come back in grid order.
    fn par_grid<T, F>(&self, message: &str, build: F) -> Vec<(String, String, GridCell<T>)>
    where
        T: Send,
        F: Fn(&AlignedSequenceSet) -> T + Sync + Send,
    {
        let grid = self.config.grid();
        let pb = ProgressBar::new(grid.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(message.to_string());

        let cells: Vec<_> = grid
            .par_iter()
            .map(|&(gene, order)| {
                let path = self.layout.aligned_fasta(order, gene);
                let cell = if !path.is_file() {
                    GridCell::Missing(path)
                } else {
                    match AlignedSequenceSet::from_file(&path) {
                        Ok(alignment) => GridCell::Built(build(&alignment)),
                        Err(e) => GridCell::Unreadable(e),
                    }
                };
                pb.inc(1);
                (gene.to_string(), order.to_string(), cell)
            })
            .collect();

        pb.finish_and_clear();
        cells
    }

    fn write_matrices<F>(
        &self,
        message: &str,
        build: F,
        out_path: impl Fn(&str, &str) -> PathBuf,
        report: &mut RunReport,
    ) -> Result<usize, String>
    where
        F: Fn(&AlignedSequenceSet) -> Option<FeatureMatrix> + Sync + Send,
    {
        let mut written = 0;
        for (gene, order, cell) in self.par_grid(message, build) {
            match cell {
                GridCell::Built(Some(matrix)) => {
                    let out_file = out_path(&order, &gene);
                    write_feature_matrix(&out_file, &matrix, Delimiter::Comma)?;
                    println!(
                        "   💾 Saved: {} ({} x {})",
                        out_file.display(),
                        matrix.num_rows(),
                        matrix.num_columns()
                    );
                    written += 1;
                }
                GridCell::Built(None) => report.skipped += 1,
                GridCell::Missing(path) => {
                    println!("⚠️  File not found: {}", path.display());
                    report.skipped += 1;
                }
                GridCell::Unreadable(e) => {
                    println!("⚠️  Warning: {}", e);
                    report.skipped += 1;
                }
            }
        }
        Ok(written)
    }

    /// Binary mismatch matrices into the feature matrix directory
    pub fn matrices(&self, report: &mut RunReport) -> Result<(), String> {
        let written = self.write_matrices(
            "mutation matrices",
            build_mutation_matrix,
            |order, gene| self.layout.mutation_matrix(order, gene),
            report,
        )?;
        report.matrices += written;
        Ok(())
    }

    /// One-hot matrices into the one-hot directory
    pub fn onehot(&self, report: &mut RunReport) -> Result<(), String> {
        let alphabet = self.config.alphabet.clone();
        let written = self.write_matrices(
            "one-hot matrices",
            move |alignment| build_onehot_matrix(alignment, &alphabet),
            |order, gene| self.layout.onehot_matrix(order, gene),
            report,
        )?;
        report.onehot_matrices += written;
        Ok(())
    }

    /// Mutation kind tallies per (gene, order)
    pub fn mutation_types(&self, report: &mut RunReport) -> Result<(), String> {
        let cells = self.par_grid("mutation types", |alignment| {
            if alignment.is_empty() {
                None
            } else {
                Some(tally_mutation_types(alignment))
            }
        });

        let mut rows = Vec::new();
        for (gene, order, cell) in cells {
            match cell {
                GridCell::Built(Some(counts)) => rows.push(MutationTypeRow { gene, order, counts }),
                GridCell::Unreadable(e) => {
                    println!("⚠️  Warning: {}", e);
                    report.skipped += 1;
                }
                _ => report.skipped += 1,
            }
        }

        let out_file = self.layout.mutation_type_summary();
        write_mutation_type_summary(&out_file, &rows)?;
        println!("   📝 Mutation type summary written to: {}", out_file.display());
        report.type_rows += rows.len();
        Ok(())
    }

    /// Percent mutated per matrix row, re-read from the matrix directory
    pub fn matrix_summary(&self, report: &mut RunReport) -> Result<(), String> {
        let rows = summarize_matrix_dir(&self.layout.matrix_dir())?;
        let out_file = self.layout.matrix_summary();
        write_matrix_summary(&out_file, &rows)?;
        println!("   📝 Summary written to {} ({} rows)", out_file.display(), rows.len());
        report.matrix_summary_rows += rows.len();
        Ok(())
    }

    /// Gene/order statistics table from the per-order stats files
    pub fn stats(&self, report: &mut RunReport) -> Result<(), String> {
        let mut table = Vec::new();
        for (gene, order) in self.config.grid() {
            let stats_file = self.layout.stats_file(order, gene);
            match GeneOrderStats::load(gene, order, &stats_file) {
                Ok(Some(stats)) => table.push(stats),
                Ok(None) => report.skipped += 1,
                Err(e) => {
                    println!("⚠️  Warning: {}", e);
                    report.skipped += 1;
                }
            }
        }

        write_gene_order_stats(&self.layout.stats_output, &table)?;
        println!(
            "   📝 Gene-order stats table written to {} ({} rows)",
            self.layout.stats_output.display(),
            table.len()
        );
        report.stats_rows += table.len();
        Ok(())
    }
}
