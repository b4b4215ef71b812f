// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Directories
        if self.base_dir.is_none() {
            self.base_dir = config.base_dir;
        }
        if self.dataset.is_none() {
            self.dataset = config.dataset;
        }
        if self.reference_genes.is_none() {
            self.reference_genes = config.reference_genes;
        }
        if self.extracted.is_none() {
            self.extracted = config.extracted;
        }
        if self.msa_dir.is_none() {
            self.msa_dir = config.msa_dir;
        }
        if self.stats_output.is_none() {
            self.stats_output = config.stats_output;
        }

        // External tools (only override defaults, not explicit CLI values)
        if let Some(aligner) = config.aligner {
            if self.aligner == "muscle" {
                self.aligner = aligner;
            }
        }
        if self.validator.is_none() {
            self.validator = config.validator;
        }

        // Run selection
        if let Some(stages) = config.stages {
            if self.stages == "default" {
                self.stages = stages;
            }
        }
        if let Some(group_by) = config.group_by {
            if self.group_by == "order-path" {
                self.group_by = group_by;
            }
        }
        if self.reference_header.is_none() {
            self.reference_header = config.reference_header;
        }

        // Analysis grid (repeatable options replace the config list entirely)
        if self.gene.is_empty() {
            self.gene = config.genes.unwrap_or_default();
        }
        if self.order.is_empty() {
            self.order = config.orders.unwrap_or_default();
        }
        if self.target_gene.is_empty() {
            self.target_gene = config.target_genes.unwrap_or_default();
        }
        if let Some(alphabet) = config.alphabet {
            if self.alphabet == "ACGT-" {
                self.alphabet = alphabet;
            }
        }
        if let Some(max_sequences) = config.max_sequences {
            if self.max_sequences == 1000 {
                self.max_sequences = max_sequences;
            }
        }

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Header filtering
        if self.include_headers.is_none() {
            self.include_headers = config.include_headers;
        }
        if self.exclude_headers.is_none() {
            self.exclude_headers = config.exclude_headers;
        }

        // Flags
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration and merge with CLI args, returning the loaded
    /// configuration for settings that only live in the file
    pub fn with_config_file(self, config_path: &str) -> Result<(Self, Config), String> {
        let config = Config::from_file(config_path)?;
        Ok((self.merge_with_config(config.clone()), config))
    }
}
