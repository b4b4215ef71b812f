// runner.rs - Build MSA inputs, validate and align them per order

use super::traits::MsaTool;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One alignment job: a reference FASTA plus extracted companion FASTAs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsaJob {
    /// Lower-case job name, also the `{name}_aligned.fasta` prefix
    pub name: String,
    /// File under the reference genes directory
    pub reference_fasta: String,
    /// Files under `{extracted}/{order}/`
    pub extracted_fasta: Vec<String>,
}

impl MsaJob {
    pub fn new(name: &str, reference_fasta: &str, extracted_fasta: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            reference_fasta: reference_fasta.to_string(),
            extracted_fasta: extracted_fasta.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn input_file_name(&self) -> String {
        format!("{}_msa.fasta", self.name)
    }

    pub fn aligned_file_name(&self) -> String {
        format!("{}_aligned.fasta", self.name)
    }
}

/// The four microcystin synthetase jobs
pub fn default_jobs() -> Vec<MsaJob> {
    vec![
        MsaJob::new("mcya", "mcyA.fasta", &["mcyA.fasta", "adenylation.fasta"]),
        MsaJob::new("mcyb", "mcyB.fasta", &["mcyB.fasta", "adenylation.fasta"]),
        MsaJob::new("mcye", "mcyE.fasta", &["mcyE.fasta", "aminotransferase.fasta"]),
        MsaJob::new("mcyh", "mcyH.fasta", &["mcyH.fasta", "ABC transporter.fasta"]),
    ]
}

/// Result of running one job for one order
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Aligned(PathBuf),
    /// Validator rejected the input or could not be run
    Rejected(PathBuf),
    /// Aligner failed or produced nothing
    Failed(String),
}

impl JobOutcome {
    pub fn is_aligned(&self) -> bool {
        matches!(self, JobOutcome::Aligned(_))
    }
}

/// Concatenates inputs and drives an [`MsaTool`]
pub struct MsaRunner<'a> {
    tool: &'a dyn MsaTool,
    reference_root: PathBuf,
    extracted_root: PathBuf,
    msa_root: PathBuf,
}

impl<'a> MsaRunner<'a> {
    pub fn new(
        tool: &'a dyn MsaTool,
        reference_root: &Path,
        extracted_root: &Path,
        msa_root: &Path,
    ) -> Self {
        Self {
            tool,
            reference_root: reference_root.to_path_buf(),
            extracted_root: extracted_root.to_path_buf(),
            msa_root: msa_root.to_path_buf(),
        }
    }

    /// Concatenate the reference and companion FASTAs of `job` for `order`.
    ///
    /// Each present file is written with trailing whitespace trimmed and one
    /// newline appended; missing files are warned about and left out.
    pub fn write_input(&self, order: &str, job: &MsaJob) -> Result<PathBuf, String> {
        let order_dir = self.msa_root.join(order);
        fs::create_dir_all(&order_dir)
            .map_err(|e| format!("Failed to create MSA directory '{}': {}", order_dir.display(), e))?;

        let input_path = order_dir.join(job.input_file_name());
        let mut writer = fs::File::create(&input_path)
            .map(std::io::BufWriter::new)
            .map_err(|e| format!("Failed to create MSA input '{}': {}", input_path.display(), e))?;

        let extracted_dir = self.extracted_root.join(order);
        let sources = std::iter::once(self.reference_root.join(&job.reference_fasta))
            .chain(job.extracted_fasta.iter().map(|f| extracted_dir.join(f)));

        for (index, source) in sources.enumerate() {
            if !source.is_file() {
                let kind = if index == 0 { "Reference" } else { "Extracted" };
                println!("⚠️  Warning: {} file not found: {}", kind, source.display());
                continue;
            }
            let content = fs::read(&source)
                .map_err(|e| format!("Failed to read {}: {}", source.display(), e))?;
            let end = content
                .iter()
                .rposition(|b| !b.is_ascii_whitespace())
                .map_or(0, |i| i + 1);
            writer
                .write_all(&content[..end])
                .and_then(|_| writer.write_all(b"\n"))
                .map_err(|e| format!("Write error: {}", e))?;
        }

        writer.flush().map_err(|e| format!("Flush error: {}", e))?;
        Ok(input_path)
    }

    /// Build, validate and align one job. Only I/O errors on the input file are `Err`.
    pub fn run_job(&self, order: &str, job: &MsaJob) -> Result<JobOutcome, String> {
        let input_path = self.write_input(order, job)?;
        let output_path = self.msa_root.join(order).join(job.aligned_file_name());

        match self.tool.validate(&input_path) {
            Ok(true) => {}
            Ok(false) => {
                println!("⚠️  Invalid FASTA format in {}. Skipping alignment.", input_path.display());
                return Ok(JobOutcome::Rejected(input_path));
            }
            Err(e) => {
                println!("⚠️  Validation failed for {}: {}", input_path.display(), e);
                return Ok(JobOutcome::Rejected(input_path));
            }
        }

        match self.tool.align(&input_path, &output_path) {
            Ok(()) => {
                println!("✅ [{}] MSA complete: {}", order, output_path.display());
                Ok(JobOutcome::Aligned(output_path))
            }
            Err(e) => {
                println!("❌ [{}] {} alignment failed: {}", order, job.name, e);
                Ok(JobOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Run every job for every order, order-major. A job whose input cannot
    /// be built is recorded as failed and the remaining jobs still run.
    pub fn run_all(&self, orders: &[String], jobs: &[MsaJob]) -> Vec<JobOutcome> {
        let mut outcomes = Vec::with_capacity(orders.len() * jobs.len());
        for order in orders {
            for job in jobs {
                let outcome = self.run_job(order, job).unwrap_or_else(|e| {
                    println!("❌ [{}] {} skipped: {}", order, job.name, e);
                    JobOutcome::Failed(e)
                });
                outcomes.push(outcome);
            }
        }
        outcomes
    }
}
