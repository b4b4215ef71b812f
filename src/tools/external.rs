// external.rs - MUSCLE-compatible aligner and FASTA validator processes

use super::traits::{MsaTool, ToolError};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs an external aligner with `-in <input> -out <output> -maxiters 1 -diags1`
/// and an external validator with `<validator> <path>`.
#[derive(Debug, Clone)]
pub struct ExternalMsaTool {
    aligner: PathBuf,
    validator: PathBuf,
}

impl ExternalMsaTool {
    pub fn new(aligner: impl Into<PathBuf>, validator: impl Into<PathBuf>) -> Self {
        Self {
            aligner: aligner.into(),
            validator: validator.into(),
        }
    }

    fn aligner_name(&self) -> String {
        self.aligner
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.aligner.display().to_string())
    }
}

impl MsaTool for ExternalMsaTool {
    fn name(&self) -> &str {
        "external"
    }

    fn align(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        let tool = self.aligner_name();
        let result = Command::new(&self.aligner)
            .arg("-in")
            .arg(input)
            .arg("-out")
            .arg(output)
            .args(["-maxiters", "1", "-diags1"])
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => ToolError::NotFound(self.aligner.clone()),
                _ => ToolError::Launch {
                    tool: tool.clone(),
                    source,
                },
            })?;

        // MUSCLE writes progress to stderr even on success
        let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
        if !stderr.is_empty() {
            println!("   {} stderr: {}", tool, stderr);
        }

        if !result.status.success() {
            return Err(ToolError::Failed {
                tool,
                status: result.status.code().unwrap_or(-1),
                stderr,
            });
        }

        if !output.is_file() {
            return Err(ToolError::MissingOutput {
                tool,
                path: output.to_path_buf(),
            });
        }

        Ok(())
    }

    fn validate(&self, path: &Path) -> Result<bool, ToolError> {
        let result = Command::new(&self.validator)
            .arg(path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => ToolError::NotFound(self.validator.clone()),
                _ => ToolError::Launch {
                    tool: self.validator.display().to_string(),
                    source,
                },
            })?;

        for stream in [&result.stdout, &result.stderr] {
            let text = String::from_utf8_lossy(stream);
            if !text.trim().is_empty() {
                println!("   {}", text.trim());
            }
        }

        Ok(result.status.success())
    }
}
