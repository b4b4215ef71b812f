// csv.rs - CSV loader for previously written binary mutation matrices

use std::path::Path;

/// Suffix of binary mutation matrix files: `{order}_{gene}_mutation_matrix.csv`
pub const MATRIX_FILE_SUFFIX: &str = "_mutation_matrix.csv";

/// Per-row mutated-cell counts read back from a binary matrix CSV
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixCounts {
    pub num_positions: usize,
    pub rows: Vec<(String, usize)>,
}

/// Split a matrix file name into (order, gene).
///
/// The name is split on `_`; at least three parts are required.
pub fn parse_matrix_file_name(file_name: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = file_name.split('_').collect();
    if parts.len() < 3 {
        return None;
    }
    Some((parts[0].to_string(), parts[1].to_string()))
}

/// Load a binary mutation matrix and count the `1` cells of every row.
///
/// Rows with fewer than `num_positions + 1` fields are skipped.
/// Returns `Ok(None)` for a file without a header line.
pub fn load_matrix_counts(file_path: &Path) -> Result<Option<MatrixCounts>, String> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(file_path)
        .map_err(|e| format!("Failed to open matrix CSV {}: {}", file_path.display(), e))?;

    let mut records = reader.byte_records();
    let header = match records.next() {
        Some(record) => record
            .map_err(|e| format!("Failed to read header of {}: {}", file_path.display(), e))?,
        None => return Ok(None),
    };

    // first column is SeqHeader
    let num_positions = header.len().saturating_sub(1);
    let mut rows = Vec::new();

    for (line_num, record) in records.enumerate() {
        let record = record.map_err(|e| {
            format!(
                "Failed to read line {} of {}: {}",
                line_num + 2,
                file_path.display(),
                e
            )
        })?;

        if record.len() < num_positions + 1 {
            continue;
        }

        let seq_header = record
            .get(0)
            .map(|field| String::from_utf8_lossy(field).to_string())
            .unwrap_or_default();
        let num_mutated = record.iter().skip(1).filter(|token| *token == b"1").count();
        rows.push((seq_header, num_mutated));
    }

    Ok(Some(MatrixCounts {
        num_positions,
        rows,
    }))
}
