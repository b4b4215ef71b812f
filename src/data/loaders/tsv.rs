// tsv.rs - TSV loader for externally computed gene/order statistics

use std::path::Path;

/// Value substituted for a column that the stats file does not declare
pub const MISSING_STAT_VALUE: &str = "0";

/// The header row and first value row of a stats TSV
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRow {
    pub columns: Vec<String>,
    pub values: Vec<String>,
}

impl StatsRow {
    /// Raw value for a column, [`MISSING_STAT_VALUE`] when the column (or its value) is absent
    pub fn value(&self, column: &str) -> &str {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
            .map(|v| v.as_str())
            .unwrap_or(MISSING_STAT_VALUE)
    }
}

/// Load the header and first value row of a stats TSV.
///
/// Returns `Ok(None)` when the file has fewer than two lines.
pub fn load_stats_row(file_path: &Path) -> Result<Option<StatsRow>, String> {
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(file_path)
        .map_err(|e| format!("Failed to open stats TSV {}: {}", file_path.display(), e))?;

    let mut records = reader.byte_records();
    let mut next_row = || -> Result<Option<Vec<String>>, String> {
        match records.next() {
            Some(record) => {
                let record = record
                    .map_err(|e| format!("Failed to read {}: {}", file_path.display(), e))?;
                Ok(Some(
                    record
                        .iter()
                        .map(|field| String::from_utf8_lossy(field).to_string())
                        .collect(),
                ))
            }
            None => Ok(None),
        }
    };

    let columns = match next_row()? {
        Some(columns) => columns,
        None => return Ok(None),
    };
    let values = match next_row()? {
        Some(values) => values,
        None => return Ok(None),
    };

    Ok(Some(StatsRow { columns, values }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_stats_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcya_stats.tsv");
        fs::write(
            &path,
            "PolymorphicSites\tTajimasD\tExtra\n12\t-1.25\tfoo\n99\t99\t99\n",
        )
        .unwrap();

        let row = load_stats_row(&path).unwrap().unwrap();
        assert_eq!(row.value("PolymorphicSites"), "12");
        assert_eq!(row.value("TajimasD"), "-1.25");
        assert_eq!(row.value("NucleotideDiversity"), MISSING_STAT_VALUE);
    }

    #[test]
    fn test_short_value_row_defaults() {
        let row = StatsRow {
            columns: vec!["A".into(), "B".into()],
            values: vec!["1".into()],
        };
        assert_eq!(row.value("A"), "1");
        assert_eq!(row.value("B"), MISSING_STAT_VALUE);
    }

    #[test]
    fn test_header_only_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcyb_stats.tsv");
        fs::write(&path, "PolymorphicSites\tTajimasD\n").unwrap();

        assert_eq!(load_stats_row(&path).unwrap(), None);
    }
}
