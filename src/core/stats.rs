// stats.rs - Pass-through of externally computed gene/order statistics

use crate::data::loaders::{load_stats_row, StatsRow};
use std::path::Path;

/// Substituted when an integer statistic cannot be parsed
pub const INT_STAT_FALLBACK: i64 = 0;

/// Substituted when a floating-point statistic cannot be parsed
pub const FLOAT_STAT_FALLBACK: f64 = f64::NAN;

/// Columns read from each per-(gene, order) stats file, in report order
pub const STAT_COLUMNS: [&str; 5] = [
    "PolymorphicSites",
    "NucleotideDiversity",
    "TajimasD",
    "RecombinationRate",
    "MutationRatePerBase",
];

/// Population-genetics metrics of one gene within one order
#[derive(Debug, Clone, PartialEq)]
pub struct GeneOrderStats {
    pub gene: String,
    pub order: String,
    pub polymorphic_sites: i64,
    pub nucleotide_diversity: f64,
    pub tajimas_d: f64,
    pub recombination_rate: f64,
    pub mutation_rate_per_base: f64,
}

fn parse_int(value: &str) -> i64 {
    value.trim().parse().unwrap_or(INT_STAT_FALLBACK)
}

fn parse_float(value: &str) -> f64 {
    value.trim().parse().unwrap_or(FLOAT_STAT_FALLBACK)
}

impl GeneOrderStats {
    /// Build from a loaded stats row; unparsable values take the fallbacks
    pub fn from_row(gene: &str, order: &str, row: &StatsRow) -> Self {
        Self {
            gene: gene.to_string(),
            order: order.to_string(),
            polymorphic_sites: parse_int(row.value(STAT_COLUMNS[0])),
            nucleotide_diversity: parse_float(row.value(STAT_COLUMNS[1])),
            tajimas_d: parse_float(row.value(STAT_COLUMNS[2])),
            recombination_rate: parse_float(row.value(STAT_COLUMNS[3])),
            mutation_rate_per_base: parse_float(row.value(STAT_COLUMNS[4])),
        }
    }

    /// Load one stats file. `Ok(None)` when the file is missing or has no value row.
    pub fn load(gene: &str, order: &str, path: &Path) -> Result<Option<Self>, String> {
        if !path.is_file() {
            return Ok(None);
        }
        Ok(load_stats_row(path)?.map(|row| Self::from_row(gene, order, &row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_row_with_fallbacks() {
        let row = StatsRow {
            columns: vec![
                "PolymorphicSites".into(),
                "NucleotideDiversity".into(),
                "TajimasD".into(),
                "RecombinationRate".into(),
            ],
            values: vec!["n/a".into(), " 0.0125 ".into(), "-1.5".into(), "oops".into()],
        };

        let stats = GeneOrderStats::from_row("mcyA", "Nostocales", &row);
        assert_eq!(stats.polymorphic_sites, INT_STAT_FALLBACK);
        assert_eq!(stats.nucleotide_diversity, 0.0125);
        assert_eq!(stats.tajimas_d, -1.5);
        assert!(stats.recombination_rate.is_nan());
        // undeclared column reads as "0"
        assert_eq!(stats.mutation_rate_per_base, 0.0);
    }

    #[test]
    fn test_load_missing_and_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcya_stats.tsv");
        assert_eq!(GeneOrderStats::load("mcyA", "Nostocales", &path).unwrap(), None);

        fs::write(&path, "PolymorphicSites\tTajimasD\n7\t0.5\n").unwrap();
        let stats = GeneOrderStats::load("mcyA", "Nostocales", &path)
            .unwrap()
            .unwrap();
        assert_eq!(stats.polymorphic_sites, 7);
        assert_eq!(stats.tajimas_d, 0.5);
        assert_eq!(stats.order, "Nostocales");
    }
}
