// mod.rs - Report loaders module

pub mod csv;
pub mod tsv;

pub use self::csv::{load_matrix_counts, parse_matrix_file_name, MatrixCounts, MATRIX_FILE_SUFFIX};
pub use self::tsv::{load_stats_row, StatsRow, MISSING_STAT_VALUE};
