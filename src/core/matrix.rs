// matrix.rs - Binary mutation and one-hot feature matrices

use crate::core::classify::{classify, MutationType, MutationTypeCounts};
use crate::data::{AlignedSequenceSet, GAP};

/// Default one-hot alphabet
pub const DEFAULT_ALPHABET: &[u8] = b"ACGT-";

/// A 0/1 feature matrix with row and column labels
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub rows: Vec<Vec<u8>>,
}

impl FeatureMatrix {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.column_labels.len()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<u8> {
        self.rows.get(row)?.get(column).copied()
    }

    /// Number of cells set to 1 in a row
    pub fn row_sum(&self, row: usize) -> usize {
        self.rows
            .get(row)
            .map(|r| r.iter().filter(|&&cell| cell == 1).count())
            .unwrap_or(0)
    }
}

/// Binary mismatch matrix against the first record.
///
/// Rows cover every record (reference included) labelled `Seq{n}`; columns
/// cover the reference length labelled `Pos{n}`. A column beyond the end of
/// a shorter record counts as mutated. Gaps are compared like any base.
/// Returns `None` for an empty alignment.
pub fn build_mutation_matrix(alignment: &AlignedSequenceSet) -> Option<FeatureMatrix> {
    let (_, reference) = alignment.first()?;
    let reference = reference.as_bytes();
    let width = reference.len();

    let column_labels = (1..=width).map(|pos| format!("Pos{}", pos)).collect();
    let mut row_labels = Vec::with_capacity(alignment.len());
    let mut rows = Vec::with_capacity(alignment.len());

    for (index, (_, sequence)) in alignment.iter().enumerate() {
        let sequence = sequence.as_bytes();
        let row = (0..width)
            .map(|j| match sequence.get(j) {
                Some(&base) if base == reference[j] => 0,
                _ => 1,
            })
            .collect();
        row_labels.push(format!("Seq{}", index + 1));
        rows.push(row);
    }

    Some(FeatureMatrix {
        row_labels,
        column_labels,
        rows,
    })
}

/// One-hot encoding of every record over `alphabet`.
///
/// Width is the first record's length times the alphabet size; rows are
/// labelled by the record headers. A column beyond a record's end is encoded
/// as a gap. A base outside the alphabet leaves its whole block at 0.
/// Returns `None` for an empty alignment.
pub fn build_onehot_matrix(alignment: &AlignedSequenceSet, alphabet: &[u8]) -> Option<FeatureMatrix> {
    let (_, first) = alignment.first()?;
    let width = first.len();

    let mut column_labels = Vec::with_capacity(width * alphabet.len());
    for pos in 1..=width {
        for &symbol in alphabet {
            column_labels.push(format!("Pos{}_{}", pos, symbol as char));
        }
    }

    let mut row_labels = Vec::with_capacity(alignment.len());
    let mut rows = Vec::with_capacity(alignment.len());

    for (header, sequence) in alignment.iter() {
        let sequence = sequence.as_bytes();
        let mut row = Vec::with_capacity(width * alphabet.len());
        for pos in 0..width {
            let base = sequence.get(pos).copied().unwrap_or(GAP);
            row.extend(alphabet.iter().map(|&symbol| u8::from(symbol == base)));
        }
        row_labels.push(header.to_string());
        rows.push(row);
    }

    Some(FeatureMatrix {
        row_labels,
        column_labels,
        rows,
    })
}

/// Tally mutation kinds of every record after the first against the first.
///
/// Columns past the end of a shorter record are skipped rather than counted.
pub fn tally_mutation_types(alignment: &AlignedSequenceSet) -> MutationTypeCounts {
    let mut counts = MutationTypeCounts::new();
    let reference = match alignment.first() {
        Some((_, reference)) => reference,
        None => return counts,
    };

    for (_, sequence) in alignment.iter().skip(1) {
        let shared = reference.len().min(sequence.len());
        for position in 0..shared {
            let kind = classify(reference, sequence, position);
            if kind != MutationType::None {
                counts.increment(kind);
            }
        }
    }

    counts
}
