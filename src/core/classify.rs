// classify.rs - Per-position mutation classification and pairwise counting

use crate::data::GAP;
use std::fmt;
use std::str::FromStr;

/// Kind of difference between a reference and a query at one alignment column.
///
/// `Frameshift`, `Complex` and `InFrame` are part of the report schema but the
/// single-column rule in [`classify`] never produces them; they always tally 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MutationType {
    None,
    Missense,
    Frameshift,
    FrameshiftDeletion,
    FrameshiftInsertion,
    Complex,
    InFrame,
}

impl MutationType {
    pub const ALL: [MutationType; 7] = [
        MutationType::None,
        MutationType::Missense,
        MutationType::Frameshift,
        MutationType::FrameshiftDeletion,
        MutationType::FrameshiftInsertion,
        MutationType::Complex,
        MutationType::InFrame,
    ];

    /// Kinds that appear as columns of the mutation-type summary
    pub const REPORTED: [MutationType; 6] = [
        MutationType::Missense,
        MutationType::Frameshift,
        MutationType::FrameshiftDeletion,
        MutationType::FrameshiftInsertion,
        MutationType::Complex,
        MutationType::InFrame,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MutationType::None => "None",
            MutationType::Missense => "Missense",
            MutationType::Frameshift => "Frameshift",
            MutationType::FrameshiftDeletion => "FrameshiftDeletion",
            MutationType::FrameshiftInsertion => "FrameshiftInsertion",
            MutationType::Complex => "Complex",
            MutationType::InFrame => "InFrame",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for MutationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MutationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MutationType::ALL
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown mutation type: {}", s))
    }
}

/// Classify the difference at `position`. First matching rule wins:
/// equal bases, gap in the query (deletion), gap in the reference
/// (insertion), anything else (missense).
///
/// A position outside either sequence is a boundary case the caller handles;
/// it yields `MutationType::None` here.
pub fn classify(reference: &str, sequence: &str, position: usize) -> MutationType {
    let (r, s) = match (
        reference.as_bytes().get(position),
        sequence.as_bytes().get(position),
    ) {
        (Some(&r), Some(&s)) => (r, s),
        _ => return MutationType::None,
    };

    if r == s {
        MutationType::None
    } else if s == GAP {
        MutationType::FrameshiftDeletion
    } else if r == GAP {
        MutationType::FrameshiftInsertion
    } else {
        MutationType::Missense
    }
}

/// Count mismatching columns over the shared length, ignoring any column
/// where either sequence has a gap
pub fn count_mutations(reference: &str, sequence: &str) -> usize {
    reference
        .as_bytes()
        .iter()
        .zip(sequence.as_bytes())
        .filter(|&(&r, &s)| r != GAP && s != GAP && r != s)
        .count()
}

/// Tally of mutation kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationTypeCounts {
    counts: [usize; 7],
}

impl MutationTypeCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, kind: MutationType) {
        self.counts[kind.index()] += 1;
    }

    pub fn get(&self, kind: MutationType) -> usize {
        self.counts[kind.index()]
    }

    /// Sum over every kind except `None`
    pub fn total(&self) -> usize {
        MutationType::REPORTED.iter().map(|k| self.get(*k)).sum()
    }

    pub fn merge(&mut self, other: &MutationTypeCounts) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rules() {
        assert_eq!(classify("A-GT", "ACGT", 1), MutationType::FrameshiftInsertion);
        assert_eq!(classify("AC-T", "ACGT", 2), MutationType::FrameshiftInsertion);
        assert_eq!(classify("ACGT", "AC-T", 2), MutationType::FrameshiftDeletion);
        assert_eq!(classify("ACGT", "ACTT", 2), MutationType::Missense);
        assert_eq!(classify("ACGT", "ACGT", 0), MutationType::None);
        // both gapped is a match
        assert_eq!(classify("A-GT", "A-GT", 1), MutationType::None);
    }

    #[test]
    fn test_classify_out_of_range() {
        assert_eq!(classify("ACGT", "AC", 3), MutationType::None);
        assert_eq!(classify("AC", "ACGT", 3), MutationType::None);
    }

    #[test]
    fn test_count_mutations_skips_gaps() {
        assert_eq!(count_mutations("AC-T", "AGGT"), 1);
        assert_eq!(count_mutations("ACGT", "ACGT"), 0);
        assert_eq!(count_mutations("ACGT", "TGCA"), 4);
        assert_eq!(count_mutations("ACGT", "A-"), 0);
        assert_eq!(count_mutations("ACGTAAAA", "TCGT"), 1);
        assert_eq!(count_mutations("", "ACGT"), 0);
    }

    #[test]
    fn test_mutation_type_names() {
        assert_eq!(MutationType::FrameshiftDeletion.to_string(), "FrameshiftDeletion");
        assert_eq!("inframe".parse::<MutationType>().unwrap(), MutationType::InFrame);
        assert!("nonsense".parse::<MutationType>().is_err());
    }

    #[test]
    fn test_counts() {
        let mut counts = MutationTypeCounts::new();
        counts.increment(MutationType::Missense);
        counts.increment(MutationType::Missense);
        counts.increment(MutationType::FrameshiftInsertion);
        counts.increment(MutationType::None);

        assert_eq!(counts.get(MutationType::Missense), 2);
        assert_eq!(counts.get(MutationType::Complex), 0);
        assert_eq!(counts.total(), 3);

        let mut merged = MutationTypeCounts::new();
        merged.merge(&counts);
        merged.merge(&counts);
        assert_eq!(merged.get(MutationType::Missense), 4);
    }
}
