// alignment.rs - Aligned multi-FASTA parsing

use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Marker character that opens a FASTA header line
pub const HEADER_MARKER: char = '>';

/// Gap symbol emitted by the aligner
pub const GAP: u8 = b'-';

/// Ordered mapping of header -> aligned sequence for one alignment file.
///
/// Iteration follows first-encounter order of the headers. A header that
/// appears twice keeps its original position but takes the later sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSequenceSet {
    sequences: IndexMap<String, String>,
}

impl AlignedSequenceSet {
    pub fn new() -> Self {
        Self {
            sequences: IndexMap::new(),
        }
    }

    /// Parse FASTA text. Never fails: lines before the first header are
    /// dropped and empty input yields an empty set.
    pub fn parse(content: &str) -> Self {
        let mut set = Self::new();
        let mut current_header: Option<String> = None;
        let mut sequence = String::new();

        for line in content.lines() {
            if let Some(header) = line.strip_prefix(HEADER_MARKER) {
                if let Some(previous) = current_header.take() {
                    set.insert(previous, std::mem::take(&mut sequence));
                }
                current_header = Some(header.trim().to_string());
            } else if current_header.is_some() {
                sequence.push_str(line.trim());
            }
        }

        if let Some(header) = current_header {
            set.insert(header, sequence);
        }

        set
    }

    /// Parse from any reader. Invalid UTF-8 is replaced, not rejected.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, String> {
        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .map_err(|e| format!("Failed to read alignment: {}", e))?;
        Ok(Self::parse(&String::from_utf8_lossy(&content)))
    }

    /// Load an aligned FASTA file
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open alignment file {}: {}", path.display(), e))?;
        Self::from_reader(BufReader::new(file))
            .map_err(|e| format!("{} ({})", e, path.display()))
    }

    /// Insert a record, overwriting the sequence of an existing header
    pub fn insert(&mut self, header: String, sequence: String) {
        self.sequences.insert(header, sequence);
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.sequences.get(header).map(|s| s.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(|h| h.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sequences.iter().map(|(h, s)| (h.as_str(), s.as_str()))
    }

    /// First record in encounter order, the implicit reference
    pub fn first(&self) -> Option<(&str, &str)> {
        self.sequences
            .get_index(0)
            .map(|(h, s)| (h.as_str(), s.as_str()))
    }

    /// Resolve the reference: an explicit header when given, else the first record
    pub fn reference(&self, header: Option<&str>) -> Option<(&str, &str)> {
        match header {
            Some(h) => self
                .sequences
                .get_key_value(h)
                .map(|(h, s)| (h.as_str(), s.as_str())),
            None => self.first(),
        }
    }
}

/// Read only the first header of a FASTA file
pub fn first_header(path: &Path) -> Result<Option<String>, String> {
    let file = File::open(path)
        .map_err(|e| format!("Failed to open FASTA file {}: {}", path.display(), e))?;

    for line in BufReader::new(file).split(b'\n') {
        let line = line.map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let line = String::from_utf8_lossy(&line);
        if let Some(header) = line.strip_prefix(HEADER_MARKER) {
            return Ok(Some(header.trim().to_string()));
        }
    }

    Ok(None)
}
