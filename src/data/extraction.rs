// extraction.rs - Target gene extraction from genomic CDS FASTA files

use bio::io::fasta;
use indexmap::IndexMap;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name of the NCBI CDS FASTA inside each assembly directory
pub const CDS_FILE_NAME: &str = "cds_from_genomic.fna";

/// Pseudo-genus under which the curated reference genes are collected
pub const REFERENCE_GENUS: &str = "ReferenceGenes";

/// Matches NCBI `[gene=...]` / `[protein=...]` header tags against target genes
#[derive(Debug)]
pub struct GeneMatcher {
    targets: Vec<(String, Regex, Regex)>,
}

impl GeneMatcher {
    pub fn new(target_genes: &[String]) -> Result<Self, String> {
        let mut targets = Vec::with_capacity(target_genes.len());
        for gene in target_genes {
            let escaped = regex::escape(gene);
            let gene_tag = Regex::new(&format!(r"(?i)\[gene\s*=\s*{}\]", escaped))
                .map_err(|e| format!("Invalid gene pattern for '{}': {}", gene, e))?;
            let protein_tag = Regex::new(&format!(r"(?i)\[protein\s*=\s*[^\]]*{}[^\]]*\]", escaped))
                .map_err(|e| format!("Invalid protein pattern for '{}': {}", gene, e))?;
            targets.push((gene.clone(), gene_tag, protein_tag));
        }
        Ok(Self { targets })
    }

    /// First target gene whose gene or protein tag matches the header
    pub fn match_header(&self, header: &str) -> Option<&str> {
        self.targets
            .iter()
            .find(|(_, gene_tag, protein_tag)| {
                gene_tag.is_match(header) || protein_tag.is_match(header)
            })
            .map(|(gene, _, _)| gene.as_str())
    }
}

/// Protein name from a `[protein=...]` tag, or the whole header
pub fn protein_name(header: &str) -> String {
    thread_local! {
        static PROTEIN: Regex = Regex::new(r"(?i)\[protein\s*=\s*([^\]]+)\]").unwrap();
    }
    PROTEIN.with(|re| {
        re.captures(header)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| header.to_string())
    })
}

/// Sequences collected for one gene within one genus
#[derive(Debug, Clone, Default)]
pub struct GeneRecords {
    pub gene: String,
    pub records: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
struct GenusEntry {
    genus: String,
    genes: IndexMap<String, GeneRecords>,
}

/// Accumulator of genus -> gene -> (header, sequence).
///
/// Genus and gene keys compare case-insensitively; the first spelling seen
/// is the one reported. Iteration follows first-seen order.
#[derive(Debug, Clone, Default)]
pub struct GeneCollection {
    genera: IndexMap<String, GenusEntry>,
}

impl GeneCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, genus: &str, gene: &str, header: String, sequence: String) {
        let genus_entry = self
            .genera
            .entry(genus.to_lowercase())
            .or_insert_with(|| GenusEntry {
                genus: genus.to_string(),
                genes: IndexMap::new(),
            });
        genus_entry
            .genes
            .entry(gene.to_lowercase())
            .or_insert_with(|| GeneRecords {
                gene: gene.to_string(),
                records: Vec::new(),
            })
            .records
            .push((header, sequence));
    }

    /// Fold another collection into this one, preserving its order
    pub fn merge(&mut self, other: GeneCollection) {
        for genus_entry in other.genera.into_values() {
            for gene_records in genus_entry.genes.into_values() {
                for (header, sequence) in gene_records.records {
                    self.add(&genus_entry.genus, &gene_records.gene, header, sequence);
                }
            }
        }
    }

    pub fn genera(&self) -> impl Iterator<Item = &str> {
        self.genera.values().map(|g| g.genus.as_str())
    }

    pub fn genes_of(&self, genus: &str) -> impl Iterator<Item = &GeneRecords> {
        self.genera
            .get(&genus.to_lowercase())
            .into_iter()
            .flat_map(|g| g.genes.values())
    }

    pub fn get(&self, genus: &str, gene: &str) -> Option<&GeneRecords> {
        self.genera
            .get(&genus.to_lowercase())?
            .genes
            .get(&gene.to_lowercase())
    }

    pub fn total_records(&self) -> usize {
        self.genera
            .values()
            .flat_map(|g| g.genes.values())
            .map(|g| g.records.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.genera.is_empty()
    }
}

/// Records kept for writing after protein-name deduplication
#[derive(Debug, Clone)]
pub struct UniqueRecords<'a> {
    pub kept: Vec<&'a (String, String)>,
    pub duplicates: Vec<String>,
}

/// Keep at most `max_sequences` records with distinct (case-insensitive) protein names
pub fn unique_by_protein(records: &[(String, String)], max_sequences: usize) -> UniqueRecords<'_> {
    let mut seen = std::collections::HashSet::new();
    let mut kept = Vec::new();
    let mut duplicates = Vec::new();

    for record in records {
        if kept.len() >= max_sequences {
            break;
        }
        let name = protein_name(&record.0);
        if !seen.insert(name.to_lowercase()) {
            duplicates.push(name);
            continue;
        }
        kept.push(record);
    }

    UniqueRecords { kept, duplicates }
}

/// Scans genus directories for CDS files and collects target gene records
pub struct GeneExtractor {
    matcher: GeneMatcher,
}

impl GeneExtractor {
    pub fn new(target_genes: &[String]) -> Result<Self, String> {
        Ok(Self {
            matcher: GeneMatcher::new(target_genes)?,
        })
    }

    /// Extract matching records from one CDS FASTA file.
    ///
    /// Lines before the first header are ignored and invalid UTF-8 is
    /// replaced. Headers are matched as the trimmed raw line after `>`.
    pub fn extract_file(&self, genus: &str, fasta_path: &Path) -> Result<GeneCollection, String> {
        let bytes = std::fs::read(fasta_path)
            .map_err(|e| format!("Failed to read FASTA file {}: {}", fasta_path.display(), e))?;
        let content = String::from_utf8_lossy(&bytes);
        let mut collection = GeneCollection::new();

        let start = if content.starts_with('>') {
            0
        } else {
            match content.find("\n>") {
                Some(offset) => offset + 1,
                None => return Ok(collection),
            }
        };
        let body = &content[start..];

        // bio yields one record per `>` line, in file order
        let headers = body
            .lines()
            .filter_map(|line| line.strip_prefix('>'))
            .map(str::trim);
        let reader = fasta::Reader::new(body.as_bytes());

        for (header, record_result) in headers.zip(reader.records()) {
            let record = record_result
                .map_err(|e| format!("Invalid FASTA record in {}: {}", fasta_path.display(), e))?;

            if let Some(gene) = self.matcher.match_header(header) {
                let gene = gene.to_string();
                let sequence: String = String::from_utf8_lossy(record.seq())
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                collection.add(genus, &gene, header.to_string(), sequence);
            }
        }

        Ok(collection)
    }

    /// CDS files below a genus directory (any depth under its subdirectories)
    pub fn cds_files(genus_dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(genus_dir)
            .min_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == CDS_FILE_NAME)
            .map(|entry| entry.into_path())
            .collect()
    }

    /// Extract every CDS file of a genus. Unreadable files are reported and skipped.
    pub fn traverse_genus(&self, genus: &str, genus_dir: &Path) -> GeneCollection {
        let mut collection = GeneCollection::new();

        for cds_path in Self::cds_files(genus_dir) {
            match self.extract_file(genus, &cds_path) {
                Ok(found) => collection.merge(found),
                Err(e) => println!("⚠️  Warning: {}", e),
            }
        }

        collection
    }

    /// Walk every genus directory below the dataset root, plus the optional
    /// reference directory collected as [`REFERENCE_GENUS`]
    pub fn traverse_dataset(
        &self,
        dataset_root: &Path,
        reference_root: Option<&Path>,
    ) -> Result<GeneCollection, String> {
        if !dataset_root.is_dir() {
            return Err(format!("DataSet directory not found at: {}", dataset_root.display()));
        }

        let mut genus_dirs: Vec<PathBuf> = std::fs::read_dir(dataset_root)
            .map_err(|e| format!("Failed to read dataset directory: {}", e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        genus_dirs.sort();

        let mut collection = GeneCollection::new();
        for genus_dir in genus_dirs {
            let genus = genus_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            println!("  🔎 {}", genus);
            collection.merge(self.traverse_genus(&genus, &genus_dir));
        }

        if let Some(reference_root) = reference_root {
            if reference_root.is_dir() {
                collection.merge(self.traverse_genus(REFERENCE_GENUS, reference_root));
            }
        }

        Ok(collection)
    }
}
