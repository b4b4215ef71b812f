// pipeline.rs - End-to-end run over a miniature dataset with a stub aligner

use mcyscan::core::{AnalysisConfig, Pipeline, PipelineLayout, Stage};
use mcyscan::tools::{default_jobs, MsaTool, ToolError};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Treats the concatenated input as already aligned
struct CopyAligner {
    calls: AtomicUsize,
}

impl MsaTool for CopyAligner {
    fn name(&self) -> &str {
        "copy"
    }

    fn align(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        fs::copy(input, output).map_err(|source| ToolError::Launch {
            tool: "copy".to_string(),
            source,
        })?;
        Ok(())
    }

    fn validate(&self, path: &Path) -> Result<bool, ToolError> {
        let content = fs::read_to_string(path).map_err(|source| ToolError::Launch {
            tool: "validate".to_string(),
            source,
        })?;
        Ok(content.starts_with('>'))
    }
}

const CDS: &str = "\
>lcl|NZ_1_cds_WP_1.1_1 [gene=mcyA] [protein=microcystin synthetase A]
ACGTACGT
>lcl|NZ_1_cds_WP_2.1_2 [gene=other] [protein=hypothetical protein]
TTTT
>lcl|NZ_1_cds_WP_3.1_3 [gene=mcyA] [protein=Microcystin Synthetase A]
ACGTACGA
>lcl|NZ_1_cds_WP_4.1_4 [protein=McyA peptide synthetase]
ACGAACGT
";

fn build_dataset(base: &Path) {
    let sample = base.join("DataSet").join("Nostocales").join("GCF_000001");
    fs::create_dir_all(&sample).unwrap();
    fs::write(sample.join("cds_from_genomic.fna"), CDS).unwrap();

    let reference = base.join("ReferenceGenes");
    fs::create_dir_all(&reference).unwrap();
    fs::write(reference.join("mcyA.fasta"), ">ref mcyA\nACGTACGT\n").unwrap();

    let order_dir = base.join("MSA").join("Nostocales");
    fs::create_dir_all(&order_dir).unwrap();
    fs::write(
        order_dir.join("mcya_stats.tsv"),
        "PolymorphicSites\tNucleotideDiversity\tTajimasD\n1\t0.083\tbad\n",
    )
    .unwrap();
}

fn config() -> AnalysisConfig {
    AnalysisConfig {
        genes: vec!["mcyA".to_string()],
        orders: vec!["Nostocales".to_string()],
        target_genes: vec!["mcyA".to_string()],
        jobs: default_jobs().into_iter().take(1).collect(),
        ..AnalysisConfig::default()
    }
}

#[test]
fn test_full_pipeline_with_stub_aligner() {
    let dir = tempfile::tempdir().unwrap();
    build_dataset(dir.path());
    let layout = PipelineLayout::under(dir.path());
    let tool = CopyAligner {
        calls: AtomicUsize::new(0),
    };

    let pipeline = Pipeline::new(config(), layout.clone()).with_tool(&tool);
    let report = pipeline.run(&Stage::ALL).unwrap();

    assert!(report.failed_stages.is_empty());
    assert_eq!(tool.calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.extracted_files, 1);
    assert_eq!(report.aligned, 1);

    // Duplicate protein name dropped, protein-tag match kept
    let extracted = fs::read_to_string(layout.extracted_fasta("Nostocales", "mcyA")).unwrap();
    assert_eq!(extracted.matches('>').count(), 2);
    assert!(!extracted.contains("WP_3.1"));

    let summary = fs::read_to_string(layout.mutation_summary("Nostocales", "mcya")).unwrap();
    assert_eq!(
        summary,
        "Header\tOrder\tMutations\n\
         lcl|NZ_1_cds_WP_1.1_1 [gene=mcyA] [protein=microcystin synthetase A]\tNostocales\t0\n\
         lcl|NZ_1_cds_WP_4.1_4 [protein=McyA peptide synthetase]\tNostocales\t1\n\
         \n\
         Order\tNumSequences\tAvgMutations\n\
         Nostocales\t2\t0.50\n"
    );

    let matrix = fs::read_to_string(layout.mutation_matrix("Nostocales", "mcyA")).unwrap();
    let lines: Vec<&str> = matrix.lines().collect();
    assert_eq!(lines[0], "SeqHeader,Pos1,Pos2,Pos3,Pos4,Pos5,Pos6,Pos7,Pos8");
    assert_eq!(lines[3], "Seq3,0,0,0,1,0,0,0,0");

    let onehot = fs::read_to_string(layout.onehot_matrix("Nostocales", "mcyA")).unwrap();
    assert!(onehot.lines().nth(1).unwrap().starts_with("ref mcyA,1,0,0,0,0,0,1,0,0,0"));

    let types = fs::read_to_string(layout.mutation_type_summary()).unwrap();
    assert_eq!(types.lines().nth(1), Some("mcyA,Nostocales,1,0,0,0,0,0"));

    let matrix_summary = fs::read_to_string(layout.matrix_summary()).unwrap();
    assert_eq!(matrix_summary.lines().count(), 4);
    assert_eq!(
        matrix_summary.lines().last(),
        Some("mcyA,Nostocales,Seq3,12.50,1,8")
    );

    let stats = fs::read_to_string(&layout.stats_output).unwrap();
    assert_eq!(stats.lines().nth(1), Some("mcyA\tNostocales\t1\t0.083\tNaN\t0\t0"));
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    build_dataset(dir.path());
    let layout = PipelineLayout::under(dir.path());
    let tool = CopyAligner {
        calls: AtomicUsize::new(0),
    };

    let pipeline = Pipeline::new(config(), layout.clone()).with_tool(&tool);
    pipeline
        .run(&[Stage::Extract, Stage::Align])
        .unwrap();

    let outputs = [
        layout.mutation_summary("Nostocales", "mcya"),
        layout.mutation_matrix("Nostocales", "mcyA"),
        layout.mutation_type_summary(),
        layout.matrix_summary(),
        layout.stats_output.clone(),
    ];

    pipeline.run(&Stage::DEFAULT).unwrap();
    let first: Vec<Vec<u8>> = outputs.iter().map(|p| fs::read(p).unwrap()).collect();

    pipeline.run(&Stage::DEFAULT).unwrap();
    let second: Vec<Vec<u8>> = outputs.iter().map(|p| fs::read(p).unwrap()).collect();

    assert_eq!(first, second);
}

#[test]
fn test_missing_alignments_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let layout = PipelineLayout::under(dir.path());
    let pipeline = Pipeline::new(AnalysisConfig::default(), layout.clone());

    let report = pipeline
        .run(&[Stage::Summarize, Stage::Matrices, Stage::Types, Stage::Stats])
        .unwrap();

    assert!(report.failed_stages.is_empty());
    assert_eq!(report.matrices, 0);
    assert_eq!(report.summaries, 0);
    assert!(report.skipped >= 12);
    assert_eq!(
        fs::read_to_string(layout.mutation_type_summary()).unwrap(),
        "Gene,Order,Missense,Frameshift,FrameshiftDeletion,FrameshiftInsertion,Complex,InFrame\n"
    );
}
