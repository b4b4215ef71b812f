// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// mcyscan - Mutation matrices and summaries for microcystin synthetase gene alignments
pub struct Args {
    /// base directory holding DataSet, ReferenceGenes, ExtractedGenes and MSA (default: .)
    #[argh(option)]
    pub base_dir: Option<String>,

    /// genomic dataset root, one directory per genus (default: <base-dir>/DataSet)
    #[argh(option)]
    pub dataset: Option<String>,

    /// reference genes directory (default: <base-dir>/ReferenceGenes)
    #[argh(option)]
    pub reference_genes: Option<String>,

    /// extracted genes output directory (default: <base-dir>/ExtractedGenes)
    #[argh(option)]
    pub extracted: Option<String>,

    /// MSA root directory, one subdirectory per order (default: <base-dir>/MSA)
    #[argh(option)]
    pub msa_dir: Option<String>,

    /// gene/order stats table output (default: <msa-dir>/plots/gene_order_stats_table.tsv)
    #[argh(option)]
    pub stats_output: Option<String>,

    /// aligner executable, MUSCLE-compatible (default: muscle)
    #[argh(option, default = "String::from(\"muscle\")")]
    pub aligner: String,

    /// FASTA validator executable, required by the align stage
    #[argh(option)]
    pub validator: Option<String>,

    /// comma-separated stages: extract, align, summarize, matrices, onehot, types, matrix-summary, stats, default, all (default: default)
    #[argh(option, default = "String::from(\"default\")")]
    pub stages: String,

    /// grouping for mutation summaries: genus, order-tag, order-path (default: order-path)
    #[argh(option, default = "String::from(\"order-path\")")]
    pub group_by: String,

    /// explicit reference header (default: first header of each alignment)
    #[argh(option)]
    pub reference_header: Option<String>,

    /// gene of the analysis grid, repeatable (default: mcyA mcyB mcyE mcyH)
    #[argh(option)]
    pub gene: Vec<String>,

    /// order of the analysis grid, repeatable (default: Chroococcales Nostocales Oscillatoriales)
    #[argh(option)]
    pub order: Vec<String>,

    /// gene name to extract from CDS files, repeatable (default: mcy genes plus adenylation, ABC transporter, aminotransferase)
    #[argh(option)]
    pub target_gene: Vec<String>,

    /// one-hot alphabet (default: ACGT-)
    #[argh(option, default = "String::from(\"ACGT-\")")]
    pub alphabet: String,

    /// maximum sequences per extracted FASTA (default: 1000)
    #[argh(option, default = "1000")]
    pub max_sequences: usize,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// summarize only sequences whose header matches this regex
    #[argh(option)]
    pub include_headers: Option<String>,

    /// leave out of summaries sequences whose header matches this regex
    #[argh(option)]
    pub exclude_headers: Option<String>,

    /// validate inputs and print the plan without running (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
