// alignment_report.rs - Standalone reports for a single aligned FASTA file

use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::str::FromStr;

use mcyscan::core::summary::{GroupingStrategy, HeaderFilter, MutationSummary};
use mcyscan::core::{build_mutation_matrix, build_onehot_matrix, tally_mutation_types, MutationType};
use mcyscan::data::{first_header, AlignedSequenceSet};
use mcyscan::output::{write_feature_matrix, write_mutation_summary, Delimiter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("Alignment Report")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Mutation matrix, summary and type tally for one aligned FASTA file")
        .arg(Arg::new("alignment")
            .long("alignment")
            .value_name("FILE")
            .help("Path to aligned FASTA file")
            .required(true))
        .arg(Arg::new("output-dir")
            .long("output-dir")
            .value_name("DIR")
            .help("Directory for the generated reports")
            .required(true))
        .arg(Arg::new("reference-header")
            .long("reference-header")
            .value_name("HEADER")
            .help("Reference header (default: first header in the file)"))
        .arg(Arg::new("group-by")
            .long("group-by")
            .value_name("STRATEGY")
            .help("Grouping: genus, order-tag, order-path (default: order-path)")
            .default_value("order-path"))
        .arg(Arg::new("format")
            .long("format")
            .value_name("FORMAT")
            .help("Matrix delimiter: csv, tsv (default: csv)")
            .default_value("csv"))
        .arg(Arg::new("onehot")
            .long("onehot")
            .help("Also write the one-hot matrix")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("alphabet")
            .long("alphabet")
            .value_name("SYMBOLS")
            .help("One-hot alphabet (default: ACGT-)")
            .default_value("ACGT-"))
        .get_matches();

    let alignment_path = PathBuf::from(
        matches
            .get_one::<String>("alignment")
            .ok_or("--alignment is required")?,
    );
    let output_dir = PathBuf::from(
        matches
            .get_one::<String>("output-dir")
            .ok_or("--output-dir is required")?,
    );
    let strategy = GroupingStrategy::from_str(
        matches
            .get_one::<String>("group-by")
            .map(String::as_str)
            .unwrap_or("order-path"),
    )?;
    let delimiter = Delimiter::from_str(
        matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("csv"),
    )?;
    let alphabet = matches
        .get_one::<String>("alphabet")
        .map(|a| a.as_bytes().to_vec())
        .unwrap_or_else(|| b"ACGT-".to_vec());

    println!("🧬 Alignment Report");
    println!("📂 Input: {}", alignment_path.display());

    let alignment = AlignedSequenceSet::from_file(&alignment_path)?;
    println!("✅ Loaded {} sequences", alignment.len());

    let stem = alignment_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "alignment".to_string());
    let extension = match delimiter {
        Delimiter::Comma => "csv",
        Delimiter::Tab => "tsv",
    };

    // Binary mutation matrix
    match build_mutation_matrix(&alignment) {
        Some(matrix) => {
            let out = output_dir.join(format!("{}_mutation_matrix.{}", stem, extension));
            write_feature_matrix(&out, &matrix, delimiter)?;
            println!("💾 Mutation matrix: {} ({} x {})", out.display(), matrix.num_rows(), matrix.num_columns());
        }
        None => println!("⚠️  Empty alignment, no matrix written"),
    }

    if matches.get_flag("onehot") {
        if let Some(matrix) = build_onehot_matrix(&alignment, &alphabet) {
            let out = output_dir.join(format!("{}_onehot_matrix.{}", stem, extension));
            write_feature_matrix(&out, &matrix, delimiter)?;
            println!("💾 One-hot matrix: {} ({} x {})", out.display(), matrix.num_rows(), matrix.num_columns());
        }
    }

    // Per-sequence summary
    let reference = match matches.get_one::<String>("reference-header") {
        Some(header) => Some(header.clone()),
        None => first_header(&alignment_path)?,
    };
    match reference {
        Some(reference) => {
            let summary = MutationSummary::build(
                &alignment,
                &reference,
                strategy,
                &alignment_path,
                &HeaderFilter::default(),
            )?;
            let out = output_dir.join(format!("{}_mutation_summary.tsv", stem));
            write_mutation_summary(&out, &summary)?;
            println!("📝 Mutation summary: {} ({} groups)", out.display(), summary.groups.len());
        }
        None => println!("⚠️  No reference header found, summary skipped"),
    }

    print_type_tally(&alignment);
    Ok(())
}

fn print_type_tally(alignment: &AlignedSequenceSet) {
    let counts = tally_mutation_types(alignment);
    println!("\n📊 Mutation types against the first record:");
    for kind in MutationType::REPORTED {
        println!("   {:<20} {}", kind.name(), counts.get(kind));
    }
    println!("   {:<20} {}", "Total", counts.total());
}
