// main.rs - CLI entry point

use mcyscan::cli::Config;
use mcyscan::core::RunReport;
use mcyscan::prelude::*;
use std::time::Instant;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    let mut file_config = None;
    if let Some(config_path) = args.config.clone() {
        let (merged, config) = args.with_config_file(&config_path)?;
        args = merged;
        file_config = Some(config);
    }

    let mut validation = validate_args(&args)?;
    if let Some(jobs) = file_config.and_then(|c| c.jobs) {
        validation.analysis.jobs = jobs;
    }

    println!("🚀 mcyscan v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "🕐 Started: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("🧵 Threads: {}", n);
    } else {
        let num_threads = rayon::current_num_threads();
        println!("🧵 Threads: {} (auto-detected)", num_threads);
    }

    print_plan(&validation);

    if args.dry_run {
        println!("\n✅ Dry run complete: configuration is valid");
        return Ok(());
    }

    let total_start = Instant::now();
    let tool = ExternalMsaTool::new(
        &args.aligner,
        args.validator.clone().unwrap_or_default(),
    );

    let pipeline = Pipeline::new(validation.analysis, validation.layout)
        .with_grouping(validation.strategy)
        .with_reference_header(args.reference_header.clone())
        .with_filter(validation.header_filter)
        .with_tool(&tool);

    let report = pipeline.run(&validation.stages)?;
    print_report(&report);

    println!(
        "\n🎉 Completed in {:.2}s",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn print_plan(validation: &ValidationResult) {
    let stages: Vec<&str> = validation.stages.iter().map(|s| s.name()).collect();
    let layout = &validation.layout;
    let analysis = &validation.analysis;

    println!("🧬 Stages: {}", stages.join(", "));
    println!("📁 DataSet: {}", layout.dataset_root.display());
    println!("📁 Reference genes: {}", layout.reference_root.display());
    println!("📁 Extracted genes: {}", layout.extracted_root.display());
    println!("📁 MSA: {}", layout.msa_root.display());
    println!("📊 Stats table: {}", layout.stats_output.display());
    println!("🔬 Genes: {}", analysis.genes.join(", "));
    println!("🌿 Orders: {}", analysis.orders.join(", "));
    println!(
        "🔤 Alphabet: {}",
        String::from_utf8_lossy(&analysis.alphabet)
    );
    println!("👥 Grouping: {}", validation.strategy.description());

    if validation.header_filter.include.is_some() || validation.header_filter.exclude.is_some() {
        println!("🔍 Header filters active");
    }
}

fn print_report(report: &RunReport) {
    println!("\n📊 Run summary:");
    println!("   Extracted FASTA files: {}", report.extracted_files);
    println!("   Alignments: {}", report.aligned);
    println!("   Mutation summaries: {}", report.summaries);
    println!("   Mutation matrices: {}", report.matrices);
    println!("   One-hot matrices: {}", report.onehot_matrices);
    println!("   Mutation type rows: {}", report.type_rows);
    println!("   Matrix summary rows: {}", report.matrix_summary_rows);
    println!("   Stats rows: {}", report.stats_rows);

    if report.skipped > 0 {
        println!("⚠️  Skipped units: {}", report.skipped);
    }
    if !report.failed_stages.is_empty() {
        let failed: Vec<&str> = report.failed_stages.iter().map(|s| s.name()).collect();
        println!("❌ Failed stages: {}", failed.join(", "));
    }
}
