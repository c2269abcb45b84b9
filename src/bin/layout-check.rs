use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use layout_compliance::{
    default_output_path, ComplianceReport, LayoutEngine, ProcessOptions, ProcessResult,
    RepairStrategy,
};

#[derive(Parser)]
#[command(
    name = "layout-check",
    about = "Validate and repair images against the 300x200 safe-area layout",
    version,
    after_help = "Strategies: smart_fit (recommended), smart_crop, add_padding.\n\
                  Repaired images are always written as PNG."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check an image against the layout contract
    Check {
        /// Input image file
        input: PathBuf,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Repair an image (or every image in a directory)
    Fix {
        /// Input image file or directory
        input: PathBuf,

        /// Output file or directory (default: {name}_fixed.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Repair strategy: smart_fit, smart_crop, or add_padding
        #[arg(short, long, default_value = "smart_fit")]
        strategy: String,

        /// Repair even images that are already compliant
        #[arg(short, long)]
        force: bool,

        /// Suppress all non-error output
        #[arg(short, long)]
        quiet: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Remove the bottom-right watermark without other repairs
    Clean {
        /// Input image file
        input: PathBuf,

        /// Output file (default: {name}_fixed.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    let engine = LayoutEngine::new();

    match cli.command {
        Command::Check { input, json } => run_check(&engine, &input, json),
        Command::Fix {
            input,
            output,
            strategy,
            force,
            quiet,
            verbose,
        } => run_fix(&engine, &input, output, &strategy, force, quiet, verbose),
        Command::Clean { input, output } => run_clean(&engine, &input, output),
    }
}

fn run_check(engine: &LayoutEngine, input: &Path, json: bool) {
    let bytes = read_or_exit(input);
    let report = match engine.check(&bytes) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error: failed to serialize report: {e}");
                process::exit(1);
            }
        }
    } else {
        print_report(input, &report);
    }

    if !report.compliant {
        process::exit(1);
    }
}

fn print_report(input: &Path, report: &ComplianceReport) {
    let verdict = if report.compliant {
        "COMPLIANT"
    } else {
        "NOT COMPLIANT"
    };
    println!("{}: {verdict}", input.display());
    println!(
        "  {}x{} ({}){}",
        report.info.original_width,
        report.info.original_height,
        report.info.format.as_deref().unwrap_or("unknown format"),
        if report.info.resized {
            ", resized for analysis"
        } else {
            ""
        }
    );
    for e in &report.errors {
        println!("  error: {e}");
    }
    for w in &report.warnings {
        println!("  warning: {w}");
    }
    if let Some(samples) = (!report.info.out_of_bounds_samples.is_empty())
        .then_some(&report.info.out_of_bounds_samples)
    {
        let coords: Vec<String> = samples.iter().map(|(x, y)| format!("({x},{y})")).collect();
        println!("  first violations: {}", coords.join(" "));
    }
}

#[allow(clippy::fn_params_excessive_bools)]
fn run_fix(
    engine: &LayoutEngine,
    input: &Path,
    output: Option<PathBuf>,
    strategy: &str,
    force: bool,
    quiet: bool,
    verbose: bool,
) {
    let strategy = match RepairStrategy::from_str(strategy) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Valid strategies: smart_fit, smart_crop, add_padding");
            process::exit(1);
        }
    };

    let opts = ProcessOptions {
        strategy,
        force,
        quiet,
        verbose,
    };

    if !input.exists() {
        eprintln!("Error: input path does not exist: {}", input.display());
        process::exit(1);
    }

    if !opts.quiet {
        eprintln!("Strategy: {strategy} ({})", strategy.description());
    }

    let results = if input.is_dir() {
        let Some(output_dir) = output else {
            eprintln!("Error: output directory is required for batch processing");
            eprintln!("Usage: layout-check fix <input_dir> -o <output_dir>");
            process::exit(1);
        };
        engine.process_directory(input, &output_dir, &opts)
    } else {
        let output_path = output.unwrap_or_else(|| default_output_path(input));
        vec![engine.process_file(input, &output_path, &opts)]
    };

    let mut success_count = 0u32;
    let mut skip_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts);
        if r.skipped {
            skip_count += 1;
        } else if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Repaired: {success_count}");
        if skip_count > 0 {
            eprint!(", Skipped: {skip_count}");
        }
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn run_clean(engine: &LayoutEngine, input: &Path, output: Option<PathBuf>) {
    let bytes = read_or_exit(input);
    let cleaned = match engine.remove_watermark(&bytes) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let output_path = output.unwrap_or_else(|| default_output_path(input));
    if let Err(e) = std::fs::write(&output_path, cleaned) {
        eprintln!("Error: failed to save {}: {e}", output_path.display());
        process::exit(1);
    }
    println!("Wrote {}", output_path.display());
}

fn read_or_exit(input: &Path) -> Vec<u8> {
    match std::fs::read(input) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: failed to read {}: {e}", input.display());
            process::exit(1);
        }
    }
}

fn print_result(result: &ProcessResult, opts: &ProcessOptions) {
    if opts.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.skipped {
        if !opts.quiet {
            eprintln!("[SKIP] {filename}: {}", result.message);
        }
    } else if result.success {
        if !opts.quiet {
            eprintln!("[OK] {filename}");
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}
