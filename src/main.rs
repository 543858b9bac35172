use anyhow::Context;
use clap::{Parser, Subcommand};
use oxdc_analysis::config::{load_config_or_default, Config};
use oxdc_analysis::logging::{init_logging, CorrelationScope};
use oxdc_analysis::physics::ParameterTable;
use oxdc_analysis::report;
use oxdc_analysis::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "oxdc")]
#[command(about = "Trajectory superposition and convergence statistics for metalloprotein MD runs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// RMSD of every trajectory frame against a reference structure
    Rmsd {
        /// Reference structure (XYZ, first frame is used)
        #[arg(short, long)]
        reference: PathBuf,

        /// Trajectory (multi-frame XYZ)
        #[arg(short, long)]
        trajectory: PathBuf,

        /// Report raw RMSD without superposition
        #[arg(long)]
        no_align: bool,

        /// Process frames on a single thread
        #[arg(long)]
        serial: bool,

        /// Output file for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Per-residue flexibility from a cpptraj RMSF table or a trajectory
    Rmsf {
        /// RMSF data file (residue and RMSF columns)
        #[arg(short, long, conflicts_with = "trajectory", required_unless_present = "trajectory")]
        input: Option<PathBuf>,

        /// Trajectory (multi-frame XYZ)
        #[arg(short, long)]
        trajectory: Option<PathBuf>,

        /// Reference structure for fitting (defaults to the first trajectory frame)
        #[arg(short, long, requires = "trajectory")]
        reference: Option<PathBuf>,

        /// Measure fluctuations without superposition
        #[arg(long)]
        no_align: bool,

        /// Output file for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convergence diagnostics for one column of a data file
    Series {
        /// Whitespace-separated data file (cpptraj style)
        #[arg(short, long)]
        input: PathBuf,

        /// Zero-based column index
        #[arg(short = 'k', long, default_value = "1")]
        column: usize,

        /// Number of blocks for block averaging
        #[arg(short, long)]
        blocks: Option<usize>,

        /// Series name used in the report
        #[arg(short, long)]
        name: Option<String>,

        /// Output file for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Correlation and mutual information between two series
    Correlate {
        /// First data file
        #[arg(short = 'x', long)]
        x: PathBuf,

        /// Second data file
        #[arg(short = 'y', long)]
        y: PathBuf,

        /// Zero-based column index in both files
        #[arg(short = 'k', long, default_value = "1")]
        column: usize,

        /// Output file for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Equilibration summary of an AMBER mdout energy log
    Energy {
        /// mdout file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Vibrational modes and literature agreement of metal-ligand bonds
    Bonds {
        /// Bond parameter table (TOML)
        #[arg(short, long)]
        params: PathBuf,

        /// Temperature in K (defaults to the configured value)
        #[arg(short, long)]
        temperature: Option<f64>,

        /// Output file for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config_or_default(cli.config.as_deref());
    match cli.verbose {
        0 => {}
        1 => config.logging = config.logging.with_level("debug"),
        _ => config.logging = config.logging.with_level("trace"),
    }
    let _logging_guard = init_logging(&config.logging)?;
    let run = CorrelationScope::new();
    tracing::info!(run_id = %run.id(), "Starting oxdc");

    match cli.command {
        Commands::Rmsd { reference, trajectory, no_align, serial, output } => {
            handle_rmsd(&config, &reference, &trajectory, no_align, serial, output)?;
        }
        Commands::Rmsf { input, trajectory, reference, no_align, output } => {
            handle_rmsf(&config, input, trajectory, reference, no_align, output)?;
        }
        Commands::Series { input, column, blocks, name, output } => {
            handle_series(&config, &input, column, blocks, name, output)?;
        }
        Commands::Correlate { x, y, column, output } => {
            handle_correlate(&config, &x, &y, column, output)?;
        }
        Commands::Energy { input, output } => {
            handle_energy(&config, &input, output)?;
        }
        Commands::Bonds { params, temperature, output } => {
            handle_bonds(&config, &params, temperature, output)?;
        }
    }

    Ok(())
}

fn save_json<T: Serialize>(report: &T, output: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&output_path, json)
            .with_context(|| format!("Failed to write report to {}", output_path.display()))?;
        println!("Report saved to {}", output_path.display());
    }
    Ok(())
}

fn load_column(path: &Path, column: usize) -> anyhow::Result<Vec<f64>> {
    let table = load_columns(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;
    table
        .column(column)
        .with_context(|| format!("Column {} not available in {}", column, path.display()))
}

fn first_frame(path: &Path) -> anyhow::Result<PointSet> {
    load_xyz_frames(path)
        .with_context(|| format!("Failed to read reference {}", path.display()))?
        .into_iter()
        .next()
        .with_context(|| format!("No frames in reference {}", path.display()))
}

fn handle_rmsd(
    config: &Config,
    reference_path: &Path,
    trajectory_path: &Path,
    no_align: bool,
    serial: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let reference = first_frame(reference_path)?;
    let frames = load_xyz_frames(trajectory_path)
        .with_context(|| format!("Failed to read trajectory {}", trajectory_path.display()))?;

    println!("Reference: {} atoms, trajectory: {} frames", reference.len(), frames.len());

    let mut options = config.rmsd;
    if no_align {
        options.align = false;
    }
    if serial {
        options.parallel = false;
    }

    let report = analyze_rmsd_with(&reference, &frames, &config.analysis, &options)?;
    report::print_rmsd(&report);
    save_json(&report, output)
}

fn handle_rmsf(
    config: &Config,
    input: Option<PathBuf>,
    trajectory: Option<PathBuf>,
    reference: Option<PathBuf>,
    no_align: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let report = match (input, trajectory) {
        (Some(input), _) => {
            let table = load_columns(&input)
                .with_context(|| format!("Failed to read data file {}", input.display()))?;
            analyze_rmsf_table(&table, &config.analysis)?
        }
        (None, Some(trajectory)) => {
            let frames = load_xyz_frames(&trajectory)
                .with_context(|| format!("Failed to read trajectory {}", trajectory.display()))?;
            let reference = match reference {
                Some(path) => first_frame(&path)?,
                None => frames
                    .first()
                    .cloned()
                    .with_context(|| format!("No frames in trajectory {}", trajectory.display()))?,
            };
            let mut options = config.rmsd;
            if no_align {
                options.align = false;
            }
            analyze_trajectory_rmsf(&reference, &frames, &config.analysis, &options)?
        }
        (None, None) => anyhow::bail!("either --input or --trajectory is required"),
    };

    report::print_rmsf(&report);
    save_json(&report, output)
}

fn handle_series(
    config: &Config,
    input: &Path,
    column: usize,
    blocks: Option<usize>,
    name: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let values = load_column(input, column)?;
    let mut analysis = config.analysis.clone();
    if let Some(blocks) = blocks {
        analysis.block_count = blocks;
    }
    let name = name.unwrap_or_else(|| {
        input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("series")
            .to_string()
    });

    let report = analyze_series(&name, &values, &analysis)?;
    report::print_series(&report);
    save_json(&report, output)
}

fn handle_correlate(
    config: &Config,
    x_path: &Path,
    y_path: &Path,
    column: usize,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let x = load_column(x_path, column)?;
    let y = load_column(y_path, column)?;
    let label = |p: &Path| p.display().to_string();

    let report = analyze_pair(&label(x_path), &x, &label(y_path), &y, &config.analysis)?;
    report::print_pair(&report);
    save_json(&report, output)
}

fn handle_energy(config: &Config, input: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let energy = load_mdout(input)
        .with_context(|| format!("Failed to read energy log {}", input.display()))?;

    let report = analyze_energy(&energy, &config.analysis)?;
    report::print_energy(&report);
    save_json(&report, output)
}

fn handle_bonds(
    config: &Config,
    params: &Path,
    temperature: Option<f64>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let table = ParameterTable::load_from_file(params)
        .with_context(|| format!("Failed to read parameter table {}", params.display()))?;
    let temperature = temperature.unwrap_or(config.analysis.temperature_k);

    let report = analyze_bonds(&table, temperature)?;
    report::print_bonds(&report);
    save_json(&report, output)
}
