//! rels2sp CLI Entry Point
//!
//! Creates the relationship table for the scan2peptide method.
//!
//! # Usage
//!
//! ```bash
//! rels2sp -i idq.tsv -r rels/s2p.tsv -s rels/scan.tsv \
//!     -a "{aljamia1: -i [Raw_FirstScan]-[Charge] } {aljamia2: -i [Sequence] -j [Raw_FirstScan]-[Charge] }"
//!
//! # Parameters from a YAML file, explicit working directory
//! rels2sp -i idq.tsv -r s2p.tsv -s scan.tsv --params-file params.yaml -t /scratch/tmp
//!
//! # Preview the aljamia command lines
//! rels2sp -i idq.tsv -r s2p.tsv -s scan.tsv -a "..." --dry-run
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use colored::Colorize;
use log::info;

use rels2sp::execution::resolve_aljamia;
use rels2sp::logging::{setup_logging, SCRIPT_NAME};
use rels2sp::monitoring::Diagnostics;
use rels2sp::workflow::{default_log_file, ParameterSource, PipelineDriver, PipelineRequest};
use rels2sp::PipelineError;

const PARAMETER_EXAMPLE: &str = "\
Parameter example:
  \"{aljamia1: -i [Raw_FirstScan]-[Charge] -j [Xs_127_N_126] -k [Vs_127_N_126] -f !([FASTAProteinDescription]~~TRYP_PIG||[FASTAProteinDescription]~~Krt||[FASTAProteinDescription]~~KRT) }
   {aljamia2: -i [Sequence] -j [Raw_FirstScan]-[Charge] }
   {klibrate1: -g  -f }\"";

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "rels2sp",
    version,
    about = "Create the relationship table for scan2peptide method",
    after_help = PARAMETER_EXAMPLE
)]
#[command(group(
    ArgGroup::new("parameters")
        .required(true)
        .args(["params", "params_file"])
))]
struct Cli {
    /// ID-q input file
    #[arg(short = 'i', long)]
    idqfile: PathBuf,

    /// Output file with the relationship table
    #[arg(short = 'r', long)]
    relfile: PathBuf,

    /// Output file with the scans (uncalibrated)
    #[arg(short = 's', long)]
    scanfile: PathBuf,

    /// Input parameters for the sub-methods
    #[arg(short = 'a', long)]
    params: Option<String>,

    /// YAML file mapping each sub-method to its parameters
    #[arg(long)]
    params_file: Option<PathBuf>,

    /// Temporal working directory
    #[arg(short = 't', long)]
    tmpdir: Option<PathBuf>,

    /// Output file with the log tracks
    #[arg(short = 'l', long)]
    logfile: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Path to the aljamia binary
    #[arg(long, env = "ALJAMIA_PATH")]
    aljamia: Option<PathBuf>,

    /// Print the aljamia commands without running them
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn parameter_source(&self) -> ParameterSource {
        match (&self.params, &self.params_file) {
            (_, Some(path)) => ParameterSource::File(path.clone()),
            (Some(params), None) => ParameterSource::Inline(params.clone()),
            (None, None) => ParameterSource::Inline(String::new()),
        }
    }

    fn request(&self) -> PipelineRequest {
        PipelineRequest {
            idq_file: self.idqfile.clone(),
            rel_file: self.relfile.clone(),
            scan_file: self.scanfile.clone(),
            tmp_dir: self.tmpdir.clone(),
            params: self.parameter_source(),
        }
    }
}

/// Main application entry point.
fn run(cli: Cli) -> Result<(), PipelineError> {
    let log_file = match cli.logfile {
        Some(ref path) => path.clone(),
        None => default_log_file(&cli.relfile, SCRIPT_NAME)?,
    };
    setup_logging(&log_file, cli.verbose)?;

    let argv: Vec<String> = std::env::args().collect();
    info!("start script: {}", argv.join(" "));

    let mut driver = PipelineDriver::new(cli.request(), Diagnostics::new(SCRIPT_NAME));
    driver.set_program(resolve_aljamia(cli.aljamia.as_deref()));
    driver.set_dry_run(cli.dry_run);

    if cli.dry_run {
        info!("Mode: DRY RUN (commands will not execute)");
    }

    // Failures are logged by the component that detects them.
    let report = driver.run()?;
    info!(
        "stages finished in {} ms (working directory: {})",
        report.timeline.elapsed().as_millis(),
        report.working_dir.display()
    );
    info!("end script");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_required_arguments() {
        let cli = Cli::try_parse_from([
            "rels2sp", "-i", "idq.tsv", "-r", "rel.tsv", "-s", "scan.tsv", "-a",
            "{aljamia1: -i [Seq] } {aljamia2: -i [Raw]-[Charge] }",
        ])
        .unwrap();

        let request = cli.request();
        assert_eq!(request.idq_file, PathBuf::from("idq.tsv"));
        assert_eq!(request.tmp_dir, None);
        assert!(matches!(request.params, ParameterSource::Inline(ref p) if p.contains("aljamia2")));
        assert!(!cli.verbose);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_parse_optional_arguments() {
        let cli = Cli::try_parse_from([
            "rels2sp", "-i", "idq.tsv", "-r", "rel.tsv", "-s", "scan.tsv", "--params-file",
            "params.yaml", "-t", "/scratch", "-l", "run.log", "-v", "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.tmpdir, Some(PathBuf::from("/scratch")));
        assert_eq!(cli.logfile, Some(PathBuf::from("run.log")));
        assert!(cli.verbose);
        assert_eq!(
            cli.parameter_source(),
            ParameterSource::File(PathBuf::from("params.yaml"))
        );
    }

    #[test]
    fn test_parameters_are_required() {
        let result = Cli::try_parse_from([
            "rels2sp", "-i", "idq.tsv", "-r", "rel.tsv", "-s", "scan.tsv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parameter_sources_are_exclusive() {
        let result = Cli::try_parse_from([
            "rels2sp", "-i", "idq.tsv", "-r", "rel.tsv", "-s", "scan.tsv", "-a", "{}",
            "--params-file", "p.yaml",
        ]);
        assert!(result.is_err());
    }
}
