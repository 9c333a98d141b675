use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use pitch_eval::error::{log_eval_error, EvalErrorCodes};
use pitch_eval::report::{JsonReport, ReportSink, TextReport};
use pitch_eval::{ErrorCode, EvalConfig, EvalError, Evaluator, Manifest, ParsePolicy};

#[derive(Parser, Debug)]
#[command(
    name = "pitch_compare",
    version,
    about = "Score estimated F0 tracks against reference tracks",
    long_about = "For each basename in MANIFEST, compare the reference pitch values in \
                  <DATA_DIR>/<basename>.f0ref with the estimated values in \
                  <DATA_DIR>/<basename>.f0 and report voicing and pitch errors."
)]
struct Cli {
    /// File listing the basenames to evaluate (whitespace separated)
    manifest: PathBuf,
    /// JSON configuration file; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory containing the .f0ref/.f0 files
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Relative error above which a voiced frame counts as a gross error
    #[arg(long)]
    gross_threshold: Option<f32>,
    /// Largest frame-count difference absorbed by truncation
    #[arg(long)]
    frame_tolerance: Option<usize>,
    /// Fail on non-numeric values instead of stopping at them
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Output format for the report
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

impl Cli {
    fn resolve_config(&self) -> Result<EvalConfig, String> {
        let mut config = match &self.config {
            Some(path) => EvalConfig::load_from_file(path),
            None => EvalConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data.data_dir = dir.clone();
        }
        if let Some(threshold) = self.gross_threshold {
            config.comparison.gross_threshold = threshold;
        }
        if let Some(tolerance) = self.frame_tolerance {
            config.reconcile.frame_tolerance = tolerance;
        }
        if self.strict {
            config.parsing = ParsePolicy::Strict;
        }
        config.validate()?;
        Ok(config)
    }

    fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => exit_code(EvalErrorCodes::MANIFEST_READ),
            };
        }
    };
    pitch_eval::init_logging(cli.log_level());

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(reason) => {
            eprintln!("Invalid configuration: {reason}");
            return exit_code(EvalErrorCodes::MANIFEST_READ);
        }
    };

    match run(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_eval_error(&err, "pitch_compare");
            exit_code(err.code())
        }
    }
}

fn run(cli: &Cli, config: EvalConfig) -> Result<(), EvalError> {
    let manifest = Manifest::load(&cli.manifest)?;
    let evaluator = Evaluator::new(config);
    let stdout = io::stdout().lock();

    let mut sink: Box<dyn ReportSink> = match cli.format {
        ReportFormat::Text => Box::new(TextReport::new(stdout)),
        ReportFormat::Json => Box::new(JsonReport::new(stdout)),
    };
    evaluator.run(&manifest, sink.as_mut())?;
    Ok(())
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
