//! impress-wikicite CLI
//!
//! Reads citation templates, one per line, and writes a `<references>` list
//! whose entries are named `Surname_Year` for use as `<ref name=... />`.

use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use impress_wikicite::{
    line_number_of, CitationProcessor, ConfigError, ErrorPolicy, FailedRecord, ProcessReport,
    WikiCiteConfig, WikiCiteError,
};

#[derive(Parser, Debug)]
#[command(
    name = "impress-wikicite",
    about = "Give wiki citation templates unique author-year reference names",
    version,
    long_about = None
)]
struct Cli {
    /// Citation file with one template per line, or `-` for stdin
    input: String,

    /// Output file; the reference list goes to stdout when omitted
    output: Option<PathBuf>,

    /// Overwrite the output file if it already exists
    #[arg(short, long)]
    force: bool,

    /// Skip records that cannot be keyed instead of stopping
    #[arg(long)]
    lenient: bool,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report suppressed duplicates on stderr
    #[arg(long)]
    report_duplicates: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Errors from the command-line layer
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Output file {0} already exists (use --force to overwrite)")]
    OutputExists(PathBuf),

    #[error("Cannot read config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    config.validate()?;

    if let Some(path) = &cli.output {
        check_output_target(path, cli.force)?;
    }

    let reader = open_input(&cli.input)?;
    let report = run(reader, &config)?;

    write_output(cli.output.as_deref(), &report.render())?;
    print_diagnostics(&mut io::stderr().lock(), &report, config.report_duplicates)?;

    Ok(ExitCode::from(exit_status(&report)))
}

/// 0 when every line was processed, 1 when the run halted
fn exit_status(report: &ProcessReport) -> u8 {
    if report.is_complete() {
        0
    } else {
        1
    }
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Config file first, then command-line flags on top
fn load_config(cli: &Cli) -> Result<WikiCiteConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => read_config_file(path)?,
        None => WikiCiteConfig::default(),
    };

    if cli.lenient {
        config.error_policy = ErrorPolicy::Lenient;
    }
    if cli.report_duplicates {
        config.report_duplicates = true;
    }

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<WikiCiteConfig, CliError> {
    let config_error = |message: String| CliError::Config {
        path: path.to_path_buf(),
        message,
    };

    let contents = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
    let config = WikiCiteConfig::from_toml(&contents).map_err(|e| config_error(e.to_string()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Refuse to clobber an existing file unless forced
fn check_output_target(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::OutputExists(path.to_path_buf()));
    }
    if path.exists() {
        tracing::info!(path = %path.display(), "overwriting existing output");
    }
    Ok(())
}

fn open_input(input: &str) -> io::Result<Box<dyn BufRead>> {
    if input == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(fs::File::open(input)?)))
    }
}

fn run(reader: impl BufRead, config: &WikiCiteConfig) -> Result<ProcessReport, CliError> {
    let mut processor = CitationProcessor::new(config)?;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if !processor.push_line(line_number_of(index), &line) {
            break;
        }
    }
    Ok(processor.finish())
}

fn write_output(path: Option<&Path>, document: &str) -> io::Result<()> {
    match path {
        Some(path) => fs::write(path, document),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(document.as_bytes())?;
            stdout.flush()
        }
    }
}

fn print_diagnostics(
    out: &mut impl Write,
    report: &ProcessReport,
    report_duplicates: bool,
) -> io::Result<()> {
    if report_duplicates {
        for duplicate in &report.duplicates {
            writeln!(
                out,
                "Duplicate on line {} of {}: {}, {}, {}",
                duplicate.line_number,
                duplicate.existing,
                duplicate.fields.surname,
                duplicate.fields.year,
                duplicate.fields.title
            )?;
        }
    }

    for skipped in &report.skipped {
        writeln!(out, "Skipped line {}: {}", skipped.line_number, skipped.error)?;
    }

    if let Some(halted) = &report.halted {
        writeln!(out, "{}", describe_halt(halted))?;
    }

    Ok(())
}

fn describe_halt(failed: &FailedRecord) -> String {
    let mut message = format!("Stopped at line {}: {}", failed.line_number, failed.error);
    if let WikiCiteError::MalformedRecord { surname, year, .. } = &failed.error {
        message.push_str(&format!(
            "\n  surname: {}, year: {}",
            surname.as_deref().unwrap_or("-"),
            year.as_deref().unwrap_or("-")
        ));
    }
    message.push_str(&format!("\n  record: {}", failed.raw));
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use tempfile::TempDir;

    #[test]
    fn test_existing_output_refused_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refs.txt");
        fs::write(&path, "old").unwrap();

        assert!(matches!(
            check_output_target(&path, false),
            Err(CliError::OutputExists(_))
        ));
        assert!(check_output_target(&path, true).is_ok());
    }

    #[test]
    fn test_new_output_allowed() {
        let dir = TempDir::new().unwrap();
        assert!(check_output_target(&dir.path().join("new.txt"), false).is_ok());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wikicite.toml");
        fs::write(&path, "suffix_letters = \"bcd\"\n").unwrap();

        let cli = Cli::parse_from([
            "impress-wikicite",
            "refs.txt",
            "--config",
            path.to_str().unwrap(),
            "--lenient",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.error_policy, ErrorPolicy::Lenient);
        assert_eq!(config.suffix_letters, "bcd");
        assert!(!config.report_duplicates);
    }

    #[test]
    fn test_bad_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wikicite.toml");
        fs::write(&path, "error_policy = \"sometimes\"\n").unwrap();

        let cli = Cli::parse_from(["impress-wikicite", "-", "--config", path.to_str().unwrap()]);
        assert!(matches!(load_config(&cli), Err(CliError::Config { .. })));
    }

    #[test]
    fn test_run_halts_and_still_closes_list() {
        let input = "{{cite|last1=Smith|date=2020|title=A}}\r\n\
                     {{cite|last1=Jones|date=2021|title=B}}\r\n\
                     {{cite|last1=Brown|date=2022|title}}\r\n\
                     {{cite|last1=Green|date=2023|title=D}}\r\n";
        let report = run(Cursor::new(input), &WikiCiteConfig::default()).unwrap();

        assert_eq!(
            report.render(),
            "<references>\n\
             <ref name=Smith_2020>{{cite|last1=Smith|date=2020|title=A}}</ref>\n\
             <ref name=Jones_2021>{{cite|last1=Jones|date=2021|title=B}}</ref>\n\
             </references>\n"
        );

        let message = describe_halt(report.halted.as_ref().unwrap());
        assert!(message.contains("line 3"));
        assert!(message.contains("surname: Brown, year: 2022"));
        assert!(message.contains("{{cite|last1=Brown|date=2022|title}}"));
    }

    fn diagnostics(report: &ProcessReport, report_duplicates: bool) -> String {
        let mut out = Vec::new();
        print_diagnostics(&mut out, report, report_duplicates).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_duplicates_reported_only_when_asked() {
        let input = "{{cite|last1=Smith|date=2020|title=A}}\n\
                     {{cite|last1=Smith|date=2020|title=A}}\n";
        let report = run(Cursor::new(input), &WikiCiteConfig::default()).unwrap();

        assert_eq!(
            diagnostics(&report, true),
            "Duplicate on line 2 of Smith_2020: Smith, 2020, A\n"
        );
        assert_eq!(diagnostics(&report, false), "");
    }

    #[test]
    fn test_skipped_lines_reported() {
        let config = WikiCiteConfig {
            error_policy: ErrorPolicy::Lenient,
            ..WikiCiteConfig::default()
        };
        let input = "{{cite|last1=Brown|date=2022|title}}\n\
                     {{cite|last1=Green|date=2023|title=D}}\n";
        let report = run(Cursor::new(input), &config).unwrap();

        let text = diagnostics(&report, false);
        assert!(text.starts_with("Skipped line 1: Malformed record"));
        assert_eq!(text.lines().count(), 1);
        assert_eq!(exit_status(&report), 0);
    }

    #[test]
    fn test_halt_reported_with_failing_status() {
        let input = "{{cite|last1=Smith|date=2020|title=A}}\n\
                     {{cite|last1=Brown|date=2022|title}}\n";
        let report = run(Cursor::new(input), &WikiCiteConfig::default()).unwrap();

        assert_eq!(exit_status(&report), 1);
        let text = diagnostics(&report, true);
        assert!(text.starts_with("Stopped at line 2:"));
        assert!(text.contains("record: {{cite|last1=Brown|date=2022|title}}"));
    }

    #[test]
    fn test_complete_run_succeeds() {
        let report = run(
            Cursor::new("{{cite|last1=Smith|date=2020|title=A}}\n"),
            &WikiCiteConfig::default(),
        )
        .unwrap();
        assert_eq!(exit_status(&report), 0);
        assert_eq!(diagnostics(&report, true), "");
    }

    #[test]
    fn test_invalid_config_rejected_by_run() {
        let config = WikiCiteConfig {
            suffix_letters: "abc".to_string(),
            ..WikiCiteConfig::default()
        };
        assert!(matches!(
            run(Cursor::new(""), &config),
            Err(CliError::InvalidConfig(ConfigError::InvalidSuffixLetters(_)))
        ));
    }

    #[test]
    fn test_verbose_flag_levels() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "debug");
        assert_eq!(log_level(3), "trace");
    }

    #[test]
    fn test_write_output_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        write_output(Some(&path), "<references>\n</references>\n").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<references>\n</references>\n"
        );
    }
}
