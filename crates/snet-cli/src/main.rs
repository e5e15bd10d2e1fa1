use anyhow::Result;
use clap::{CommandFactory, Parser, ValueEnum};
use snet_cidr::{is_cidr, is_dotted_quad, Net4, SubnetSummary};
use snet_core::{ErrorKind, SnetError};
use std::io::{self, IsTerminal, Write};
use tracing::debug;

mod console;
mod logging;
mod render;

use console::{Console, Palette, IGNORED_PAIR_WARNING};

/// IPv4 subnet calculator
#[derive(Parser)]
#[command(name = "snet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Specify a Network in Address w/ CIDR Format: x.x.x.x/x
    #[arg(short = 'c', value_name = "CIDR")]
    cidr: Option<String>,

    /// Specify an IP address on the network (Use in conjunction with -m) - Format: x.x.x.x
    #[arg(short = 'a', value_name = "ADDRESS")]
    address: Option<String>,

    /// Specify the Subnet Mask for the network (Use in conjunction with -a) - Format: x.x.x.x
    #[arg(short = 'm', value_name = "MASK")]
    mask: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    output: OutputFormat,

    /// When to color warnings and errors
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorMode,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn cidr(&self) -> Option<&str> {
        non_empty(&self.cidr)
    }

    fn address(&self) -> Option<&str> {
        non_empty(&self.address)
    }

    fn mask(&self) -> Option<&str> {
        non_empty(&self.mask)
    }
}

// An empty flag value counts as unset.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Aligned table
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// CSV output
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    /// Color when the output stream is a terminal and NO_COLOR is not set
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve for one output stream; `is_terminal` describes that stream
    fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                is_terminal && std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty())
            }
        }
    }
}

/// Result of interpreting the network flags
struct Outcome {
    warning: Option<&'static str>,
    result: Result<SubnetSummary, SnetError>,
}

fn evaluate(cidr: Option<&str>, address: Option<&str>, mask: Option<&str>) -> Outcome {
    if let Some(cidr) = cidr {
        let warning = (address.is_some() || mask.is_some()).then_some(IGNORED_PAIR_WARNING);
        debug!(cidr, ignored_pair = warning.is_some(), "using CIDR input");
        let result = if is_cidr(cidr) {
            Net4::from_cidr(cidr).and_then(|net| net.validate())
        } else {
            Err(SnetError::CidrFormat)
        };
        return Outcome { warning, result };
    }

    let result = match (address, mask) {
        (Some(address), Some(mask)) => {
            debug!(address, mask, "using address and mask input");
            if is_dotted_quad(address) && is_dotted_quad(mask) {
                Net4::from_address_and_mask(address, mask).and_then(|net| net.validate())
            } else {
                Err(SnetError::AddressFormat)
            }
        }
        (Some(_), None) | (None, Some(_)) => Err(SnetError::UnpairedMask),
        (None, None) => Err(SnetError::MissingArguments),
    };
    Outcome {
        warning: None,
        result,
    }
}

fn usage() -> String {
    Cli::command().render_help().to_string()
}

/// Validation failures are reported on `out` and are not errors of `run`
fn run(cli: &Cli, console: &Console, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
    let outcome = evaluate(cli.cidr(), cli.address(), cli.mask());

    if let Some(warning) = outcome.warning {
        writeln!(out, "{}", console.warning(warning))?;
    }

    match outcome.result {
        Ok(summary) => render::write_summary(out, &summary, cli.output)?,
        Err(e) => {
            debug!(kind = ?e.kind(), "reporting error");
            writeln!(out, "{}", console.error(&e))?;
            if e.kind() == ErrorKind::Usage {
                write!(err, "{}", usage())?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Messages go to stdout and log events to stderr, so each checks its own stream.
    logging::init(cli.verbose, Palette::new(cli.color.enabled(io::stderr().is_terminal())));
    let console = Console::new(Palette::new(cli.color.enabled(io::stdout().is_terminal())));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &console, &mut out, &mut io::stderr())?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> (String, String) {
        let cli = Cli::parse_from(args);
        let console = Console::new(Palette::new(false));
        let (mut out, mut err) = (Vec::new(), Vec::new());
        run(&cli, &console, &mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["snet", "-c", "10.0.0.1/24"]);
        assert_eq!(cli.cidr(), Some("10.0.0.1/24"));
        assert_eq!(cli.address(), None);
        assert!(matches!(cli.output, OutputFormat::Human));
        assert!(matches!(cli.color, ColorMode::Auto));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_address_and_mask_flags() {
        let cli = Cli::parse_from(["snet", "-a", "10.0.0.1", "-m", "255.0.0.0", "-o", "json"]);
        assert_eq!(cli.address(), Some("10.0.0.1"));
        assert_eq!(cli.mask(), Some("255.0.0.0"));
        assert!(matches!(cli.output, OutputFormat::Json));
    }

    #[test]
    fn test_empty_flag_is_unset() {
        let cli = Cli::parse_from(["snet", "-c", "", "-a", "10.0.0.1"]);
        assert_eq!(cli.cidr(), None);
        assert!(matches!(
            evaluate(cli.cidr(), cli.address(), cli.mask()).result,
            Err(SnetError::UnpairedMask)
        ));
    }

    #[test]
    fn test_color_mode_fixed() {
        assert!(ColorMode::Always.enabled(false));
        assert!(!ColorMode::Never.enabled(true));
        assert!(!ColorMode::Auto.enabled(false));
    }

    #[test]
    fn test_evaluate_cidr() {
        let outcome = evaluate(Some("192.168.1.10/24"), None, None);
        assert!(outcome.warning.is_none());
        let summary = outcome.result.unwrap();
        assert_eq!(summary.network.to_string(), "192.168.1.0");
        assert_eq!(summary.cidr, 24);
    }

    #[test]
    fn test_evaluate_cidr_takes_precedence() {
        let outcome = evaluate(Some("10.0.0.5/30"), Some("1.2.3.4"), None);
        assert_eq!(outcome.warning, Some(IGNORED_PAIR_WARNING));
        assert_eq!(outcome.result.unwrap().broadcast.to_string(), "10.0.0.7");

        let outcome = evaluate(Some("10.0.0.5/30"), None, Some("255.0.0.0"));
        assert_eq!(outcome.warning, Some(IGNORED_PAIR_WARNING));
    }

    #[test]
    fn test_evaluate_errors() {
        let err = |c, a, m| evaluate(c, a, m).result.unwrap_err();
        assert_eq!(err(Some("256.1.1.1/24"), None, None), SnetError::CidrFormat);
        assert_eq!(err(Some("10.0.0.1/33"), None, None), SnetError::CidrFormat);
        assert_eq!(
            err(None, Some("10.0.0.256"), Some("255.0.0.0")),
            SnetError::AddressFormat
        );
        assert_eq!(
            err(None, Some("10.0.0.1"), Some("255.0.0")),
            SnetError::AddressFormat
        );
        assert_eq!(
            err(None, Some("10.0.0.1"), Some("255.0.255.0")),
            SnetError::InvalidMask
        );
        assert_eq!(err(None, Some("10.0.0.1"), None), SnetError::UnpairedMask);
        assert_eq!(err(None, None, Some("255.0.0.0")), SnetError::UnpairedMask);
        assert_eq!(err(None, None, None), SnetError::MissingArguments);
    }

    #[test]
    fn test_invalid_cidr_still_warns() {
        let (out, _) = run_args(&["snet", "-c", "10.0.0.1/40", "-a", "10.0.0.1"]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            [
                "Warning: Addresses (-a) and Masks (-m) are ignored when you specify a CIDR (-c)",
                "Error: Address with CIDR (-c) is not in the format x.x.x.x/x or is out of range.",
            ]
        );
    }

    #[test]
    fn test_run_prints_table() {
        let (out, err) = run_args(&["snet", "-a", "10.1.2.3", "-m", "255.255.0.0"]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let cells: Vec<&str> = lines[1].split_whitespace().collect();
        assert_eq!(
            cells,
            ["10.1.0.0", "10.1.0-255.1-254", "10.1.255.255", "255.255.0.0", "/16"]
        );
        assert!(err.is_empty());
    }

    #[test]
    fn test_run_unpaired_flags_print_usage() {
        for args in [["snet", "-a", "10.0.0.1"], ["snet", "-m", "255.0.0.0"]] {
            let (out, err) = run_args(&args);
            assert_eq!(
                out,
                "Error: Subnet Mask (-m) must be specified with a Network Address (-a)\n"
            );
            assert!(err.contains("-c <CIDR>"), "{:?}", args);
        }
    }

    #[test]
    fn test_run_format_error_has_no_usage() {
        let (_, err) = run_args(&["snet", "-c", "10.0.0.1/33"]);
        assert!(err.is_empty());
    }

    #[test]
    fn test_run_invalid_mask() {
        let (out, _) = run_args(&["snet", "-a", "10.0.0.1", "-m", "255.0.255.0"]);
        assert_eq!(out, "Error: Subnet Mask is not valid.\n");
    }

    #[test]
    fn test_run_without_arguments_prints_usage() {
        let (out, err) = run_args(&["snet"]);
        assert_eq!(out, "Error: The snet command requires flag arguments.\n");
        assert!(err.contains("-c <CIDR>"));
        assert!(err.contains("-a <ADDRESS>"));
        assert!(err.contains("-m <MASK>"));
    }
}
