//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

use crate::config::PlantConfig;

/// Default port for `--serve`.
pub const DEFAULT_PORT: u16 = 3000;

/// Plant values given directly on the command line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlantOverrides {
    pub flow_rate_lps: Option<f64>,
    pub head_m: Option<f64>,
    pub loss_percent: Option<f64>,
    pub piezometric_head_m: Option<f64>,
    pub efficiency: Option<f64>,
}

impl PlantOverrides {
    /// Writes every present override into `plant`.
    pub fn apply(&self, plant: &mut PlantConfig) {
        if let Some(v) = self.flow_rate_lps {
            plant.flow_rate_lps = v;
        }
        if let Some(v) = self.head_m {
            plant.head_m = v;
        }
        if let Some(v) = self.loss_percent {
            plant.loss_percent = v;
        }
        if let Some(v) = self.piezometric_head_m {
            plant.piezometric_head_m = v;
        }
        if let Some(v) = self.efficiency {
            plant.efficiency = v;
        }
    }
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub overrides: PlantOverrides,
    pub curve_out: Option<PathBuf>,
    pub report_out: Option<PathBuf>,
    pub ask: Option<String>,
    pub serve: bool,
    pub port: u16,
    pub tui: bool,
    pub help: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

/// Parses arguments (without the program name).
///
/// # Errors
///
/// Returns a message naming the offending argument.
pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions {
        scenario: None,
        preset: None,
        overrides: PlantOverrides::default(),
        curve_out: None,
        report_out: None,
        ask: None,
        serve: false,
        port: DEFAULT_PORT,
        tui: false,
        help: false,
    };

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --scenario (expected a TOML file path)")?;
                if opts.scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--flow" | "--head" | "--loss" | "--piezometric" | "--efficiency" => {
                i += 1;
                let raw = args.next_or_err(i, &format!("missing value for {flag} (expected a number)"))?;
                let value = raw
                    .parse::<f64>()
                    .map_err(|_| format!("invalid value for {flag}: expected a number, got \"{raw}\""))?;
                let slot = match flag {
                    "--flow" => &mut opts.overrides.flow_rate_lps,
                    "--head" => &mut opts.overrides.head_m,
                    "--loss" => &mut opts.overrides.loss_percent,
                    "--piezometric" => &mut opts.overrides.piezometric_head_m,
                    _ => &mut opts.overrides.efficiency,
                };
                if slot.replace(value).is_some() {
                    return Err(format!("{flag} provided more than once"));
                }
            }
            "--curve-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --curve-out (expected a file path)")?;
                opts.curve_out = Some(PathBuf::from(path));
            }
            "--report-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --report-out (expected a file path)")?;
                opts.report_out = Some(PathBuf::from(path));
            }
            "--ask" => {
                i += 1;
                let question = args.next_or_err(i, "missing value for --ask (expected a question)")?;
                opts.ask = Some(question.to_string());
            }
            "--serve" => opts.serve = true,
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                opts.port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            "--tui" => opts.tui = true,
            "--help" | "-h" => opts.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.scenario.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }
    if opts.serve && opts.tui {
        return Err("arguments `--serve` and `--tui` are mutually exclusive".to_string());
    }

    if opts.scenario.is_none() && opts.preset.is_none() {
        opts.preset = Some("default".to_string());
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("hydrogpt: hydroelectric power estimator with assistant and report export");
    eprintln!();
    eprintln!("Usage: hydrogpt [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (default, mountain_intake, aqueduct)");
    eprintln!("  --flow <l/s>             Override average flow rate");
    eprintln!("  --head <m>               Override available hydraulic head");
    eprintln!("  --loss <%>               Override network loss percentage (0-100)");
    eprintln!("  --piezometric <m>        Override current piezometric head");
    eprintln!("  --efficiency <0..1>      Override turbine efficiency");
    eprintln!("  --curve-out <path>       Export the head/power curve to CSV");
    eprintln!("  --report-out <path>      Write the report (PDF, or text for .txt)");
    eprintln!("  --ask <question>         Ask the assistant (requires `assistant` feature)");
    eprintln!("  --serve                  Start REST API server (requires `api` feature)");
    eprintln!("  --port <u16>             API server port (default: {DEFAULT_PORT})");
    eprintln!("  --tui                    Open the dashboard (requires `tui` feature)");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the default preset is used.");
}
