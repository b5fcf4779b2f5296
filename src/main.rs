//! HydroGPT entry point: CLI wiring and config-driven estimation.

use std::process;

use tracing::info;

use hydrogpt::assistant::Conversation;
use hydrogpt::cli::{self, CliOptions};
use hydrogpt::config::ScenarioConfig;
use hydrogpt::hydro::{HeadRange, PlantParameters, PowerEstimate, SweepResult};
use hydrogpt::io::export::export_curve_csv;
use hydrogpt::report::{Report, renderer_for_path, write_report};
use hydrogpt::telemetry::{DEFAULT_FILTER, QUIET_FILTER, init_tracing};

fn main() {
    let cli = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };
    if cli.help {
        cli::print_usage();
        return;
    }

    init_tracing(if cli.tui { QUIET_FILTER } else { DEFAULT_FILTER });
    reject_disabled_features(&cli);

    let scenario = load_scenario(&cli);
    let (plant, range) = build_plant(&scenario);
    let estimate = plant.estimate();
    let curve = plant.efficiency_curve(&range);
    info!(
        power_kw = estimate.power_kw,
        effective_head_m = estimate.effective_head_m,
        curve_points = curve.len(),
        "estimate computed"
    );

    print_summary(&plant, &estimate, &curve);

    if let Some(ref path) = cli.curve_out {
        if let Err(e) = export_curve_csv(&curve, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Curve written to {}", path.display());
    }

    #[cfg_attr(not(feature = "assistant"), expect(unused_mut))]
    let mut conversation = Conversation::new();

    #[cfg(feature = "assistant")]
    if let Some(ref question) = cli.ask {
        ask_once(&scenario, &plant, &estimate, &mut conversation, question);
    }

    if let Some(ref path) = cli.report_out {
        let report = Report::new(&plant, &estimate, &conversation);
        let renderer = renderer_for_path(path);
        if let Err(e) = write_report(renderer.as_ref(), &report, path) {
            eprintln!("error: {e}");
            process::exit(1);
        }
        eprintln!("Report written to {}", path.display());
    }

    #[cfg(feature = "api")]
    if cli.serve {
        serve(plant, estimate, range, curve, conversation, cli.port);
        return;
    }

    #[cfg(feature = "tui")]
    if cli.tui {
        let client = chat_client(&scenario.assistant);
        if let Err(e) = hydrogpt::tui::run(scenario, client, conversation) {
            eprintln!("error: TUI crashed: {e}");
            process::exit(1);
        }
    }
}

/// Exits when a flag needs a feature this binary was built without.
fn reject_disabled_features(cli: &CliOptions) {
    let missing = [
        (cli.ask.is_some() && !cfg!(feature = "assistant"), "--ask", "assistant"),
        (cli.serve && !cfg!(feature = "api"), "--serve", "api"),
        (cli.tui && !cfg!(feature = "tui"), "--tui", "tui"),
    ];
    for (hit, flag, feature) in missing {
        if hit {
            eprintln!("error: {flag} requires building with `--features {feature}`");
            process::exit(1);
        }
    }
}

/// Loads config (`--scenario` or `--preset`), applies overrides and validates.
fn load_scenario(cli: &CliOptions) -> ScenarioConfig {
    let loaded = match (&cli.scenario, &cli.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path),
        (None, Some(name)) => ScenarioConfig::from_preset(name),
        (None, None) => Ok(ScenarioConfig::default_preset()),
    };
    let mut scenario = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    cli.overrides.apply(&mut scenario.plant);

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    scenario
}

fn build_plant(scenario: &ScenarioConfig) -> (PlantParameters, HeadRange) {
    let plant = scenario.plant.to_parameters().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });
    let range = scenario.sweep.to_head_range().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });
    (plant, range)
}

fn print_summary(plant: &PlantParameters, estimate: &PowerEstimate, curve: &SweepResult) {
    println!("Plant:     {plant}");
    println!("Estimate:  {estimate}");
    println!();
    println!("{:>10}  {:>12}", "head (m)", "power (kW)");
    for p in curve {
        println!("{:>10.2}  {:>12.5}", p.head_m, p.power_kw);
    }
}

#[cfg(feature = "assistant")]
fn ask_once(
    scenario: &ScenarioConfig,
    plant: &PlantParameters,
    estimate: &PowerEstimate,
    conversation: &mut Conversation,
    question: &str,
) {
    use hydrogpt::assistant::{OpenAiClient, technical_brief};
    use tracing::error;

    let client = match OpenAiClient::from_config(&scenario.assistant) {
        Ok(c) => c,
        Err(e) => {
            error!("assistant unavailable: {e}");
            return;
        }
    };
    let brief = technical_brief(plant, estimate, &scenario.assistant.response_language);
    match conversation.ask(&client, &brief, question) {
        Ok(exchange) => {
            println!();
            println!("You: {}", exchange.question);
            println!("HydroGPT: {}", exchange.reply);
        }
        Err(e) => error!("assistant request failed: {e}"),
    }
}

#[cfg(feature = "tui")]
fn chat_client(
    _cfg: &hydrogpt::config::AssistantConfig,
) -> Option<Box<dyn hydrogpt::assistant::ChatClient>> {
    #[cfg(feature = "assistant")]
    match hydrogpt::assistant::OpenAiClient::from_config(_cfg) {
        Ok(client) => return Some(Box::new(client)),
        Err(e) => tracing::warn!("assistant disabled in dashboard: {e}"),
    }
    None
}

#[cfg(feature = "api")]
fn serve(
    plant: PlantParameters,
    estimate: PowerEstimate,
    range: HeadRange,
    curve: SweepResult,
    conversation: Conversation,
    port: u16,
) {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(hydrogpt::api::AppState {
        plant,
        estimate,
        head_range: range,
        curve,
        conversation,
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });
    if let Err(e) = rt.block_on(hydrogpt::api::serve(state, addr)) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
