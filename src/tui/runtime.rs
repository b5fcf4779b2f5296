//! Dashboard application state.

use crate::assistant::{ChatClient, Conversation, technical_brief};
use crate::config::ScenarioConfig;
use crate::hydro::{HeadRange, PlantParameters, PowerEstimate, SweepResult};
use crate::report::{Report, renderer_for_path, write_report};

/// Editable plant input shown in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Flow,
    Head,
    Loss,
    Piezometric,
}

impl Field {
    /// Sidebar order.
    pub const ALL: [Self; 4] = [Self::Flow, Self::Head, Self::Loss, Self::Piezometric];

    pub fn label(self) -> &'static str {
        match self {
            Self::Flow => "Average flow rate (l/s)",
            Self::Head => "Available head (m)",
            Self::Loss => "Network losses (%)",
            Self::Piezometric => "Piezometric head (m)",
        }
    }

    /// Increment per key press.
    fn step(self) -> f64 {
        match self {
            Self::Flow | Self::Head | Self::Piezometric => 5.0,
            Self::Loss => 1.0,
        }
    }

    /// Inclusive slider bounds.
    fn bounds(self) -> (f64, f64) {
        match self {
            Self::Flow => (0.0, 10_000.0),
            Self::Head | Self::Piezometric => (0.0, 1_000.0),
            Self::Loss => (0.0, 100.0),
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Flow => 0,
            Self::Head => 1,
            Self::Loss => 2,
            Self::Piezometric => 3,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Keyboard mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Keys edit inputs and trigger actions.
    Normal,
    /// Keys are typed into the question box.
    Input,
}

/// TUI application state.
pub struct App {
    /// Scenario the dashboard was opened with (assistant and report settings).
    scenario: ScenarioConfig,
    /// Current plant inputs.
    pub plant: PlantParameters,
    /// Head range swept for the chart.
    pub range: HeadRange,
    /// Estimate for `plant`.
    pub estimate: PowerEstimate,
    /// Curve for `plant` over `range`.
    pub curve: SweepResult,
    /// Questions and replies so far.
    pub conversation: Conversation,
    /// Sidebar field with focus.
    pub selected: Field,
    pub mode: Mode,
    /// Question being typed.
    pub input: String,
    /// A submitted question is waiting for the next frame to be sent.
    pub pending: bool,
    /// One-line feedback shown in the footer.
    pub status: Option<String>,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// Name of the active preset, or `"custom"` for a scenario file.
    pub preset_name: String,
    /// Plant, range and name the dashboard was opened with, for `reset`.
    opening: (PlantParameters, HeadRange, String),
    client: Option<Box<dyn ChatClient>>,
}

impl App {
    /// Creates an app for a validated scenario.
    pub fn new(scenario: ScenarioConfig, client: Option<Box<dyn ChatClient>>) -> Self {
        let plant = scenario.plant.to_parameters().unwrap_or_default();
        let range = scenario.sweep.to_head_range().unwrap_or_default();
        let mut app = Self {
            scenario,
            plant,
            range,
            estimate: plant.estimate(),
            curve: SweepResult::default(),
            conversation: Conversation::new(),
            selected: Field::Flow,
            mode: Mode::Normal,
            input: String::new(),
            pending: false,
            status: None,
            quit: false,
            preset_name: "custom".to_string(),
            opening: (plant, range, "custom".to_string()),
            client,
        };
        app.recompute();
        app
    }

    /// Continues an earlier conversation, such as a CLI `--ask` exchange.
    pub fn with_conversation(mut self, conversation: Conversation) -> Self {
        self.conversation = conversation;
        self
    }

    /// Creates an app from a preset name, without an assistant.
    pub fn from_preset(name: &str) -> Option<Self> {
        let scenario = ScenarioConfig::from_preset(name).ok()?;
        let mut app = Self::new(scenario, None);
        app.preset_name = name.to_string();
        app.opening.2 = app.preset_name.clone();
        Some(app)
    }

    pub fn has_assistant(&self) -> bool {
        self.client.is_some()
    }

    /// Current value of a sidebar field.
    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::Flow => self.plant.flow_rate_lps(),
            Field::Head => self.plant.head_m(),
            Field::Loss => self.plant.loss_percent(),
            Field::Piezometric => self.plant.piezometric_head_m(),
        }
    }

    pub fn select_next(&mut self) {
        self.selected = self.selected.next();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.prev();
    }

    /// Moves the selected field by `steps` increments, clamped to its bounds.
    pub fn adjust(&mut self, steps: f64) {
        let field = self.selected;
        let (lo, hi) = field.bounds();
        let value = (self.value(field) + steps * field.step()).clamp(lo, hi);

        let p = &self.plant;
        let (mut flow, mut head, mut loss, mut piezo) = (
            p.flow_rate_lps(),
            p.head_m(),
            p.loss_percent(),
            p.piezometric_head_m(),
        );
        match field {
            Field::Flow => flow = value,
            Field::Head => head = value,
            Field::Loss => loss = value,
            Field::Piezometric => piezo = value,
        }
        if let Ok(plant) = PlantParameters::new(flow, head, loss, p.efficiency())
            .and_then(|p| p.with_piezometric_head(piezo))
        {
            self.plant = plant;
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        self.estimate = self.plant.estimate();
        self.curve = self.plant.efficiency_curve(&self.range);
    }

    /// Loads a preset's plant and sweep; the conversation is kept.
    pub fn switch_preset(&mut self, name: &str) {
        let Ok(scenario) = ScenarioConfig::from_preset(name) else {
            return;
        };
        self.plant = scenario.plant.to_parameters().unwrap_or_default();
        self.range = scenario.sweep.to_head_range().unwrap_or_default();
        self.preset_name = name.to_string();
        self.recompute();
    }

    /// Restores the inputs the dashboard was opened with, undoing both
    /// edits and preset switches.
    pub fn reset(&mut self) {
        let (plant, range, ref name) = self.opening;
        self.plant = plant;
        self.range = range;
        self.preset_name = name.clone();
        self.recompute();
    }

    pub fn start_input(&mut self) {
        self.mode = Mode::Input;
    }

    pub fn cancel_input(&mut self) {
        self.mode = Mode::Normal;
        self.input.clear();
    }

    /// Leaves input mode and queues the typed question.
    pub fn queue_question(&mut self) {
        self.mode = Mode::Normal;
        if self.input.trim().is_empty() {
            self.input.clear();
            return;
        }
        self.pending = true;
        self.status = Some("Asking HydroGPT...".to_string());
    }

    /// Sends the queued question; failures land in `status`.
    pub fn submit_question(&mut self) {
        self.pending = false;
        let question = std::mem::take(&mut self.input);
        let Some(client) = self.client.as_deref() else {
            self.status = Some("Assistant not configured".to_string());
            return;
        };
        let brief = technical_brief(
            &self.plant,
            &self.estimate,
            &self.scenario.assistant.response_language,
        );
        self.status = match self.conversation.ask(client, &brief, &question) {
            Ok(_) => None,
            Err(e) => Some(format!("Assistant error: {e}")),
        };
    }

    /// Writes the report to the configured output path.
    pub fn export_report(&mut self) {
        let path = &self.scenario.report.output;
        let report = Report::new(&self.plant, &self.estimate, &self.conversation);
        let renderer = renderer_for_path(path);
        self.status = Some(match write_report(renderer.as_ref(), &report, path) {
            Ok(()) => format!("Report written to {}", path.display()),
            Err(e) => e.to_string(),
        });
    }
}
