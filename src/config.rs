//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::hydro::constants::{
    DEFAULT_EFFICIENCY, DEFAULT_FLOW_RATE_LPS, DEFAULT_HEAD_M, DEFAULT_LOSS_PERCENT,
    DEFAULT_PIEZOMETRIC_HEAD_M, REFERENCE_HEAD_END_M, REFERENCE_HEAD_START_M,
    REFERENCE_HEAD_STEP_M,
};
use crate::hydro::{HeadRange, ParameterError, PlantParameters};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the `default` preset. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::default_preset`] for the built-in values.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Hydraulic plant inputs.
    #[serde(default)]
    pub plant: PlantConfig,
    /// Head range swept for the power curve.
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Chat-completion service settings.
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// Report export settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Hydraulic plant inputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlantConfig {
    /// Average flow rate (l/s, >= 0).
    pub flow_rate_lps: f64,
    /// Available gross head (m, >= 0).
    pub head_m: f64,
    /// Network loss (%, 0 to 100).
    pub loss_percent: f64,
    /// Current piezometric head (m, >= 0).
    pub piezometric_head_m: f64,
    /// Turbine/system efficiency (0 < eta <= 1).
    pub efficiency: f64,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            flow_rate_lps: DEFAULT_FLOW_RATE_LPS,
            head_m: DEFAULT_HEAD_M,
            loss_percent: DEFAULT_LOSS_PERCENT,
            piezometric_head_m: DEFAULT_PIEZOMETRIC_HEAD_M,
            efficiency: DEFAULT_EFFICIENCY,
        }
    }
}

impl PlantConfig {
    /// Validates the section into [`PlantParameters`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ParameterError`] encountered.
    pub fn to_parameters(&self) -> Result<PlantParameters, ParameterError> {
        PlantParameters::new(
            self.flow_rate_lps,
            self.head_m,
            self.loss_percent,
            self.efficiency,
        )?
        .with_piezometric_head(self.piezometric_head_m)
    }
}

/// Head range swept for the power curve.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// First head (m).
    pub start_m: f64,
    /// Last head, inclusive (m).
    pub end_m: f64,
    /// Spacing between heads (m).
    pub step_m: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start_m: REFERENCE_HEAD_START_M,
            end_m: REFERENCE_HEAD_END_M,
            step_m: REFERENCE_HEAD_STEP_M,
        }
    }
}

impl SweepConfig {
    /// Validates the section into a [`HeadRange`].
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::InvalidHeadRange`] for an unusable range.
    pub fn to_head_range(&self) -> Result<HeadRange, ParameterError> {
        HeadRange::new(self.start_m, self.end_m, self.step_m)
    }
}

/// Chat-completion service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssistantConfig {
    /// Model identifier sent with every request.
    pub model: String,
    /// Chat-completions endpoint URL.
    pub endpoint: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Language the assistant is asked to answer in.
    pub response_language: String,
    /// Request timeout (seconds, > 0).
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            response_language: "Italian".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Report export settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Default report path when `--report-out` is given without a scenario override.
    pub output: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(crate::report::PDF_FILE_NAME),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"plant.loss_percent"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn from_parameter(section: &str, err: &ParameterError) -> Self {
        Self {
            field: format!("{section}.{}", err.field()),
            message: err.to_string(),
        }
    }
}

impl ScenarioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "mountain_intake", "aqueduct"];

    /// Returns the default scenario (the dashboard's opening sidebar values).
    pub fn default_preset() -> Self {
        Self {
            plant: PlantConfig::default(),
            sweep: SweepConfig::default(),
            assistant: AssistantConfig::default(),
            report: ReportConfig::default(),
        }
    }

    /// Returns the mountain-intake preset: low flow, high head, short penstock.
    pub fn mountain_intake() -> Self {
        Self {
            plant: PlantConfig {
                flow_rate_lps: 20.0,
                head_m: 140.0,
                loss_percent: 8.0,
                piezometric_head_m: 210.0,
                ..PlantConfig::default()
            },
            sweep: SweepConfig {
                start_m: 20.0,
                end_m: 200.0,
                step_m: 20.0,
            },
            ..Self::default_preset()
        }
    }

    /// Returns the aqueduct preset: high flow, low head, leaky network.
    pub fn aqueduct() -> Self {
        Self {
            plant: PlantConfig {
                flow_rate_lps: 120.0,
                head_m: 35.0,
                loss_percent: 25.0,
                piezometric_head_m: 60.0,
                efficiency: 0.65,
            },
            sweep: SweepConfig {
                start_m: 5.0,
                end_m: 60.0,
                step_m: 5.0,
            },
            ..Self::default_preset()
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default_preset()),
            "mountain_intake" => Ok(Self::mountain_intake()),
            "aqueduct" => Ok(Self::aqueduct()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // Check plant fields one by one so every offending field is reported,
        // not just the first one `PlantParameters::new` trips on.
        let p = &self.plant;
        let plant_checks = [
            PlantParameters::new(p.flow_rate_lps, 0.0, 0.0, DEFAULT_EFFICIENCY),
            PlantParameters::new(0.0, p.head_m, 0.0, DEFAULT_EFFICIENCY),
            PlantParameters::new(0.0, 0.0, p.loss_percent, DEFAULT_EFFICIENCY),
            PlantParameters::new(0.0, 0.0, 0.0, p.efficiency),
            PlantParameters::default().with_piezometric_head(p.piezometric_head_m),
        ];
        for check in plant_checks {
            if let Err(e) = check {
                errors.push(ConfigError::from_parameter("plant", &e));
            }
        }

        if let Err(e) = self.sweep.to_head_range() {
            errors.push(ConfigError::from_parameter("sweep", &e));
        }

        let a = &self.assistant;
        if a.model.trim().is_empty() {
            errors.push(ConfigError {
                field: "assistant.model".into(),
                message: "must not be empty".into(),
            });
        }
        if !(a.endpoint.starts_with("https://") || a.endpoint.starts_with("http://")) {
            errors.push(ConfigError {
                field: "assistant.endpoint".into(),
                message: format!("must be an http(s) URL, got \"{}\"", a.endpoint),
            });
        }
        if a.api_key_env.trim().is_empty() {
            errors.push(ConfigError {
                field: "assistant.api_key_env".into(),
                message: "must not be empty".into(),
            });
        }
        if a.timeout_secs == 0 {
            errors.push(ConfigError {
                field: "assistant.timeout_secs".into(),
                message: "must be > 0".into(),
            });
        }

        if self.report.output.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "report.output".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }
}
