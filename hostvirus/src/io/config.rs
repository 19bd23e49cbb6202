use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::model::host_virus::Variant;
use crate::model::params::HostVirusParams;
use crate::model::solver::{RunConfig, REFERENCE_INITIAL_STATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

fn format_of(path: &Path) -> anyhow::Result<Format> {
    match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) {
        Some(e) if e == "toml" => Ok(Format::Toml),
        Some(e) if e == "json" => Ok(Format::Json),
        _ => anyhow::bail!("unsupported config format (expected .toml or .json): {:?}", path),
    }
}

/// Parse a flat `name = value` table of coefficients.
pub fn parse_params(text: &str, is_json: bool) -> anyhow::Result<HostVirusParams> {
    let map: BTreeMap<String, f64> = if is_json {
        serde_json::from_str(text).context("parse parameter JSON failed")?
    } else {
        toml::from_str(text).context("parse parameter TOML failed")?
    };
    params_from_table(&map)
}

/// Load a parameter set from a `.toml` or `.json` file. All fourteen coefficients must be present.
pub fn load_params(path: impl AsRef<Path>) -> anyhow::Result<HostVirusParams> {
    let path = path.as_ref();
    let fmt = format_of(path)?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file: {:?}", path))?;
    parse_params(&text, fmt == Format::Json).with_context(|| format!("invalid parameter file {:?}", path))
}

fn params_from_table(map: &BTreeMap<String, f64>) -> anyhow::Result<HostVirusParams> {
    Ok(HostVirusParams::from_map(map.iter().map(|(k, v)| (k.as_str(), *v)))?)
}

/// A run described in a TOML file.
///
/// ```toml
/// end_time = 500.0
/// delta = 0.1
/// immune = false
///
/// [parameters]
/// alpha = 0.5
/// # ... all fourteen coefficients
/// ```
///
/// Time settings and the initial state fall back to the reference run; the
/// `[parameters]` table is required. An immune run without an explicit initial
/// state starts with `c = 0`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSpec {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub delta: Option<f64>,
    pub initial_state: Option<Vec<f64>>,
    #[serde(default)]
    pub immune: bool,
    #[serde(default)]
    pub verbose: bool,
    pub max_steps: Option<usize>,
    pub parameters: BTreeMap<String, f64>,
}

impl RunSpec {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("parse run spec TOML failed")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read run spec: {:?}", path))?;
        Self::from_toml_str(&text).with_context(|| format!("invalid run spec {:?}", path))
    }

    pub fn into_run_config(self) -> anyhow::Result<RunConfig> {
        let params = params_from_table(&self.parameters)?;
        let variant = Variant::from_immune_flag(self.immune);
        let reference = RunConfig::reference(params);

        let initial_state = match self.initial_state {
            Some(s) => s,
            None => {
                let mut s = REFERENCE_INITIAL_STATE.to_vec();
                s.resize(variant.dimension(), 0.0);
                s
            }
        };

        let cfg = RunConfig {
            start_time: self.start_time.unwrap_or(reference.start_time),
            end_time: self.end_time.unwrap_or(reference.end_time),
            delta: self.delta.unwrap_or(reference.delta),
            initial_state,
            params,
            variant,
            verbose: self.verbose,
            max_steps: self.max_steps,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
