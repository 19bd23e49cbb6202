use std::path::{Path, PathBuf};

use crate::model::params::HostVirusParams;

/// Directory simulations are saved to unless told otherwise.
pub const DEFAULT_OUTPUT_DIR: &str = "Simulations";

/// File stem describing a run, e.g. `alpha0.5_alphas_2.0_80000s_x1`.
pub fn file_stem(params: &HostVirusParams, end: f64, delta: f64, component: &str) -> String {
    let steps = (end / delta).round();
    format!(
        "alpha{:?}_alphas_{:?}_{}s_{}",
        params.alpha, params.alpha_s, steps, component
    )
}

/// `<dir>/<name>.csv`
pub fn simulation_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    dir.as_ref().join(format!("{name}.csv"))
}
