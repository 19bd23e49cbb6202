use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::SimResult;
use crate::io::naming::{simulation_path, DEFAULT_OUTPUT_DIR};
use crate::io::trajectory_csv::write_trajectory_csv;
use crate::model::params::HostVirusParams;
use crate::model::solver::{system_solver, RunConfig};
use crate::model::trajectory::Trajectory;

/// Named set of three columns plotted together, with display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentGroup {
    pub components: [&'static str; 3],
    pub labels: [&'static str; 3],
}

pub const SPECIALIST_CELLS: ComponentGroup = ComponentGroup {
    components: ["x1", "y1", "ys1"],
    labels: ["Susceptible Cells", "Infected Cells", "Infected Specialist Cells"],
};

pub const GENERAL_CELLS: ComponentGroup = ComponentGroup {
    components: ["x1", "x2", "y2"],
    labels: [
        "Susceptible Specialist Cells",
        "Susceptible General Cells",
        "Infected General Cells",
    ],
};

/// Runs one configured simulation, keeps its trajectory and saves it on request.
#[derive(Debug, Clone)]
pub struct ModelRunner {
    pub config: RunConfig,
    pub output_dir: PathBuf,
    sim: Option<Trajectory>,
}

impl ModelRunner {
    /// Reference run settings with the given coefficients.
    pub fn new(params: HostVirusParams) -> Self {
        Self::from_config(RunConfig::reference(params))
    }

    pub fn from_config(config: RunConfig) -> Self {
        Self {
            config,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sim: None,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.sim.as_ref()
    }

    pub fn into_trajectory(self) -> Option<Trajectory> {
        self.sim
    }

    /// Integrate and keep the result, replacing any previous run.
    pub fn run(&mut self, verbose: bool) -> SimResult<&Trajectory> {
        let traj = self.integrate(verbose)?;
        Ok(&*self.sim.insert(traj))
    }

    /// Integrate, then try to save as `<output_dir>/<name>.csv`. A failed save is
    /// logged and does not affect the returned trajectory.
    pub fn run_and_save(&mut self, verbose: bool, name: &str) -> SimResult<&Trajectory> {
        let traj = self.integrate(verbose)?;
        save_to(&self.output_dir, name, Some(&traj));
        Ok(&*self.sim.insert(traj))
    }

    /// Save the last run as `<output_dir>/<name>.csv`. Returns the written path,
    /// or `None` (with a warning) if there is nothing to save or the write fails.
    pub fn save(&self, name: &str) -> Option<PathBuf> {
        save_to(&self.output_dir, name, self.sim.as_ref())
    }

    fn integrate(&self, verbose: bool) -> SimResult<Trajectory> {
        let cfg = RunConfig {
            verbose,
            ..self.config.clone()
        };
        system_solver(&cfg)
    }
}

fn save_to(dir: &Path, name: &str, sim: Option<&Trajectory>) -> Option<PathBuf> {
    let Some(traj) = sim else {
        warn!("Simulation results do not exist; nothing saved for '{name}'");
        return None;
    };
    let path = simulation_path(dir, name);
    match write_trajectory_csv(&path, traj) {
        Ok(p) => {
            info!("Model results saved to file: {}", p.display());
            Some(p)
        }
        Err(e) => {
            warn!("failed to save model results to {}: {e:#}", path.display());
            None
        }
    }
}
