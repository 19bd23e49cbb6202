use log::info;
use rayon::prelude::*;

use crate::error::SimResult;
use crate::model::solver::{system_solver, RunConfig};
use crate::model::trajectory::Trajectory;

/// Independent runs of one base configuration, varying a single coefficient.
#[derive(Debug, Clone)]
pub struct ParameterSweep {
    pub base: RunConfig,
    pub parameter: String,
    pub values: Vec<f64>,
}

/// Result of one sweep member.
#[derive(Debug, Clone)]
pub struct SweepRun {
    pub value: f64,
    pub trajectory: Trajectory,
}

impl ParameterSweep {
    pub fn new(base: RunConfig, parameter: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            base,
            parameter: parameter.into(),
            values,
        }
    }

    /// One run configuration per value. Fails on an unknown parameter name or
    /// an invalid base configuration before anything is integrated.
    pub fn configs(&self) -> SimResult<Vec<RunConfig>> {
        self.base.validate()?;
        self.values
            .iter()
            .map(|&v| -> SimResult<RunConfig> {
                let params = self.base.params.with(&self.parameter, v)?;
                Ok(RunConfig {
                    params,
                    verbose: false,
                    ..self.base.clone()
                })
            })
            .collect()
    }

    /// Run every member in parallel. Results keep the order of `values`; the
    /// first failing run's error is returned.
    pub fn run(&self) -> SimResult<Vec<SweepRun>> {
        let configs = self.configs()?;
        info!(
            "Sweeping {} over {} values ({} threads)",
            self.parameter,
            configs.len(),
            rayon::current_num_threads()
        );
        configs
            .par_iter()
            .zip(self.values.par_iter())
            .map(|(cfg, &value)| {
                system_solver(cfg).map(|trajectory| SweepRun { value, trajectory })
            })
            .collect()
    }
}

/// One column from every run, paired with the swept value. `None` for an unknown column.
pub fn component_series(runs: &[SweepRun], component: &str) -> Option<Vec<(f64, Vec<f64>)>> {
    runs.iter()
        .map(|r| r.trajectory.column(component).map(|c| (r.value, c)))
        .collect()
}
