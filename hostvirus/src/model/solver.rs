use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::math::linalg::first_non_finite;
use crate::math::ode::{rk4_step_ws, OdeSystem, Rk4Workspace};
use crate::model::host_virus::{HostVirusModel, Variant};
use crate::model::params::HostVirusParams;
use crate::model::trajectory::Trajectory;

/// Initial state `[x1, x2, ys1, y1, y2, zs, z]` used by the reference runs.
pub const REFERENCE_INITIAL_STATE: [f64; 7] = [1.0, 0.05, 0.0, 0.0, 0.0, 0.01, 0.5];

/// Everything one simulation run needs. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub start_time: f64,
    pub end_time: f64,
    pub delta: f64,
    pub initial_state: Vec<f64>,
    pub params: HostVirusParams,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub verbose: bool,
    /// Refuse runs needing more steps than this.
    #[serde(default)]
    pub max_steps: Option<usize>,
}

impl RunConfig {
    /// Reference run: start 0, reference initial state, step 0.1, end 8000, base variant.
    pub fn reference(params: HostVirusParams) -> Self {
        Self {
            start_time: 0.0,
            end_time: 8000.0,
            delta: 0.1,
            initial_state: REFERENCE_INITIAL_STATE.to_vec(),
            params,
            variant: Variant::Base,
            verbose: false,
            max_steps: None,
        }
    }

    /// Build from a combined initial-condition vector `[t0, x1, x2, ..., z(, c)]`.
    pub fn from_initial_conditions(
        initial_conditions: &[f64],
        end_time: f64,
        delta: f64,
        params: HostVirusParams,
        verbose: bool,
        variant: Variant,
    ) -> SimResult<Self> {
        let (&start_time, state) =
            initial_conditions
                .split_first()
                .ok_or(SimError::DimensionMismatch {
                    variant: variant.name(),
                    expected: variant.dimension() + 1,
                    found: 0,
                })?;
        Ok(Self {
            start_time,
            end_time,
            delta,
            initial_state: state.to_vec(),
            params,
            variant,
            verbose,
            max_steps: None,
        })
    }

    /// Check the configuration without integrating. Returns the number of steps.
    pub fn validate(&self) -> SimResult<usize> {
        let expected = self.variant.dimension();
        if self.initial_state.len() != expected {
            return Err(SimError::DimensionMismatch {
                variant: self.variant.name(),
                expected,
                found: self.initial_state.len(),
            });
        }
        let n = step_count(self.start_time, self.end_time, self.delta)?;
        if let Some(budget) = self.max_steps {
            if n > budget {
                return Err(SimError::StepBudgetExceeded { required: n, budget });
            }
        }
        Ok(n)
    }
}

/// Time of grid point `i`.
pub fn grid_time(start: f64, i: usize, delta: f64) -> f64 {
    start + i as f64 * delta
}

/// Number of grid points `t0 + i*delta`, `i >= 1`, up to `end`.
///
/// This is `floor((end - start) / delta)`, corrected so that the last grid time
/// never exceeds `end` by more than a few ulps of the span. A grid point that
/// misses `end` only by rounding (0.1 * 3 vs 0.3) is kept.
pub fn step_count(start: f64, end: f64, delta: f64) -> SimResult<usize> {
    if !(delta.is_finite() && delta > 0.0) {
        return Err(SimError::InvalidStep(delta));
    }
    if !(start.is_finite() && end.is_finite()) || end < start {
        return Err(SimError::InvalidTimeSpan { start, end });
    }
    let raw = ((end - start) / delta).floor();
    if raw >= usize::MAX as f64 {
        return Err(SimError::InvalidTimeSpan { start, end });
    }

    let tol = 4.0 * f64::EPSILON * start.abs().max(end.abs()).max(delta);
    let on_grid = |i: usize| grid_time(start, i, delta) <= end + tol;

    // The floored quotient is off by at most one in either direction.
    let mut n = raw as usize;
    for _ in 0..2 {
        if n > 0 && !on_grid(n) {
            n -= 1;
        }
    }
    // Past 2^53 neighbouring indices share a float and the grid is not resolvable.
    if (n + 1) as f64 > n as f64 && on_grid(n + 1) {
        n += 1;
    }
    Ok(n)
}

/// Percentage to report after step `i` of `total`, if it lands on a 5% mark.
///
/// The percentage is rounded to two decimals and tested with a float modulo,
/// so some step counts never hit an exact mark. Progress output is best-effort.
pub fn progress_checkpoint(i: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let pct = (100.0 * i as f64 / total as f64 * 100.0).round() / 100.0;
    if pct % 5.0 == 0.0 {
        Some(pct)
    } else {
        None
    }
}

/// Integrate `sys` with fixed-step RK4 on the grid `start + i*delta`.
///
/// Each step advances the previous row's state and is evaluated with the new
/// grid time as its stage origin. Fails on the first non-finite state.
pub fn integrate_fixed<S: OdeSystem + ?Sized>(
    sys: &S,
    start: f64,
    y0: &[f64],
    delta: f64,
    n_steps: usize,
    verbose: bool,
) -> SimResult<Trajectory> {
    let dim = sys.dimension();
    if y0.len() != dim {
        return Err(SimError::DimensionMismatch {
            variant: "ode",
            expected: dim,
            found: y0.len(),
        });
    }
    if let Some(c) = first_non_finite(y0) {
        return Err(SimError::NonFinite { step: 0, time: start, component: c });
    }

    let mut traj = Trajectory::with_capacity(dim, n_steps.saturating_add(1));
    traj.push(start, y0);

    let mut y = y0.to_vec();
    let mut ws = Rk4Workspace::new(dim);
    for i in 1..=n_steps {
        let t = grid_time(start, i, delta);
        rk4_step_ws(&mut y, t, delta, &mut ws, |tt, yy, dy| sys.deriv(tt, yy, dy));
        if let Some(c) = first_non_finite(&y) {
            return Err(SimError::NonFinite { step: i, time: t, component: c });
        }
        traj.push(t, &y);

        if verbose {
            if let Some(pct) = progress_checkpoint(i - 1, n_steps) {
                info!("Simulation {pct}% complete");
            }
        }
    }
    Ok(traj)
}

/// Run the host-virus model described by `cfg` and return its trajectory.
pub fn system_solver(cfg: &RunConfig) -> SimResult<Trajectory> {
    let n = cfg.validate()?;
    let model = HostVirusModel::new(cfg.params, cfg.variant);

    info!("Simulation beginning for {n} time steps.");
    info!("Number of dimensions: {}", model.dimension());
    debug!(
        "variant={} start={} end={} delta={}",
        cfg.variant.name(),
        cfg.start_time,
        cfg.end_time,
        cfg.delta
    );

    let traj = integrate_fixed(&model, cfg.start_time, &cfg.initial_state, cfg.delta, n, cfg.verbose)?;

    info!("Simulation complete!");
    Ok(traj)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_count_is_floor_of_span() {
        assert_eq!(step_count(0.0, 100.0, 0.1).unwrap(), 1000);
        assert_eq!(step_count(0.0, 0.3, 0.1).unwrap(), 3);
        assert_eq!(step_count(0.0, 1.05, 0.5).unwrap(), 2);
        assert_eq!(step_count(2.0, 2.0, 0.5).unwrap(), 0);
        assert_eq!(step_count(0.0, 1.0, 0.0), Err(SimError::InvalidStep(0.0)));
        assert!(matches!(step_count(1.0, 0.0, 0.1), Err(SimError::InvalidTimeSpan { .. })));
        assert!(matches!(step_count(0.0, f64::NAN, 0.1), Err(SimError::InvalidTimeSpan { .. })));
    }

    #[test]
    fn end_just_below_a_grid_point_is_not_rounded_up() {
        let n = step_count(0.0, 0.99999999999, 0.1).unwrap();
        assert_eq!(n, 9);
        assert!(grid_time(0.0, n, 0.1) <= 0.99999999999);
        assert_eq!(step_count(0.0, 1.0e9 + 0.5, 1.0).unwrap(), 1_000_000_000);
        assert_eq!(step_count(0.0, 1.0e18, 1.0).unwrap(), 1_000_000_000_000_000_000);
        assert_eq!(step_count(0.0, 8000.0, 0.1).unwrap(), 80_000);
        assert_eq!(step_count(5.0, 5.3, 0.1).unwrap(), 3);
    }

    #[test]
    fn huge_span_is_refused_by_budget_without_allocating() {
        let mut cfg = RunConfig::reference(HostVirusParams::reference());
        cfg.end_time = 1.0e18;
        cfg.delta = 1.0;
        cfg.max_steps = Some(1_000);
        assert_eq!(
            system_solver(&cfg).unwrap_err(),
            SimError::StepBudgetExceeded { required: 1_000_000_000_000_000_000, budget: 1_000 }
        );
    }

    #[test]
    fn progress_hits_round_marks() {
        assert_eq!(progress_checkpoint(0, 100), Some(0.0));
        assert_eq!(progress_checkpoint(5, 100), Some(5.0));
        assert_eq!(progress_checkpoint(6, 100), None);
        assert_eq!(progress_checkpoint(50, 1000), Some(5.0));
        assert_eq!(progress_checkpoint(3, 0), None);
    }

    #[test]
    fn budget_is_checked_before_running() {
        let mut cfg = RunConfig::reference(HostVirusParams::reference());
        cfg.max_steps = Some(10);
        assert_eq!(
            cfg.validate(),
            Err(SimError::StepBudgetExceeded { required: 80_000, budget: 10 })
        );
    }

    #[test]
    fn combined_initial_conditions_split_off_time() {
        let ic = [2.0, 1.0, 0.05, 0.0, 0.0, 0.0, 0.01, 0.5];
        let cfg = RunConfig::from_initial_conditions(
            &ic,
            3.0,
            0.5,
            HostVirusParams::reference(),
            false,
            Variant::Base,
        )
        .unwrap();
        assert_eq!(cfg.start_time, 2.0);
        assert_eq!(cfg.initial_state, REFERENCE_INITIAL_STATE.to_vec());
        assert_eq!(cfg.validate().unwrap(), 2);
    }
}
