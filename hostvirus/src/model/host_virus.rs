use serde::{Deserialize, Serialize};

use crate::math::ode::OdeSystem;
use crate::model::params::HostVirusParams;

/// Labels of the state components, in layout order.
/// Layout: x1 | x2 | ys1 | y1 | y2 | zs | z | c (immune variant only)
pub const STATE_LABELS: [&str; 8] = ["x1", "x2", "ys1", "y1", "y2", "zs", "z", "c"];

/// Number of components that carry dynamics.
pub const CORE_DIM: usize = 7;

/// Which right-hand side a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Base,
    /// Carries an extra immune-response component `c`. `c` has no rate
    /// equation and does not enter the other seven, so it stays at its initial value.
    Immune,
}

impl Variant {
    pub fn from_immune_flag(immune: bool) -> Self {
        if immune {
            Variant::Immune
        } else {
            Variant::Base
        }
    }

    pub fn dimension(self) -> usize {
        match self {
            Variant::Base => CORE_DIM,
            Variant::Immune => CORE_DIM + 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Base => "base",
            Variant::Immune => "immune",
        }
    }
}

/// Host-virus system for one parameter set and variant.
#[derive(Debug, Clone, PartialEq)]
pub struct HostVirusModel {
    pub params: HostVirusParams,
    pub variant: Variant,
}

impl HostVirusModel {
    pub fn new(params: HostVirusParams, variant: Variant) -> Self {
        Self { params, variant }
    }
}

impl OdeSystem for HostVirusModel {
    fn dimension(&self) -> usize {
        self.variant.dimension()
    }

    fn deriv(&self, _t: f64, y: &[f64], dy: &mut [f64]) {
        rates(y, &self.params, dy);
        if self.variant == Variant::Immune {
            dy[CORE_DIM] = 0.0;
        }
    }
}

/// Derivative of the host-virus system at `(t, r)`.
///
/// Returns a vector of the same length as `r`. For an 8-component state the
/// immune slot's rate is zero.
pub fn host_virus(_t: f64, r: &[f64], p: &HostVirusParams) -> Vec<f64> {
    let mut dr = vec![0.0; r.len()];
    rates(r, p, &mut dr);
    dr
}

// Writes the seven core rates into dy[..7]; any trailing components of dy are zeroed.
fn rates(y: &[f64], p: &HostVirusParams, dy: &mut [f64]) {
    assert!(
        y.len() >= CORE_DIM && dy.len() == y.len(),
        "host-virus state must have at least {CORE_DIM} components"
    );

    let (x1, x2, ys1, y1, y2, zs, z) = (y[0], y[1], y[2], y[3], y[4], y[5], y[6]);

    dy[0] = x1 * (1.0 - x1 - x2) - x1 * p.alpha * z - x1 * p.alpha_s * zs;
    dy[1] = x2 * (p.beta_1 - p.beta_2 * (x1 + x2)) - x2 * p.alpha * z;
    dy[2] = p.alpha_s * zs * x1 + p.mu * y1 - p.gamma_1_s * ys1;
    dy[3] = p.alpha * z * x1 - p.mu * y1 - p.gamma_1 * y1;
    dy[4] = p.alpha * z * x2 - p.gamma_2 * y2;
    dy[5] = p.gamma_1_s * ys1 - p.nu_s * p.alpha_s * zs * x1 - p.zeta_s * zs;
    dy[6] = p.kappa_1 * p.gamma_1 * y1 + p.kappa_2 * p.gamma_2 * y2
        - p.nu * p.alpha * z * (x1 + x2)
        - p.zeta * z;

    dy[CORE_DIM..].fill(0.0);
}
