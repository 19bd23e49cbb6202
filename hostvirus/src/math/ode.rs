use crate::math::linalg::axpy_into;

/// Right-hand side of an autonomous or time-dependent ODE system dy/dt = f(t, y).
pub trait OdeSystem {
    /// Length of the state vector this system operates on.
    fn dimension(&self) -> usize;

    /// Write f(t, y) into `dy`. `y` and `dy` both have length `dimension()`.
    fn deriv(&self, t: f64, y: &[f64], dy: &mut [f64]);
}

/// Simple fixed-step RK4 integrator for systems of ODEs.
/// State and derivative are represented as slices of f64 and `y` is advanced in place.
pub fn rk4_step<F>(y: &mut [f64], t: f64, dt: f64, f: F)
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    let mut ws = Rk4Workspace::new(y.len());
    rk4_step_ws(y, t, dt, &mut ws, f);
}

/// Workspace for allocation-free RK4 steps
#[derive(Debug, Clone)]
pub struct Rk4Workspace {
    pub k1: Vec<f64>,
    pub k2: Vec<f64>,
    pub k3: Vec<f64>,
    pub k4: Vec<f64>,
    pub ytmp: Vec<f64>,
}

impl Rk4Workspace {
    pub fn new(n: usize) -> Self {
        Self {
            k1: vec![0.0; n],
            k2: vec![0.0; n],
            k3: vec![0.0; n],
            k4: vec![0.0; n],
            ytmp: vec![0.0; n],
        }
    }

    pub fn resize(&mut self, n: usize) {
        if self.k1.len() != n {
            self.k1.resize(n, 0.0);
            self.k2.resize(n, 0.0);
            self.k3.resize(n, 0.0);
            self.k4.resize(n, 0.0);
            self.ytmp.resize(n, 0.0);
        }
    }
}

/// Fixed-step RK4 using preallocated workspace to avoid allocations per step.
///
/// Stages:
/// ```text
/// k1 = f(t, y)
/// k2 = f(t + dt/2, y + dt/2 * k1)
/// k3 = f(t + dt/2, y + dt/2 * k2)
/// k4 = f(t + dt,   y + dt * k3)
/// y <- y + dt/6 * (k1 + 2 k2 + 2 k3 + k4)
/// ```
pub fn rk4_step_ws<F>(y: &mut [f64], t: f64, dt: f64, ws: &mut Rk4Workspace, mut f: F)
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    let n = y.len();
    ws.resize(n);

    let (k1, k2, k3, k4, ytmp) = (&mut ws.k1, &mut ws.k2, &mut ws.k3, &mut ws.k4, &mut ws.ytmp);

    f(t, y, k1);

    axpy_into(ytmp, y, 0.5 * dt, k1);
    f(t + 0.5 * dt, ytmp, k2);

    axpy_into(ytmp, y, 0.5 * dt, k2);
    f(t + 0.5 * dt, ytmp, k3);

    axpy_into(ytmp, y, dt, k3);
    f(t + dt, ytmp, k4);

    for i in 0..n {
        y[i] += (dt / 6.0) * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
}

/// One classical RK4 step of `sys` from `(t0, r0)`.
///
/// Returns the advanced state only; the caller tracks time. Nothing is retained
/// between calls, so identical inputs give bit-identical outputs.
pub fn runge_kutta_step<S: OdeSystem + ?Sized>(sys: &S, t0: f64, r0: &[f64], delta: f64) -> Vec<f64> {
    let mut r1 = r0.to_vec();
    rk4_step(&mut r1, t0, delta, |t, y, dy| sys.deriv(t, y, dy));
    r1
}
