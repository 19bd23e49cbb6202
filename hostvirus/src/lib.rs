//! Fixed-step RK4 simulation of a nondimensionalised host-virus population model.
//!
//! The model tracks susceptible specialist/general host cells (`x1`, `x2`),
//! infected cells (`ys1`, `y1`, `y2`) and two viral loads (`zs`, `z`). The
//! immune variant carries an extra component `c`.

pub mod error;
pub mod io;
pub mod math;
pub mod model;
pub mod runner;
pub mod sweep;

pub use error::{SimError, SimResult};
pub use math::ode::{runge_kutta_step, OdeSystem};
pub use model::host_virus::{host_virus, HostVirusModel, Variant};
pub use model::params::HostVirusParams;
pub use model::solver::{system_solver, RunConfig};
pub use model::trajectory::Trajectory;
pub use runner::ModelRunner;
pub use sweep::ParameterSweep;
