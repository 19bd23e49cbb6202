use std::time::Instant;

use hostvirus::model::params::HostVirusParams;
use hostvirus::model::solver::{system_solver, RunConfig};
use hostvirus::ParameterSweep;

fn main() -> anyhow::Result<()> {
    let base = RunConfig::reference(HostVirusParams::reference());
    let values: Vec<f64> = (1..=8).map(|i| 0.25 * i as f64).collect();

    // Sequential: one run per value
    let t_start = Instant::now();
    for &v in &values {
        let cfg = RunConfig {
            params: base.params.with("alpha", v)?,
            ..base.clone()
        };
        let _traj = system_solver(&cfg)?;
    }
    let dur1 = t_start.elapsed();

    // Parallel sweep over the same values
    let sweep = ParameterSweep::new(base, "alpha", values);
    let t_start2 = Instant::now();
    let _runs = sweep.run()?;
    let dur2 = t_start2.elapsed();

    println!("sequential_ms,parallel_ms,speedup_x");
    let s_ms = dur1.as_secs_f64() * 1000.0;
    let p_ms = dur2.as_secs_f64() * 1000.0;
    println!("{:.3},{:.3},{:.2}", s_ms, p_ms, s_ms.max(1e-9) / p_ms.max(1e-9));

    Ok(())
}
