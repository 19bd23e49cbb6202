use hostvirus::model::params::HostVirusParams;
use hostvirus::runner::{GENERAL_CELLS, SPECIALIST_CELLS};
use hostvirus::ModelRunner;

fn main() -> anyhow::Result<()> {
    // Reference settings: t in [0, 8000], dt = 0.1, x1 = 1, x2 = 0.05, zs = 0.01, z = 0.5
    let mut runner = ModelRunner::new(HostVirusParams::reference());
    let traj = runner.run(false)?;

    // Print every 1000th step (every 100 time units)
    let mut header = vec!["Time"];
    header.extend(SPECIALIST_CELLS.components);
    header.extend(&GENERAL_CELLS.components[1..]);
    println!("{}", header.join(","));

    let cols = traj
        .components(&header)
        .ok_or_else(|| anyhow::anyhow!("unknown column in {:?}", header))?;
    for idx in (0..traj.len()).step_by(1000) {
        let row: Vec<String> = cols.iter().map(|c| format!("{:.6}", c[idx])).collect();
        println!("{}", row.join(","));
    }

    Ok(())
}
