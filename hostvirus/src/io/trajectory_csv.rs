use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::model::host_virus::CORE_DIM;
use crate::model::trajectory::{Trajectory, TABLE_COLUMNS};

/// Write the table view of `traj` as CSV: header `Time,x1,x2,ys1,y1,y2,zs,z`,
/// then one row per sample in chronological order.
pub fn write_trajectory<W: std::io::Write>(out: W, traj: &Trajectory) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(TABLE_COLUMNS)?;
    for i in 0..traj.len() {
        let row = traj.table_row(i);
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `traj` to `path`, creating parent directories as needed.
pub fn write_trajectory_csv(path: impl AsRef<Path>, traj: &Trajectory) -> anyhow::Result<PathBuf> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir failed (path={:?})", dir))?;
    }
    let f = std::fs::File::create(path)
        .with_context(|| format!("create trajectory file failed (path={:?})", path))?;
    write_trajectory(std::io::BufWriter::new(f), traj)
        .with_context(|| format!("write trajectory failed (path={:?})", path))?;
    Ok(path.to_path_buf())
}

/// Load a CSV written by [`write_trajectory_csv`] back into a 7-component trajectory.
pub fn read_trajectory_csv(path: impl AsRef<Path>) -> anyhow::Result<Trajectory> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open trajectory CSV: {:?}", path))?;

    let headers = rdr.headers()?.clone();
    anyhow::ensure!(
        headers.iter().eq(TABLE_COLUMNS.iter().copied()),
        "unexpected trajectory header: {:?}",
        headers
    );

    let mut traj = Trajectory::with_capacity(CORE_DIM, 0);
    let mut state = [0.0; CORE_DIM];
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        anyhow::ensure!(
            record.len() == CORE_DIM + 1,
            "row {} has {} fields, expected {}",
            line + 1,
            record.len(),
            CORE_DIM + 1
        );
        let t: f64 = record[0]
            .trim()
            .parse()
            .with_context(|| format!("row {}: bad Time value {:?}", line + 1, &record[0]))?;
        for (j, slot) in state.iter_mut().enumerate() {
            let field = &record[j + 1];
            *slot = field
                .trim()
                .parse()
                .with_context(|| format!("row {}: bad {} value {:?}", line + 1, TABLE_COLUMNS[j + 1], field))?;
        }
        traj.push(t, &state);
    }
    Ok(traj)
}
