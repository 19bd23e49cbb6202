use hostvirus::io::config::{load_params, parse_params, RunSpec};
use hostvirus::io::trajectory_csv::{read_trajectory_csv, write_trajectory, write_trajectory_csv};
use hostvirus::model::host_virus::Variant;
use hostvirus::model::params::HostVirusParams;
use hostvirus::model::solver::{system_solver, RunConfig};
use hostvirus::runner::{ModelRunner, SPECIALIST_CELLS};
use hostvirus::SimError;

fn zero_run(variant: Variant) -> RunConfig {
    RunConfig {
        start_time: 0.0,
        end_time: 1.5,
        delta: 0.5,
        initial_state: vec![0.0; variant.dimension()],
        params: HostVirusParams::reference(),
        variant,
        verbose: true,
        max_steps: None,
    }
}

fn reference_params_toml() -> String {
    HostVirusParams::reference()
        .to_map()
        .iter()
        .map(|(k, v)| format!("{k} = {v:?}\n"))
        .collect()
}

#[test]
fn csv_layout_snapshot() {
    let traj = system_solver(&zero_run(Variant::Immune)).unwrap();
    let mut buf = Vec::new();
    write_trajectory(&mut buf, &traj).unwrap();
    let s = String::from_utf8(buf).unwrap();
    insta::assert_snapshot!(s, @r###"
    Time,x1,x2,ys1,y1,y2,zs,z
    0,0,0,0,0,0,0,0
    0.5,0,0,0,0,0,0,0
    1,0,0,0,0,0,0,0
    1.5,0,0,0,0,0,0,0
    "###);
}

#[test]
fn csv_reads_back_what_was_written() {
    let mut cfg = zero_run(Variant::Base);
    cfg.initial_state = vec![1.0, 0.05, 0.0, 0.0, 0.0, 0.01, 0.5];
    cfg.end_time = 3.0;
    cfg.delta = 0.1;
    let traj = system_solver(&cfg).unwrap();

    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write_trajectory_csv(tmp.path().join("nested").join("run.csv"), &traj).expect("write csv");
    let back = read_trajectory_csv(&path).expect("read csv");

    assert_eq!(back, traj);
}

#[test]
fn runner_save_failure_keeps_trajectory() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let blocker = tmp.path().join("not_a_dir");
    std::fs::write(&blocker, "x").unwrap();

    let mut runner = ModelRunner::from_config(zero_run(Variant::Base)).with_output_dir(&blocker);
    assert!(runner.save("early").is_none());

    let traj = runner.run_and_save(false, "run").expect("run succeeds");
    assert_eq!(traj.len(), 4);
    assert!(runner.save("run").is_none());
    assert_eq!(runner.trajectory().map(|t| t.len()), Some(4));
}

#[test]
fn runner_saves_under_output_dir() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut runner = ModelRunner::from_config(zero_run(Variant::Base)).with_output_dir(tmp.path());
    runner.run(false).unwrap();
    let path = runner.save("zeros").expect("saved");
    assert_eq!(path, tmp.path().join("zeros.csv"));
    let cols = runner
        .trajectory()
        .unwrap()
        .components(&SPECIALIST_CELLS.components)
        .unwrap();
    assert_eq!(cols.len(), 3);
}

#[test]
fn params_file_requires_every_key() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let full = tmp.path().join("params.toml");
    std::fs::write(&full, reference_params_toml()).unwrap();
    assert_eq!(load_params(&full).unwrap(), HostVirusParams::reference());

    let partial: String = reference_params_toml()
        .lines()
        .filter(|l| !l.starts_with("kappa_2"))
        .map(|l| format!("{l}\n"))
        .collect();
    let err = parse_params(&partial, false).unwrap_err();
    assert_eq!(
        err.downcast_ref::<SimError>(),
        Some(&SimError::MissingParameter("kappa_2".into()))
    );

    let json = serde_json::to_string(&HostVirusParams::reference()).unwrap();
    assert_eq!(parse_params(&json, true).unwrap(), HostVirusParams::reference());

    assert!(load_params(tmp.path().join("params.yaml")).is_err());
}

#[test]
fn run_spec_fills_reference_settings() {
    let text = format!("end_time = 2.0\nimmune = true\n\n[parameters]\n{}", reference_params_toml());
    let cfg = RunSpec::from_toml_str(&text).unwrap().into_run_config().unwrap();
    assert_eq!(cfg.end_time, 2.0);
    assert_eq!(cfg.delta, 0.1);
    assert_eq!(cfg.variant, Variant::Immune);
    assert_eq!(cfg.initial_state, vec![1.0, 0.05, 0.0, 0.0, 0.0, 0.01, 0.5, 0.0]);

    let bad = format!("initial_state = [1.0, 2.0]\n\n[parameters]\n{}", reference_params_toml());
    assert!(RunSpec::from_toml_str(&bad).unwrap().into_run_config().is_err());
}
