use std::fs;
use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use swbm::{
    DateWindow, Parameters, SwbmError, Swbm, correlate, export_csv, load_forcing, simulate, sweep,
};

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample_forcing.csv")
}

fn params_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("parameters.toml")
}

#[test]
fn sample_year_runs_end_to_end() {
    let forcing = load_forcing(sample_path()).unwrap();
    assert_eq!(forcing.len(), 366);

    let params = Parameters::from_toml_file(params_path(), "").unwrap();
    let output = simulate(&forcing, &params, None).unwrap();

    assert_eq!(output.len(), forcing.len());
    assert_eq!(output.moisture[0], 378.0);
    assert!(output.within_bounds());

    let skill = correlate(&forcing, &output, &DateWindow::all()).unwrap();
    for r in [skill.sm, skill.ro, skill.et] {
        assert!((-1.0..=1.0).contains(&r));
    }
    assert_abs_diff_eq!(skill.sum, skill.sm + skill.ro + skill.et, epsilon = 1e-12);
}

#[test]
fn water_balance_closes_over_the_run() {
    let forcing = load_forcing(sample_path()).unwrap();
    let params = Parameters::from_toml_file(params_path(), "germany_horton").unwrap();
    let output = Swbm::new(params).unwrap().run(&forcing, None).unwrap();

    // Storage change equals inputs minus outputs over all but the last day.
    let n = output.len();
    let inflow: f64 = forcing.tp[..n - 1].iter().sum();
    let et: f64 = output.et.rows(0, n - 1).sum();
    let runoff: f64 = output.runoff.rows(0, n - 1).sum();
    let storage_change = output.moisture[n - 1] - output.moisture[0];
    assert_abs_diff_eq!(storage_change, inflow - et - runoff, epsilon = 1e-6);

    let sat = output.runoff_saturation().unwrap();
    let hort = output.runoff_hortonian().unwrap();
    for i in 0..n {
        assert!(sat[i] + hort[i] <= forcing.tp[i] + 1e-9);
    }
}

#[test]
fn windowed_evaluation_and_export() {
    let forcing = load_forcing(sample_path()).unwrap();
    let output = simulate(&forcing, &Parameters::new(420.0, 4.0, 0.5, 0.8), None).unwrap();

    let summer = DateWindow::parse(Some("2016-06-01"), Some("2016-08-31")).unwrap();
    assert_eq!(forcing.window_indices(&summer).len(), 92);
    let skill = correlate(&forcing, &output, &summer).unwrap();
    assert!(skill.sm.is_finite());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let rows = export_csv(&path, &forcing, &output, &summer).unwrap();
    assert_eq!(rows, 92);

    let text = fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("time,moisture,runoff,et"));
    assert!(lines.next().unwrap().starts_with("2016-06-01,"));
    assert_eq!(text.lines().count(), 93);
}

#[test]
fn sweep_over_sample() {
    let forcing = load_forcing(sample_path()).unwrap();
    let sets = [
        Parameters::new(420.0, 4.0, 0.5, 0.8),
        Parameters::new(210.0, 2.0, 0.3, 0.6),
        Parameters::new(0.0, 2.0, 0.3, 0.6),
    ];
    let results = sweep(&forcing, &sets, None, &DateWindow::all());
    assert!(results[0].outcome.is_ok());
    assert!(results[1].outcome.is_ok());
    assert!(results[2].outcome.is_err());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_forcing("/nonexistent/forcing.csv").unwrap_err();
    assert!(matches!(err, SwbmError::Io { .. }));
}
