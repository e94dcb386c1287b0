//! Skill scores: correlation of simulated against observed series.

use tracing::debug;

use crate::error::SwbmError;
use crate::forcing::{DateWindow, ForcingSeries};
use crate::output::SimulationOutput;

/// Pearson correlation coefficient.
///
/// Returns NaN when the slices differ in length, hold fewer than two
/// values, or either one has zero variance. NaN inputs propagate.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }

    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;

    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mx;
        let dy = yi - my;
        sum_xy += dx * dy;
        sum_xx += dx * dx;
        sum_yy += dy * dy;
    }

    let denom = (sum_xx * sum_yy).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    sum_xy / denom
}

/// Correlations of soil moisture, runoff and evapotranspiration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skill {
    pub sm: f64,
    pub ro: f64,
    pub et: f64,
    /// Sum of the three coefficients; NaN if any of them is.
    pub sum: f64,
}

impl Skill {
    fn new(sm: f64, ro: f64, et: f64) -> Self {
        Skill {
            sm,
            ro,
            et,
            sum: sm + ro + et,
        }
    }
}

/// Correlate model output with the observations in `forcing`.
///
/// Observed `sm`, `ro` and `le` are paired with simulated moisture, runoff
/// and ET. The window selects rows by the forcing timestamps; the same
/// positions are taken from the output. A constant sub-series gives NaN for
/// that score only.
pub fn correlate(
    forcing: &ForcingSeries,
    output: &SimulationOutput,
    window: &DateWindow,
) -> Result<Skill, SwbmError> {
    if output.len() != forcing.len() {
        return Err(SwbmError::LengthMismatch {
            what: "simulation output",
            expected: forcing.len(),
            got: output.len(),
        });
    }

    let indices: Vec<usize> = if window.is_unbounded() {
        (0..forcing.len()).collect()
    } else {
        forcing.window_indices(window)
    };
    debug!(rows = indices.len(), "correlating simulation with observations");

    let observed = |column: &[f64]| -> Vec<f64> { indices.iter().map(|&i| column[i]).collect() };
    let simulated = output.select(&indices);

    Ok(Skill::new(
        pearson(&observed(&forcing.sm), simulated.moisture.as_slice()),
        pearson(&observed(&forcing.ro), simulated.runoff.as_slice()),
        pearson(&observed(&forcing.le), simulated.et.as_slice()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use nalgebra::DVector;

    fn observed(sm: Vec<f64>, ro: Vec<f64>, le: Vec<f64>) -> ForcingSeries {
        let start = NaiveDate::from_ymd_opt(2016, 12, 29).unwrap();
        let n = sm.len();
        let mut f = ForcingSeries::from_forcing(start, vec![0.0; n], vec![0.0; n]).unwrap();
        f.sm = sm;
        f.ro = ro;
        f.le = le;
        f
    }

    fn output(moisture: Vec<f64>, runoff: Vec<f64>, et: Vec<f64>) -> SimulationOutput {
        SimulationOutput {
            moisture: DVector::from_vec(moisture),
            runoff: DVector::from_vec(runoff),
            et: DVector::from_vec(et),
            components: None,
            excursions: Vec::new(),
        }
    }

    #[test]
    fn pearson_perfect_positive() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert_relative_eq!(pearson(&x, &y), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn pearson_perfect_negative() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [10.0, 8.0, 6.0, 4.0, 2.0];
        assert_relative_eq!(pearson(&x, &y), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn pearson_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 3.0, 2.0, 4.0];
        assert_relative_eq!(pearson(&x, &y), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn pearson_constant_is_nan() {
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn pearson_degenerate_lengths_are_nan() {
        assert!(pearson(&[1.0], &[1.0]).is_nan());
        assert!(pearson(&[1.0, 2.0], &[1.0]).is_nan());
    }

    #[test]
    fn identical_series_score_one() {
        let sm = vec![300.0, 310.0, 305.0, 290.0, 280.0];
        let ro = vec![0.0, 2.0, 1.0, 0.5, 0.1];
        let le = vec![1.0, 1.5, 2.5, 2.0, 0.5];
        let f = observed(sm.clone(), ro.clone(), le.clone());
        let skill = correlate(&f, &output(sm, ro, le), &DateWindow::all()).unwrap();
        assert_relative_eq!(skill.sm, 1.0, epsilon = 1e-12);
        assert_relative_eq!(skill.ro, 1.0, epsilon = 1e-12);
        assert_relative_eq!(skill.et, 1.0, epsilon = 1e-12);
        assert_relative_eq!(skill.sum, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_series_gives_nan_for_that_score_only() {
        let sm = vec![300.0, 310.0, 305.0, 290.0];
        let ro = vec![0.0; 4];
        let le = vec![1.0, 1.5, 2.5, 2.0];
        let f = observed(sm.clone(), ro.clone(), le.clone());
        let skill = correlate(&f, &output(sm, ro, le), &DateWindow::all()).unwrap();
        assert!(skill.ro.is_nan());
        assert!(skill.sum.is_nan());
        assert_relative_eq!(skill.sm, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn window_selects_matching_positions() {
        // Dates run 2016-12-29 .. 2017-01-03; the 2017 rows are anti-correlated.
        let sm = vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0];
        let moisture = vec![1.0, 2.0, 3.0, 3.0, 2.0, 1.0];
        let f = observed(sm.clone(), sm.clone(), sm.clone());
        let out = output(moisture.clone(), moisture.clone(), moisture);

        let w2016 = DateWindow::year(2016).unwrap();
        assert_relative_eq!(correlate(&f, &out, &w2016).unwrap().sm, 1.0, epsilon = 1e-12);

        let w2017 = DateWindow::parse(Some("2017-01-01"), None).unwrap();
        assert_relative_eq!(correlate(&f, &out, &w2017).unwrap().et, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn output_must_cover_forcing() {
        let f = observed(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]);
        let out = output(vec![1.0, 2.0], vec![1.0, 2.0], vec![1.0, 2.0]);
        assert!(matches!(
            correlate(&f, &out, &DateWindow::all()),
            Err(SwbmError::LengthMismatch { .. })
        ));
    }
}
