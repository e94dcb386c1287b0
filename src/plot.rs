//! Time-series charts of a simulation.
//!
//! Rendering goes through plotpy, which writes a matplotlib script next to
//! the figure and runs `python3` on it.

use std::path::Path;

use plotpy::{Curve, Plot};
use tracing::info;

use crate::error::SwbmError;
use crate::forcing::{DateWindow, ForcingSeries};
use crate::output::SimulationOutput;

// Chart-ready columns for the simulated days inside a window
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub day: Vec<f64>,      // Position in the forcing series [day]
    pub moisture: Vec<f64>, // Soil moisture [mm]
    pub runoff: Vec<f64>,   // Total runoff [mm/day]
    pub et: Vec<f64>,       // Evapotranspiration [mm/day]
}

impl ChartSeries {
    pub fn new(forcing: &ForcingSeries, output: &SimulationOutput, window: &DateWindow) -> Self {
        let indices: Vec<usize> = forcing
            .window_indices(window)
            .into_iter()
            .filter(|&i| i < output.len())
            .collect();
        let selected = output.select(&indices);
        ChartSeries {
            day: indices.iter().map(|&i| i as f64).collect(),
            moisture: selected.moisture.as_slice().to_vec(),
            runoff: selected.runoff.as_slice().to_vec(),
            et: selected.et.as_slice().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.day.is_empty()
    }
}

/// Save soil moisture, runoff and ET as three stacked panels.
///
/// Returns the number of plotted days. A window that holds no simulated day
/// is an error.
pub fn plot_simulation(
    path: impl AsRef<Path>,
    forcing: &ForcingSeries,
    output: &SimulationOutput,
    window: &DateWindow,
    title: &str,
) -> Result<usize, SwbmError> {
    let path = path.as_ref();
    let series = ChartSeries::new(forcing, output, window);
    if series.is_empty() {
        return Err(SwbmError::Plot {
            path: path.to_path_buf(),
            reason: "no simulated days in the window".to_string(),
        });
    }

    let panels = [
        ("soil moisture [mm]", &series.moisture, "tab:green"),
        ("runoff [mm/day]", &series.runoff, "tab:blue"),
        ("ET [mm/day]", &series.et, "tab:orange"),
    ];

    let mut plot = Plot::new();
    for (k, (label, values, color)) in panels.into_iter().enumerate() {
        let mut curve = Curve::new();
        curve
            .set_label(label)
            .set_line_color(color)
            .draw(&series.day, values);

        plot.set_subplot(3, 1, k + 1)
            .add(&curve)
            .grid_and_labels("day", label);
        if k == 0 {
            plot.set_title(title);
        }
    }
    plot.set_figure_size_points(600.0, 600.0);

    plot.save(path).map_err(|reason| SwbmError::Plot {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    })?;
    info!(path = %path.display(), days = series.len(), "chart written");
    Ok(series.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;
    use crate::swbm::simulate;
    use chrono::NaiveDate;

    fn forcing() -> ForcingSeries {
        let start = NaiveDate::from_ymd_opt(2016, 12, 29).unwrap();
        ForcingSeries::from_forcing(start, vec![2.0; 6], vec![10.0; 6]).unwrap()
    }

    #[test]
    fn chart_follows_the_window() {
        let f = forcing();
        let out = simulate(&f, &Parameters::new(420.0, 4.0, 0.5, 0.8), None).unwrap();
        let chart = ChartSeries::new(&f, &out, &DateWindow::year(2017).unwrap());

        assert_eq!(chart.day, vec![3.0, 4.0, 5.0]);
        assert_eq!(chart.moisture, out.moisture.as_slice()[3..].to_vec());
        assert_eq!(chart.et, out.et.as_slice()[3..].to_vec());
    }

    #[test]
    fn chart_of_truncated_run_stops_at_last_simulated_day() {
        let f = forcing();
        let out = simulate(&f, &Parameters::new(420.0, 4.0, 0.5, 0.8), Some(4)).unwrap();
        let chart = ChartSeries::new(&f, &out, &DateWindow::all());
        assert_eq!(chart.len(), 4);
        assert_eq!(chart.runoff, out.runoff.as_slice().to_vec());
    }

    #[test]
    fn empty_window_is_an_error() {
        let f = forcing();
        let out = simulate(&f, &Parameters::new(420.0, 4.0, 0.5, 0.8), None).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = plot_simulation(
            dir.path().join("chart.svg"),
            &f,
            &out,
            &DateWindow::year(2020).unwrap(),
            "empty",
        )
        .unwrap_err();
        assert!(matches!(err, SwbmError::Plot { .. }));
        assert!(!dir.path().join("chart.svg").exists());
    }
}
