use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::SwbmError;
use crate::forcing::{DateWindow, ForcingSeries};
use crate::output::SimulationOutput;

// Write the simulated series next to their timestamps, one row per day.
// Rows outside the window are skipped. Component runoff columns are only
// written when the run modelled Hortonian runoff.
pub fn write_csv<W: Write>(
    mut writer: W,
    forcing: &ForcingSeries,
    output: &SimulationOutput,
    window: &DateWindow,
) -> std::io::Result<usize> {
    write!(writer, "time,moisture,runoff,et")?;
    if output.components.is_some() {
        write!(writer, ",runoff_saturation,runoff_hortonian")?;
    }
    writeln!(writer)?;

    // A truncated run only covers the leading forcing rows
    let indices: Vec<usize> = forcing
        .window_indices(window)
        .into_iter()
        .filter(|&i| i < output.len())
        .collect();
    let selected = output.select(&indices);

    for (row, &i) in indices.iter().enumerate() {
        write!(
            writer,
            "{},{},{},{}",
            forcing.time[i].format("%Y-%m-%d"),
            selected.moisture[row],
            selected.runoff[row],
            selected.et[row]
        )?;
        if let Some(c) = &selected.components {
            write!(writer, ",{},{}", c.saturation[row], c.hortonian[row])?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(indices.len())
}

pub fn export_csv(
    path: impl AsRef<Path>,
    forcing: &ForcingSeries,
    output: &SimulationOutput,
    window: &DateWindow,
) -> Result<usize, SwbmError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| SwbmError::io(path, e))?;
    let rows = write_csv(BufWriter::new(file), forcing, output, window)
        .map_err(|e| SwbmError::io(path, e))?;
    info!(path = %path.display(), rows, "simulation output written");
    Ok(rows)
}
