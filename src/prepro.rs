//! Raw input table reading and unit conversion.
//!
//! Raw files carry the measured columns in their native units. Everything is
//! brought to a common water flux unit of millimetres per day so the model
//! can add precipitation and subtract evaporation directly.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{debug, info};

use crate::error::SwbmError;
use crate::forcing::{ForcingSeries, parse_timestamp};

/// Volumetric soil moisture [m3/m3] to water column [mm].
pub const SM_TO_MM: f64 = 1000.0;
/// Runoff [m] to [mm/day].
pub const RO_TO_MM_PER_DAY: f64 = 24000.0;
/// Latent heat flux [W/m2] to [mm/day]: seconds per day over latent heat of
/// vaporization of water [J/kg].
pub const LE_TO_MM_PER_DAY: f64 = 86400.0 / 2_260_000.0;
/// Net radiation [MJ/m2] to evaporable water equivalent [mm/day].
pub const SNR_TO_MM_PER_DAY: f64 = 1.0 / 2.26;

pub const COL_TIME: &str = "time";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_TP: &str = "tp_[mm]";
pub const COL_SM: &str = "sm_[m3/m3]";
pub const COL_RO: &str = "ro_[m]";
pub const COL_LE: &str = "le_[W/m2]";
pub const COL_SNR: &str = "snr_[MJ/m2]";

const NUMERIC_COLUMNS: [&str; 7] = [
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_TP,
    COL_SM,
    COL_RO,
    COL_LE,
    COL_SNR,
];

/// Raw measurement table as read from disk, units untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub time: Vec<String>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    pub tp_mm: Vec<f64>,
    pub sm_m3_m3: Vec<f64>,
    pub ro_m: Vec<f64>,
    pub le_w_m2: Vec<f64>,
    pub snr_mj_m2: Vec<f64>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    fn column_mut(&mut self, name: &str) -> &mut Vec<f64> {
        match name {
            COL_LATITUDE => &mut self.latitude,
            COL_LONGITUDE => &mut self.longitude,
            COL_TP => &mut self.tp_mm,
            COL_SM => &mut self.sm_m3_m3,
            COL_RO => &mut self.ro_m,
            COL_LE => &mut self.le_w_m2,
            _ => &mut self.snr_mj_m2,
        }
    }
}

/// Read a comma-separated raw table from a file.
pub fn read_raw_csv(path: impl AsRef<Path>) -> Result<RawTable, SwbmError> {
    let path = path.as_ref();
    info!(path = %path.display(), "reading raw forcing table");
    let file = File::open(path).map_err(|e| SwbmError::io(path, e))?;
    parse_raw_csv(file).map_err(|e| match e {
        SwbmError::Io { reason, .. } => SwbmError::Io {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}

/// Parse a comma-separated raw table with a header row.
///
/// Columns are located by header name, so their order does not matter and
/// extra columns (such as a leading index) are ignored. Blank lines are
/// skipped.
pub fn parse_raw_csv<R: Read>(source: R) -> Result<RawTable, SwbmError> {
    let reader = BufReader::new(source);
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line.map_err(|e| SwbmError::io("<input>", e))?;
                if !line.trim().is_empty() {
                    break split_fields(&line)
                        .into_iter()
                        .map(str::to_string)
                        .collect::<Vec<_>>();
                }
            }
            None => return Err(SwbmError::EmptyForcing),
        }
    };

    let position = |name: &str| -> Result<usize, SwbmError> {
        header
            .iter()
            .position(|h| *h == name)
            .ok_or_else(|| SwbmError::MissingColumn {
                name: name.to_string(),
            })
    };
    let time_idx = position(COL_TIME)?;
    let numeric_idx = NUMERIC_COLUMNS
        .iter()
        .map(|&name| position(name).map(|i| (name, i)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut table = RawTable::default();
    for (line_num, line) in lines {
        let line = line.map_err(|e| SwbmError::io("<input>", e))?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(&line);
        if fields.len() != header.len() {
            return Err(SwbmError::Parse {
                line: line_num + 1,
                column: "<row>".to_string(),
                value: line.clone(),
            });
        }

        table.time.push(fields[time_idx].to_string());
        for &(name, idx) in &numeric_idx {
            let raw = fields[idx];
            let value: f64 = raw.parse().map_err(|_| SwbmError::Parse {
                line: line_num + 1,
                column: name.to_string(),
                value: raw.to_string(),
            })?;
            table.column_mut(name).push(value);
        }
    }

    debug!(rows = table.len(), "raw table parsed");
    Ok(table)
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',')
        .map(|s| s.trim().trim_matches('"'))
        .collect()
}

/// Convert a raw table into the model's common units.
///
/// Timestamps are parsed, precipitation passes through unchanged and the
/// remaining fluxes are scaled to mm/day. Non-finite precipitation or
/// radiation is rejected here instead of surfacing later as NaN output.
pub fn preprocess(raw: &RawTable) -> Result<ForcingSeries, SwbmError> {
    if raw.is_empty() {
        return Err(SwbmError::EmptyForcing);
    }

    let time = raw
        .time
        .iter()
        .map(|t| parse_timestamp(t))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(row) = raw.tp_mm.iter().position(|v| !v.is_finite()) {
        return Err(SwbmError::NonFiniteInput { column: "tp", row });
    }
    if let Some(row) = raw.snr_mj_m2.iter().position(|v| !v.is_finite()) {
        return Err(SwbmError::NonFiniteInput { column: "snr", row });
    }

    let scale = |values: &[f64], factor: f64| -> Vec<f64> {
        values.iter().map(|v| v * factor).collect()
    };

    ForcingSeries::new(
        time,
        raw.latitude.clone(),
        raw.longitude.clone(),
        raw.tp_mm.clone(),
        scale(&raw.sm_m3_m3, SM_TO_MM),
        scale(&raw.ro_m, RO_TO_MM_PER_DAY),
        scale(&raw.le_w_m2, LE_TO_MM_PER_DAY),
        scale(&raw.snr_mj_m2, SNR_TO_MM_PER_DAY),
    )
}

/// Read and preprocess a raw table in one go.
pub fn load_forcing(path: impl AsRef<Path>) -> Result<ForcingSeries, SwbmError> {
    let raw = read_raw_csv(path)?;
    preprocess(&raw)
}
