use chrono::{NaiveDate, NaiveDateTime};

use crate::error::SwbmError;

// Preprocessed daily forcing and observation table, one entry per day
#[derive(Debug, Clone, PartialEq)]
pub struct ForcingSeries {
    pub time: Vec<NaiveDateTime>, // Daily timestamps, chronological
    pub lat: Vec<f64>,            // Latitude [deg]
    pub long: Vec<f64>,           // Longitude [deg]
    pub tp: Vec<f64>,             // Total precipitation [mm/day]
    pub sm: Vec<f64>,             // Observed soil moisture [mm]
    pub ro: Vec<f64>,             // Observed runoff [mm/day]
    pub le: Vec<f64>,             // Observed latent heat flux [mm/day]
    pub snr: Vec<f64>,            // Surface net radiation [mm/day]
}

impl ForcingSeries {
    /// Build a table from equal-length columns.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time: Vec<NaiveDateTime>,
        lat: Vec<f64>,
        long: Vec<f64>,
        tp: Vec<f64>,
        sm: Vec<f64>,
        ro: Vec<f64>,
        le: Vec<f64>,
        snr: Vec<f64>,
    ) -> Result<Self, SwbmError> {
        let n = time.len();
        let columns = [
            ("lat", lat.len()),
            ("long", long.len()),
            ("tp", tp.len()),
            ("sm", sm.len()),
            ("ro", ro.len()),
            ("le", le.len()),
            ("snr", snr.len()),
        ];
        for (what, got) in columns {
            if got != n {
                return Err(SwbmError::LengthMismatch {
                    what,
                    expected: n,
                    got,
                });
            }
        }
        Ok(ForcingSeries {
            time,
            lat,
            long,
            tp,
            sm,
            ro,
            le,
            snr,
        })
    }

    /// Forcing-only table: consecutive days from `start`, observations zeroed
    /// and coordinates unset.
    pub fn from_forcing(start: NaiveDate, tp: Vec<f64>, snr: Vec<f64>) -> Result<Self, SwbmError> {
        if tp.len() != snr.len() {
            return Err(SwbmError::LengthMismatch {
                what: "snr",
                expected: tp.len(),
                got: snr.len(),
            });
        }
        let n = tp.len();
        let midnight = start.and_hms_opt(0, 0, 0).unwrap_or_default();
        let time = (0..n)
            .map(|i| midnight + chrono::TimeDelta::days(i as i64))
            .collect();
        Self::new(
            time,
            vec![f64::NAN; n],
            vec![f64::NAN; n],
            tp,
            vec![0.0; n],
            vec![0.0; n],
            vec![0.0; n],
            snr,
        )
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Row indices whose timestamp falls inside the closed window.
    pub fn window_indices(&self, window: &DateWindow) -> Vec<usize> {
        self.time
            .iter()
            .enumerate()
            .filter(|(_, t)| window.contains(t))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Closed date interval `[start, end]`; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateWindow {
    /// Window covering the whole series.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        DateWindow { start, end }
    }

    /// Parse bounds given as timestamps (`2016-01-01`, `2016-12-31 00:00:00`).
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, SwbmError> {
        Ok(DateWindow {
            start: start.map(parse_timestamp).transpose()?,
            end: end.map(parse_timestamp).transpose()?,
        })
    }

    /// One calendar year, 1 January to 31 December inclusive.
    pub fn year(year: i32) -> Result<Self, SwbmError> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1);
        let last = NaiveDate::from_ymd_opt(year, 12, 31);
        match (first, last) {
            (Some(first), Some(last)) => Ok(DateWindow {
                start: first.and_hms_opt(0, 0, 0),
                end: last.and_hms_opt(0, 0, 0),
            }),
            _ => Err(SwbmError::InvalidTime {
                value: year.to_string(),
            }),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, t: &NaiveDateTime) -> bool {
        self.start.is_none_or(|s| *t >= s) && self.end.is_none_or(|e| *t <= e)
    }
}

/// Parse a timestamp as a bare date, or a date with time separated by a
/// space or `T`. Bare dates land on midnight.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, SwbmError> {
    let value = value.trim();
    const FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(t);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| SwbmError::InvalidTime {
            value: value.to_string(),
        })
}
