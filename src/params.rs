use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SwbmError;

/// Name of the parameter set used when none is requested.
pub const DEFAULT_SET: &str = "default";

/// Fraction of the holding capacity the soil starts at on day 0.
pub const INITIAL_SATURATION: f64 = 0.9;

// Soil water balance parameters, fixed for the duration of a run
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub c_s: f64, // Soil water holding capacity [mm]
    pub a: f64,   // Runoff function shape [-]
    pub g: f64,   // ET function shape [-]
    pub b0: f64,  // Maximum of the ET function [-]
    #[serde(default)]
    pub i_max: Option<f64>, // Maximum infiltration rate [mm/day], enables Hortonian runoff
}

impl Parameters {
    pub fn new(c_s: f64, a: f64, g: f64, b0: f64) -> Self {
        Parameters {
            c_s,
            a,
            g,
            b0,
            i_max: None,
        }
    }

    /// Enable infiltration-excess runoff with the given maximum infiltration rate.
    pub fn with_infiltration_limit(mut self, i_max: f64) -> Self {
        self.i_max = Some(i_max);
        self
    }

    /// Soil moisture on the first simulated day [mm].
    pub fn initial_moisture(&self) -> f64 {
        INITIAL_SATURATION * self.c_s
    }

    /// Reject parameter sets the recurrence cannot run with.
    ///
    /// Only degenerate values are refused: a zero or non-finite capacity,
    /// non-finite shapes, and a negative infiltration rate. Physically odd
    /// but computable values such as `b0 > 1` pass through.
    pub fn validate(&self) -> Result<(), SwbmError> {
        let finite = [
            ("c_s", self.c_s),
            ("a", self.a),
            ("g", self.g),
            ("b0", self.b0),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SwbmError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite",
                });
            }
        }
        if self.c_s == 0.0 {
            return Err(SwbmError::InvalidParameter {
                name: "c_s",
                value: self.c_s,
                reason: "must be non-zero",
            });
        }
        if let Some(i_max) = self.i_max {
            if !i_max.is_finite() || i_max < 0.0 {
                return Err(SwbmError::InvalidParameter {
                    name: "i_max",
                    value: i_max,
                    reason: "must be finite and non-negative",
                });
            }
        }
        Ok(())
    }

    // Select a named parameter set from TOML text like
    //   [germany]
    //   c_s = 420
    //   a = 4
    //   ...
    // The exact section name wins; otherwise its lowercase form is tried.
    pub fn from_toml_str(toml_str: &str, set_name: &str) -> Result<Self, SwbmError> {
        let sets: BTreeMap<String, Parameters> = toml::from_str(toml_str)?;

        let set_name = if set_name.is_empty() {
            DEFAULT_SET
        } else {
            set_name
        };

        sets.get(set_name)
            .or_else(|| sets.get(&set_name.to_lowercase()))
            .copied()
            .ok_or_else(|| SwbmError::UnknownParameterSet {
                name: set_name.to_string(),
            })
    }

    pub fn from_toml_file(path: impl AsRef<Path>, set_name: &str) -> Result<Self, SwbmError> {
        let path = path.as_ref();
        let toml_str = fs::read_to_string(path).map_err(|e| SwbmError::io(path, e))?;
        Self::from_toml_str(&toml_str, set_name)
    }
}
