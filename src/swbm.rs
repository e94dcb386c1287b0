use nalgebra::DVector;
use tracing::{debug, warn};

use crate::error::SwbmError;
use crate::evapotranspiration::{et_flux, et_fraction};
use crate::forcing::ForcingSeries;
use crate::output::{BoundExcursion, RunoffComponents, SimulationOutput};
use crate::params::Parameters;
use crate::runoff::{RunoffPartition, RunoffPolicy};

// Fluxes of a single simulated day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyFluxes {
    pub et_fraction: f64,        // Realized share of potential ET [-]
    pub et: f64,                 // Actual evapotranspiration [mm/day]
    pub runoff: RunoffPartition, // Runoff by mechanism [mm/day]
    pub next_moisture: f64,      // Soil moisture carried into the next day [mm]
}

// Single-reservoir soil water balance model
#[derive(Debug, Clone, Copy)]
pub struct Swbm {
    params: Parameters,
    policy: RunoffPolicy,
}

impl Swbm {
    /// Validate the parameters and pick the runoff scheme they imply.
    pub fn new(params: Parameters) -> Result<Self, SwbmError> {
        params.validate()?;
        Ok(Swbm {
            params,
            policy: RunoffPolicy::from_params(&params),
        })
    }

    // Advance the reservoir by one day
    pub fn step(&self, moisture: f64, precip: f64, radiation: f64) -> DailyFluxes {
        let p = &self.params;
        let et_frac = et_fraction(p.b0, moisture, p.c_s, p.g);
        let et = et_flux(et_frac, radiation);
        let runoff = self.policy.partition(moisture, precip, p);
        let next_moisture = moisture + (precip - et - runoff.total);
        DailyFluxes {
            et_fraction: et_frac,
            et,
            runoff,
            next_moisture,
        }
    }

    /// Simulate the first `n_days` of the forcing (all of it by default).
    ///
    /// Day 0 starts at 90% of capacity. Moisture is not clamped to
    /// `[0, c_s]`; days outside that range are listed in
    /// [`SimulationOutput::excursions`]. Non-finite precipitation or
    /// radiation in the simulated days is rejected up front with
    /// [`SwbmError::NonFiniteInput`]. A non-finite ET fraction, runoff or
    /// moisture aborts the run with [`SwbmError::NonFiniteState`].
    pub fn run(
        &self,
        forcing: &ForcingSeries,
        n_days: Option<usize>,
    ) -> Result<SimulationOutput, SwbmError> {
        let n_days = n_days.unwrap_or(forcing.len());
        if n_days == 0 {
            return Err(SwbmError::EmptyForcing);
        }
        if n_days > forcing.len() {
            return Err(SwbmError::ForcingTooShort {
                requested: n_days,
                available: forcing.len(),
            });
        }
        check_finite("tp", &forcing.tp[..n_days])?;
        check_finite("snr", &forcing.snr[..n_days])?;
        debug!(n_days, policy = ?self.policy, "starting water balance run");

        let (lower, upper) = if self.params.c_s > 0.0 {
            (0.0, self.params.c_s)
        } else {
            (self.params.c_s, 0.0)
        };

        let mut moisture: DVector<f64> = DVector::zeros(n_days);
        let mut et: DVector<f64> = DVector::zeros(n_days);
        let mut runoff: DVector<f64> = DVector::zeros(n_days);
        let mut components = self.policy.has_components().then(|| RunoffComponents {
            saturation: DVector::zeros(n_days),
            hortonian: DVector::zeros(n_days),
        });
        let mut excursions = Vec::new();

        moisture[0] = self.params.initial_moisture();

        for i in 0..n_days {
            let w = moisture[i];
            if w < lower || w > upper {
                excursions.push(BoundExcursion { day: i, moisture: w });
            }

            let day = self.step(w, forcing.tp[i], forcing.snr[i]);
            if !day.et_fraction.is_finite() {
                return Err(SwbmError::NonFiniteState {
                    day: i,
                    quantity: "et fraction",
                });
            }
            if !day.runoff.total.is_finite() {
                return Err(SwbmError::NonFiniteState {
                    day: i,
                    quantity: "runoff",
                });
            }

            et[i] = day.et;
            runoff[i] = day.runoff.total;
            if let Some(c) = components.as_mut() {
                c.saturation[i] = day.runoff.saturation;
                c.hortonian[i] = day.runoff.hortonian;
            }

            // The last day's moisture is not carried any further
            if i < n_days - 1 {
                if !day.next_moisture.is_finite() {
                    return Err(SwbmError::NonFiniteState {
                        day: i + 1,
                        quantity: "soil moisture",
                    });
                }
                moisture[i + 1] = day.next_moisture;
            }
        }

        if let Some(first) = excursions.first() {
            warn!(
                count = excursions.len(),
                first_day = first.day,
                moisture = first.moisture,
                c_s = self.params.c_s,
                "soil moisture left [0, c_s]"
            );
        }
        debug!(final_moisture = moisture[n_days - 1], "water balance run finished");

        Ok(SimulationOutput {
            moisture,
            runoff,
            et,
            components,
            excursions,
        })
    }
}

fn check_finite(column: &'static str, values: &[f64]) -> Result<(), SwbmError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(row) => Err(SwbmError::NonFiniteInput { column, row }),
        None => Ok(()),
    }
}

/// Run the model once for the given parameters.
pub fn simulate(
    forcing: &ForcingSeries,
    params: &Parameters,
    n_days: Option<usize>,
) -> Result<SimulationOutput, SwbmError> {
    Swbm::new(*params)?.run(forcing, n_days)
}
