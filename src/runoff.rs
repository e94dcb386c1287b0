/*!
Module for partitioning daily precipitation into runoff.

Two mechanisms are modelled. Saturation-excess runoff grows with the filling
of the soil reservoir, `(w / c_s)^a` of the day's precipitation. Hortonian
(infiltration-excess) runoff is whatever precipitation exceeds the maximum
infiltration rate, independent of soil moisture. Units are mm/day.
*/
use crate::params::Parameters;

/// Fraction of precipitation leaving as saturation-excess runoff.
pub fn runoff_fraction(moisture: f64, c_s: f64, a: f64) -> f64 {
    (moisture / c_s).powf(a)
}

/// Precipitation above the infiltration capacity.
pub fn hortonian_runoff(precip: f64, i_max: f64) -> f64 {
    (precip - i_max).max(0.0)
}

/// One day's runoff split by mechanism [mm/day].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunoffPartition {
    pub total: f64,
    pub saturation: f64,
    pub hortonian: f64,
}

/// Runoff generation scheme, chosen by whether an infiltration limit is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunoffPolicy {
    /// Saturation-excess runoff only.
    SaturationExcess,
    /// Saturation-excess plus Hortonian runoff, capped at the day's precipitation.
    InfiltrationLimited { i_max: f64 },
}

impl RunoffPolicy {
    pub fn from_params(params: &Parameters) -> Self {
        match params.i_max {
            Some(i_max) => RunoffPolicy::InfiltrationLimited { i_max },
            None => RunoffPolicy::SaturationExcess,
        }
    }

    /// Whether this policy reports the two runoff components separately.
    pub fn has_components(&self) -> bool {
        matches!(self, RunoffPolicy::InfiltrationLimited { .. })
    }

    /// Split the day's precipitation into runoff components.
    ///
    /// With an infiltration limit, Hortonian runoff is taken first; if the
    /// two mechanisms together would remove more than fell, the
    /// saturation-excess part absorbs the difference.
    pub fn partition(&self, moisture: f64, precip: f64, params: &Parameters) -> RunoffPartition {
        let saturation = runoff_fraction(moisture, params.c_s, params.a) * precip;
        match *self {
            RunoffPolicy::SaturationExcess => RunoffPartition {
                total: saturation,
                saturation,
                hortonian: 0.0,
            },
            RunoffPolicy::InfiltrationLimited { i_max } => {
                let hortonian = hortonian_runoff(precip, i_max);
                let excess = saturation + hortonian - precip;
                let saturation = if excess > 0.0 {
                    saturation - excess
                } else {
                    saturation
                };
                RunoffPartition {
                    total: saturation + hortonian,
                    saturation,
                    hortonian,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> Parameters {
        Parameters::new(420.0, 4.0, 0.5, 0.8)
    }

    #[test]
    fn fraction_at_capacity_is_one() {
        assert_relative_eq!(runoff_fraction(420.0, 420.0, 4.0), 1.0);
    }

    #[test]
    fn hortonian_is_zero_below_infiltration_capacity() {
        assert_eq!(hortonian_runoff(5.0, 10.0), 0.0);
        assert_eq!(hortonian_runoff(15.0, 10.0), 5.0);
    }

    #[test]
    fn policy_follows_infiltration_limit() {
        assert_eq!(
            RunoffPolicy::from_params(&params()),
            RunoffPolicy::SaturationExcess
        );
        assert_eq!(
            RunoffPolicy::from_params(&params().with_infiltration_limit(12.0)),
            RunoffPolicy::InfiltrationLimited { i_max: 12.0 }
        );
    }

    #[test]
    fn saturation_only_partition() {
        let p = params();
        let part = RunoffPolicy::SaturationExcess.partition(378.0, 2.0, &p);
        let expected = (378.0f64 / 420.0).powf(4.0) * 2.0;
        assert_relative_eq!(part.total, expected);
        assert_eq!(part.saturation, part.total);
        assert_eq!(part.hortonian, 0.0);
    }

    #[test]
    fn components_add_up_when_unclamped() {
        let p = params().with_infiltration_limit(10.0);
        let policy = RunoffPolicy::from_params(&p);
        let part = policy.partition(210.0, 12.0, &p);
        assert_relative_eq!(part.hortonian, 2.0);
        assert_relative_eq!(part.saturation, 0.0625 * 12.0);
        assert_relative_eq!(part.total, 2.0 + 0.75);
    }

    #[test]
    fn saturated_soil_is_clamped_to_precipitation() {
        let p = params().with_infiltration_limit(5.0);
        let policy = RunoffPolicy::from_params(&p);
        // Full soil: saturation excess alone would take all 30 mm.
        let part = policy.partition(420.0, 30.0, &p);
        assert_relative_eq!(part.hortonian, 25.0);
        assert_relative_eq!(part.saturation, 5.0);
        assert_relative_eq!(part.total, 30.0);
    }

    #[test]
    fn never_exceeds_precipitation() {
        let p = params().with_infiltration_limit(3.0);
        let policy = RunoffPolicy::from_params(&p);
        for w in [0.0, 100.0, 300.0, 400.0, 420.0, 500.0] {
            for precip in [0.0, 1.0, 3.0, 10.0, 80.0] {
                let part = policy.partition(w, precip, &p);
                assert!(part.saturation + part.hortonian <= precip + 1e-9);
                assert_relative_eq!(part.total, part.saturation + part.hortonian);
            }
        }
    }
}
