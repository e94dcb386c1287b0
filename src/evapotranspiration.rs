// Evapotranspiration response to soil moisture

/// Proportion of the radiation-limited evapotranspiration realized at the
/// current soil moisture: `b0 * (w / c_s)^g`.
///
/// Moisture outside `[0, c_s]` is not clamped; a negative ratio with a
/// fractional `g` yields NaN, which the engine reports as an error.
pub fn et_fraction(b0: f64, moisture: f64, c_s: f64, g: f64) -> f64 {
    b0 * (moisture / c_s).powf(g)
}

/// Actual evapotranspiration flux [mm/day] for a fraction and the day's
/// net radiation [mm/day].
pub fn et_flux(fraction: f64, radiation: f64) -> f64 {
    fraction * radiation
}
