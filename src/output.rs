use nalgebra::DVector;

// Component runoff series, present when Hortonian runoff is modelled
#[derive(Debug, Clone, PartialEq)]
pub struct RunoffComponents {
    pub saturation: DVector<f64>, // Saturation-excess runoff [mm/day], after the conservation cap
    pub hortonian: DVector<f64>,  // Infiltration-excess runoff [mm/day]
}

/// A day on which soil moisture was outside `[0, c_s]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundExcursion {
    pub day: usize,
    pub moisture: f64,
}

// Daily model trajectory, index-aligned with the forcing series
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutput {
    pub moisture: DVector<f64>, // Soil moisture [mm]
    pub runoff: DVector<f64>,   // Total runoff [mm/day]
    pub et: DVector<f64>,       // Evapotranspiration [mm/day]
    pub components: Option<RunoffComponents>,
    pub excursions: Vec<BoundExcursion>,
}

impl SimulationOutput {
    pub fn len(&self) -> usize {
        self.moisture.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moisture.is_empty()
    }

    pub fn runoff_saturation(&self) -> Option<&DVector<f64>> {
        self.components.as_ref().map(|c| &c.saturation)
    }

    pub fn runoff_hortonian(&self) -> Option<&DVector<f64>> {
        self.components.as_ref().map(|c| &c.hortonian)
    }

    /// Whether soil moisture stayed within `[0, c_s]` for the whole run.
    pub fn within_bounds(&self) -> bool {
        self.excursions.is_empty()
    }

    /// Output restricted to the given day indices, in the order given.
    pub fn select(&self, indices: &[usize]) -> SimulationOutput {
        let pick = |v: &DVector<f64>| {
            DVector::from_iterator(indices.len(), indices.iter().map(|&i| v[i]))
        };
        SimulationOutput {
            moisture: pick(&self.moisture),
            runoff: pick(&self.runoff),
            et: pick(&self.et),
            components: self.components.as_ref().map(|c| RunoffComponents {
                saturation: pick(&c.saturation),
                hortonian: pick(&c.hortonian),
            }),
            excursions: self
                .excursions
                .iter()
                .filter_map(|e| {
                    indices.iter().position(|&i| i == e.day).map(|day| BoundExcursion {
                        day,
                        moisture: e.moisture,
                    })
                })
                .collect(),
        }
    }
}
