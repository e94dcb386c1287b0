//! Single-reservoir soil water balance model.
//!
//! Daily precipitation and net radiation drive one soil moisture store; the
//! store in turn sets how much of the radiation is used for
//! evapotranspiration and how much of the rain runs off.

mod error;
mod evaluate;
mod evapotranspiration;
mod export;
mod forcing;
mod output;
mod params;
mod plot;
mod prepro;
mod runoff;
mod swbm;
mod sweep;

pub use error::SwbmError;
pub use evaluate::{Skill, correlate, pearson};
pub use evapotranspiration::{et_flux, et_fraction};
pub use export::{export_csv, write_csv};
pub use forcing::{DateWindow, ForcingSeries, parse_timestamp};
pub use output::{BoundExcursion, RunoffComponents, SimulationOutput};
pub use params::{DEFAULT_SET, INITIAL_SATURATION, Parameters};
pub use plot::{ChartSeries, plot_simulation};
pub use prepro::{
    LE_TO_MM_PER_DAY, RO_TO_MM_PER_DAY, RawTable, SM_TO_MM, SNR_TO_MM_PER_DAY, load_forcing,
    parse_raw_csv, preprocess, read_raw_csv,
};
pub use runoff::{RunoffPartition, RunoffPolicy, hortonian_runoff, runoff_fraction};
pub use swbm::{DailyFluxes, Swbm, simulate};
pub use sweep::{SweepResult, SweepRun, best_by_skill, sweep};
