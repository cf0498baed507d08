mod engine;
mod types;

pub use engine::{ProjectionModel, SAFE_WITHDRAWAL_RATE, required_capital};
pub use types::{
    DEFAULT_EMERGENCY_FUND, DEFAULT_INFLATION_RATE, DEFAULT_JOB_HOPPING_INCREASE_RATE,
    DEFAULT_TAX_RATE, DEFAULT_WAGE_INCREASE_RATE, DEFAULT_YEARS_TO_HOP, Inputs, Projection,
    ProjectionError, YearTrace,
};
