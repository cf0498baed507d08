use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_WAGE_INCREASE_RATE: f64 = 0.05;
pub const DEFAULT_JOB_HOPPING_INCREASE_RATE: f64 = 0.0;
pub const DEFAULT_YEARS_TO_HOP: u32 = 0;
pub const DEFAULT_INFLATION_RATE: f64 = 0.03;
pub const DEFAULT_TAX_RATE: f64 = 0.20;
pub const DEFAULT_EMERGENCY_FUND: f64 = 0.0;

/// Parameters of a single projection. All rates are fractions (0.04 = 4%).
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub initial_income: f64,
    pub monthly_expense: f64,
    pub investment_return_rate: f64,
    pub wage_increase_rate: f64,
    /// Raise applied instead of `wage_increase_rate` in job-change years. Zero disables job changes.
    pub job_hopping_increase_rate: f64,
    pub years_to_hop: u32,
    pub inflation_rate: f64,
    pub tax_rate: f64,
    /// Capital already set aside; subtracted from the annual expense when sizing the target.
    pub emergency_fund: f64,
}

impl Inputs {
    pub fn new(initial_income: f64, monthly_expense: f64, investment_return_rate: f64) -> Self {
        Self {
            initial_income,
            monthly_expense,
            investment_return_rate,
            wage_increase_rate: DEFAULT_WAGE_INCREASE_RATE,
            job_hopping_increase_rate: DEFAULT_JOB_HOPPING_INCREASE_RATE,
            years_to_hop: DEFAULT_YEARS_TO_HOP,
            inflation_rate: DEFAULT_INFLATION_RATE,
            tax_rate: DEFAULT_TAX_RATE,
            emergency_fund: DEFAULT_EMERGENCY_FUND,
        }
    }

    pub fn annual_expense(&self) -> f64 {
        self.monthly_expense * 12.0
    }

    pub fn net_income(&self, gross_income: f64) -> f64 {
        gross_income * (1.0 - self.tax_rate)
    }

    /// Net income left over after a year of expenses; negative in deficit years.
    pub fn annual_savings(&self, gross_income: f64) -> f64 {
        self.net_income(gross_income) - self.annual_expense()
    }

    pub fn year_one_savings(&self) -> f64 {
        self.annual_savings(self.initial_income)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProjectionError {
    #[error(
        "division by zero: safe withdrawal rate minus inflation rate ({inflation_rate}) is zero"
    )]
    DivisionByZero { inflation_rate: f64 },

    #[error(
        "modulo by zero: years_to_hop is 0 while job hopping raise is {job_hopping_increase_rate}"
    )]
    ModuloByZero { job_hopping_increase_rate: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearTrace {
    pub year: u64,
    pub gross_income: f64,
    pub net_income: f64,
    pub annual_savings: f64,
    /// Capital at the end of the year, after that year's investment growth.
    pub capital: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    /// `None` when a year cap was hit before the target was reached.
    pub years: Option<u64>,
    pub annual_expense: f64,
    pub required_capital: f64,
    pub final_capital: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<YearTrace>,
}
