use std::cmp::Ordering;

use super::types::{Inputs, Projection, ProjectionError, YearTrace};

/// Assumed sustainable annual draw-down of capital once financially independent.
///
/// The target capital is sized so that withdrawing this fraction, less inflation,
/// covers the annual expense not already met by the emergency fund.
pub const SAFE_WITHDRAWAL_RATE: f64 = 0.04;

/// Capital needed to retire: `(annual expense - emergency fund) / (0.04 - inflation)`.
pub fn required_capital(inputs: &Inputs) -> Result<f64, ProjectionError> {
    let real_withdrawal_rate = SAFE_WITHDRAWAL_RATE - inputs.inflation_rate;
    if real_withdrawal_rate == 0.0 {
        return Err(ProjectionError::DivisionByZero {
            inflation_rate: inputs.inflation_rate,
        });
    }
    Ok((inputs.annual_expense() - inputs.emergency_fund) / real_withdrawal_rate)
}

/// Year-by-year accumulation of capital from salary savings.
///
/// The parameters are fixed once the model is built; every operation is a pure
/// function of them. Inputs whose savings stay negative can make the unbounded
/// [`ProjectionModel::calculate_years_to_financial_freedom`] loop forever; use
/// [`ProjectionModel::years_within`] when the inputs are untrusted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionModel {
    inputs: Inputs,
}

impl ProjectionModel {
    pub fn new(inputs: Inputs) -> Self {
        Self { inputs }
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn calculate_years_to_financial_freedom(&self) -> Result<u64, ProjectionError> {
        let target = required_capital(&self.inputs)?;
        let state = simulate(&self.inputs, target, None, None)?;
        Ok(state.years)
    }

    /// Same as [`Self::calculate_years_to_financial_freedom`] but gives up after
    /// `max_years` simulated years, returning `None`.
    pub fn years_within(&self, max_years: u64) -> Result<Option<u64>, ProjectionError> {
        let target = required_capital(&self.inputs)?;
        let state = simulate(&self.inputs, target, Some(max_years), None)?;
        Ok(state.reached(target).then_some(state.years))
    }

    pub fn project(&self, max_years: Option<u64>) -> Result<Projection, ProjectionError> {
        let target = required_capital(&self.inputs)?;
        let mut trace = Vec::new();
        let state = simulate(&self.inputs, target, max_years, Some(&mut trace))?;

        Ok(Projection {
            years: state.reached(target).then_some(state.years),
            annual_expense: self.inputs.annual_expense(),
            required_capital: target,
            final_capital: state.capital,
            trace,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct AccumulationState {
    capital: f64,
    income: f64,
    years: u64,
}

impl AccumulationState {
    /// Anything but "capital below target" ends the run, NaN included.
    fn reached(self, target: f64) -> bool {
        !matches!(self.capital.partial_cmp(&target), Some(Ordering::Less))
    }
}

fn simulate(
    inputs: &Inputs,
    target: f64,
    max_years: Option<u64>,
    mut trace: Option<&mut Vec<YearTrace>>,
) -> Result<AccumulationState, ProjectionError> {
    let mut state = AccumulationState {
        capital: 0.0,
        income: inputs.initial_income,
        years: 0,
    };

    while !state.reached(target) {
        if max_years.is_some_and(|cap| state.years >= cap) {
            break;
        }

        // Savings land before the year's growth is applied.
        let net_income = inputs.net_income(state.income);
        let annual_savings = inputs.annual_savings(state.income);
        state.capital = (state.capital + annual_savings) * (1.0 + inputs.investment_return_rate);
        state.years += 1;

        if let Some(trace) = trace.as_deref_mut() {
            trace.push(YearTrace {
                year: state.years,
                gross_income: state.income,
                net_income,
                annual_savings,
                capital: state.capital,
            });
        }

        state.income *= 1.0 + next_year_raise(inputs, state.years)?;
    }

    Ok(state)
}

fn next_year_raise(inputs: &Inputs, years_elapsed: u64) -> Result<f64, ProjectionError> {
    if inputs.job_hopping_increase_rate > 0.0 {
        let since_last_hop = years_elapsed
            .checked_rem(u64::from(inputs.years_to_hop))
            .ok_or(ProjectionError::ModuloByZero {
                job_hopping_increase_rate: inputs.job_hopping_increase_rate,
            })?;
        if since_last_hop == 0 {
            return Ok(inputs.job_hopping_increase_rate);
        }
    }
    Ok(inputs.wage_increase_rate)
}
