//! Projection of the years needed to save up to financial independence.

pub mod cli;
pub mod core;

pub use self::core::{Inputs, Projection, ProjectionError, ProjectionModel, SAFE_WITHDRAWAL_RATE};
