//! Calculation logic for the tax engine.
//!
//! This module contains the income guard, the per-kind contribution
//! calculation, the progressive bracket accumulation, and the
//! [`TaxCalculator`] that chains them into the full pipeline from monthly
//! income to monthly net income.

mod brackets;
mod calculator;
mod contributions;
mod income;

pub use brackets::{BracketTaxResult, calculate_bracket_tax};
pub use calculator::{NO_TAXABLE_INCOME_WARNING, TaxCalculator};
pub use contributions::{ContributionResult, calculate_contribution, contribution_base};
pub use income::{MAX_MONTHLY_INCOME, MONTHS_PER_YEAR, validate_monthly_income};
