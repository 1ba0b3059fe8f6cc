//! Core data models for the tax engine.
//!
//! This module contains the result types produced by the calculator.

mod calculation_result;
mod tax_breakdown;

pub use calculation_result::{AuditStep, AuditTrace, AuditWarning, TaxCalculation};
pub use tax_breakdown::{BracketLine, ContributionDetail, TaxBreakdown};
