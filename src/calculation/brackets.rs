//! Progressive bracket accumulation.
//!
//! Taxable income expressed in tax units is spread across the brackets of the
//! table from the bottom up. Each bracket taxes only the part of the income
//! that falls inside it, so the resulting tax is continuous in the income:
//! crossing a bracket boundary never causes a jump.

use rust_decimal::Decimal;

use crate::config::TaxBracket;
use crate::models::{AuditStep, BracketLine};

/// The result of applying the bracket table, including the audit step.
#[derive(Debug, Clone)]
pub struct BracketTaxResult {
    /// Annual tax in COP, summed over all brackets.
    pub annual_tax: Decimal,
    /// One line per bracket the taxable income reaches.
    pub lines: Vec<BracketLine>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes annual tax for a taxable income given in tax units.
///
/// For every bracket whose lower limit the income exceeds, the taxed amount is
/// `min(units − lower_limit, upper_limit − lower_limit)` and the bracket's tax
/// is `amount × rate / 100 × unit_value`. Brackets are expected in ascending
/// order, so accumulation stops at the first bracket the income does not
/// exceed. Zero or negative incomes produce no lines and no tax.
///
/// # Arguments
///
/// * `taxable_units` - Annual taxable income divided by the unit value
/// * `brackets` - The progressive table, ascending and contiguous
/// * `unit_value` - COP value of one tax unit
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use colombia_tax_engine::calculation::calculate_bracket_tax;
/// use colombia_tax_engine::config::TaxBracket;
/// use rust_decimal_macros::dec;
///
/// let brackets = vec![
///     TaxBracket { lower_limit: dec!(0), upper_limit: Some(dec!(1090)), rate: dec!(0) },
///     TaxBracket { lower_limit: dec!(1090), upper_limit: None, rate: dec!(19) },
/// ];
///
/// let result = calculate_bracket_tax(dec!(1190), &brackets, dec!(100), 1);
///
/// // 100 units above 1090 at 19%, each unit worth 100 COP
/// assert_eq!(result.annual_tax, dec!(1900));
/// assert_eq!(result.lines.len(), 2);
/// ```
pub fn calculate_bracket_tax(
    taxable_units: Decimal,
    brackets: &[TaxBracket],
    unit_value: Decimal,
    step_number: u32,
) -> BracketTaxResult {
    let hundred = Decimal::ONE_HUNDRED;
    let mut annual_tax = Decimal::ZERO;
    let mut lines = Vec::new();

    for bracket in brackets {
        if taxable_units <= bracket.lower_limit {
            break;
        }

        let above_lower = taxable_units - bracket.lower_limit;
        let taxed_units = match bracket.width() {
            Some(width) => above_lower.min(width),
            None => above_lower,
        };
        let tax = taxed_units * bracket.rate / hundred * unit_value;
        annual_tax += tax;

        lines.push(BracketLine {
            lower_limit: bracket.lower_limit,
            upper_limit: bracket.upper_limit,
            rate: bracket.rate,
            taxable_units: taxed_units,
            tax,
        });
    }

    let reasoning = match lines.last() {
        None => format!(
            "Taxable income of {} units does not exceed the first bracket; no tax",
            taxable_units.round_dp(2)
        ),
        Some(top) => format!(
            "Taxable income of {} units reaches {} bracket(s), top marginal rate {}%; annual tax {}",
            taxable_units.round_dp(2),
            lines.len(),
            top.rate.normalize(),
            annual_tax.round_dp(2)
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "bracket_tax".to_string(),
        rule_name: "Progressive Bracket Tax".to_string(),
        input: serde_json::json!({
            "taxable_income_units": taxable_units.to_string(),
            "unit_value": unit_value.to_string(),
            "bracket_count": brackets.len()
        }),
        output: serde_json::json!({
            "annual_tax": annual_tax.to_string(),
            "brackets": lines
                .iter()
                .map(|line| serde_json::json!({
                    "lower_limit": line.lower_limit.to_string(),
                    "upper_limit": line.upper_limit.map(|u| u.to_string()),
                    "rate": line.rate.to_string(),
                    "taxable_units": line.taxable_units.to_string(),
                    "tax": line.tax.to_string()
                }))
                .collect::<Vec<_>>()
        }),
        reasoning,
    };

    BracketTaxResult {
        annual_tax,
        lines,
        audit_step,
    }
}
