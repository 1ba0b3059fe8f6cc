//! The structured result of one tax calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ContributionKind;

/// One social-security contribution as computed for a month.
///
/// # Example
///
/// ```
/// use colombia_tax_engine::config::ContributionKind;
/// use colombia_tax_engine::models::ContributionDetail;
/// use rust_decimal_macros::dec;
///
/// let health = ContributionDetail {
///     kind: ContributionKind::Health,
///     base: dec!(2000000),
///     rate: dec!(0.125),
///     amount: dec!(250000),
///     minimum_applied: false,
/// };
/// assert_eq!(health.base * health.rate, health.amount);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDetail {
    /// Which contribution this is.
    pub kind: ContributionKind,
    /// The contribution base (IBC) after the minimum floor.
    pub base: Decimal,
    /// The rate applied to the base.
    pub rate: Decimal,
    /// The monthly contribution (`base × rate`).
    pub amount: Decimal,
    /// Whether the statutory minimum replaced the income-derived base.
    pub minimum_applied: bool,
}

/// The tax attributed to one bracket of the progressive table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketLine {
    /// Lower bound of the bracket in tax units.
    pub lower_limit: Decimal,
    /// Upper bound of the bracket in tax units, `None` when unbounded.
    pub upper_limit: Option<Decimal>,
    /// Marginal rate as a percentage.
    pub rate: Decimal,
    /// Tax units of taxable income falling inside this bracket.
    pub taxable_units: Decimal,
    /// Annual tax in COP produced by this bracket.
    pub tax: Decimal,
}

/// The full derivation from monthly income to monthly net income.
///
/// A breakdown is a value object: it is created fresh by every calculation
/// and never mutated. All amounts are in COP at full decimal precision;
/// rounding is left to whoever presents it.
///
/// `total_monthly_deductions` includes the monthly tax as well as both
/// contributions, so `monthly_net_income` is what remains after all three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// The tax year whose configuration produced this breakdown.
    pub tax_year: i32,
    /// Gross monthly income.
    pub monthly_income: Decimal,
    /// Gross annual income (`monthly_income × 12`).
    pub annual_income: Decimal,
    /// Monthly health contribution.
    pub health: ContributionDetail,
    /// Monthly pension contribution.
    pub pension: ContributionDetail,
    /// Health plus pension for one month.
    pub total_monthly_contributions: Decimal,
    /// Health plus pension for the year.
    pub annual_contributions: Decimal,
    /// Presumptive costs for one month (annual figure over 12).
    pub monthly_presumptive_costs: Decimal,
    /// Presumptive costs for the year.
    pub annual_presumptive_costs: Decimal,
    /// Taxable income for one month (annual figure over 12).
    pub monthly_taxable_income: Decimal,
    /// Taxable income for the year; zero or negative for low incomes.
    pub annual_taxable_income: Decimal,
    /// Annual taxable income expressed in tax units.
    pub taxable_income_in_units: Decimal,
    /// Per-bracket tax, for every bracket the taxable income reaches.
    pub brackets: Vec<BracketLine>,
    /// Annual tax owed.
    pub annual_tax: Decimal,
    /// Monthly tax owed (`annual_tax / 12`).
    pub monthly_tax: Decimal,
    /// Annual tax as a percentage of annual income.
    pub effective_tax_rate: Decimal,
    /// Contributions plus monthly tax.
    pub total_monthly_deductions: Decimal,
    /// Monthly income left after all deductions.
    pub monthly_net_income: Decimal,
}

impl TaxBreakdown {
    /// Returns the contribution of the given kind.
    pub fn contribution(&self, kind: ContributionKind) -> &ContributionDetail {
        match kind {
            ContributionKind::Health => &self.health,
            ContributionKind::Pension => &self.pension,
        }
    }

    /// Returns both contributions in evaluation order.
    pub fn contributions(&self) -> [&ContributionDetail; 2] {
        [&self.health, &self.pension]
    }
}
