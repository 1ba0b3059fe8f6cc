//! Configuration types for a tax year.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the per-year YAML files, together with the
//! invariant checks every record must pass before the engine uses it.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Rates for one social-security contribution (health or pension).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionConfig {
    /// Fraction of the contribution base paid (e.g. 0.125 for health).
    pub rate: Decimal,
    /// Fraction of monthly income that forms the contribution base (IBC).
    pub base: Decimal,
    /// Monetary floor for the contribution base.
    pub minimum: Decimal,
}

/// The social-security contribution kinds computed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    /// Health (salud).
    Health,
    /// Pension (pensión).
    Pension,
}

impl ContributionKind {
    /// Every kind, in the order the engine evaluates them.
    pub const ALL: [ContributionKind; 2] = [ContributionKind::Health, ContributionKind::Pension];

    /// Stable identifier used in audit steps and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionKind::Health => "health",
            ContributionKind::Pension => "pension",
        }
    }
}

impl fmt::Display for ContributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contribution rules by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributions {
    /// Health contribution rules.
    pub health: ContributionConfig,
    /// Pension contribution rules.
    pub pension: ContributionConfig,
}

impl Contributions {
    /// Returns the rules for a contribution kind.
    pub fn get(&self, kind: ContributionKind) -> &ContributionConfig {
        match kind {
            ContributionKind::Health => &self.health,
            ContributionKind::Pension => &self.pension,
        }
    }
}

/// One row of the progressive table, in tax units (UVT).
///
/// A bracket covers `(lower_limit, upper_limit]`; the last bracket of a
/// table has no upper limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound in tax units (exclusive).
    pub lower_limit: Decimal,
    /// Upper bound in tax units (inclusive), `None` when unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_limit: Option<Decimal>,
    /// Marginal rate as a percentage (e.g. 19 for 19%).
    pub rate: Decimal,
}

impl TaxBracket {
    /// Width of the bracket in tax units, `None` when unbounded.
    pub fn width(&self) -> Option<Decimal> {
        self.upper_limit.map(|upper| upper - self.lower_limit)
    }
}

/// The complete configuration for one tax year.
///
/// Records are immutable once loaded; the engine only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    /// The tax year this record applies to.
    pub year: i32,
    /// Monetary value of one tax unit (UVT) in COP.
    pub unit_value: Decimal,
    /// Statutory monthly minimum wage in COP.
    pub minimum_wage: Decimal,
    /// Health and pension contribution rules.
    pub contributions: Contributions,
    /// Fraction of annual income deducted as presumptive costs.
    pub presumptive_costs_rate: Decimal,
    /// The progressive table, ordered by lower limit.
    pub brackets: Vec<TaxBracket>,
}

impl TaxYearConfig {
    /// Checks the table and rate invariants of this record.
    ///
    /// The brackets must start at 0, be contiguous
    /// (`brackets[i].upper_limit == brackets[i + 1].lower_limit`), end with a
    /// single unbounded bracket, and carry non-decreasing rates in `[0, 100)`.
    /// The unit value must be at least 1 and every rate, base and minimum
    /// must be non-negative.
    ///
    /// # Example
    ///
    /// ```
    /// use colombia_tax_engine::config::ConfigLoader;
    /// use colombia_tax_engine::config::TaxYearStore;
    ///
    /// let loader = ConfigLoader::builtin()?;
    /// let config = loader.lookup(2025)?;
    /// assert!(config.validate().is_ok());
    /// # Ok::<(), colombia_tax_engine::error::EngineError>(())
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.unit_value < Decimal::ONE {
            return Err(self.invalid(format!(
                "unit value must be at least 1, got {}",
                self.unit_value
            )));
        }
        if self.minimum_wage.is_sign_negative() {
            return Err(self.invalid("minimum wage must not be negative"));
        }
        if self.presumptive_costs_rate.is_sign_negative()
            || self.presumptive_costs_rate >= Decimal::ONE
        {
            return Err(self.invalid(format!(
                "presumptive costs rate must be in [0, 1), got {}",
                self.presumptive_costs_rate
            )));
        }

        for kind in ContributionKind::ALL {
            let contribution = self.contributions.get(kind);
            if contribution.rate.is_sign_negative()
                || contribution.base.is_sign_negative()
                || contribution.minimum.is_sign_negative()
            {
                return Err(self.invalid(format!(
                    "{} contribution rate, base and minimum must not be negative",
                    kind
                )));
            }
        }

        self.validate_brackets()
    }

    fn validate_brackets(&self) -> EngineResult<()> {
        let first = self
            .brackets
            .first()
            .ok_or_else(|| self.invalid("bracket table is empty"))?;
        if !first.lower_limit.is_zero() {
            return Err(self.invalid(format!(
                "first bracket must start at 0, got {}",
                first.lower_limit
            )));
        }

        let hundred = Decimal::ONE_HUNDRED;
        let mut previous_rate = Decimal::ZERO;
        let last_index = self.brackets.len() - 1;

        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate.is_sign_negative() || bracket.rate >= hundred {
                return Err(self.invalid(format!(
                    "bracket {} rate must be in [0, 100), got {}",
                    index, bracket.rate
                )));
            }
            if bracket.rate < previous_rate {
                return Err(self.invalid(format!(
                    "bracket {} rate {} is lower than the previous rate {}",
                    index, bracket.rate, previous_rate
                )));
            }
            previous_rate = bracket.rate;

            match (bracket.upper_limit, index == last_index) {
                (None, true) => {}
                (None, false) => {
                    return Err(self.invalid(format!(
                        "only the last bracket may be unbounded, bracket {} is not last",
                        index
                    )));
                }
                (Some(_), true) => {
                    return Err(self.invalid("last bracket must be unbounded"));
                }
                (Some(upper), false) => {
                    if upper <= bracket.lower_limit {
                        return Err(self.invalid(format!(
                            "bracket {} upper limit {} must exceed its lower limit {}",
                            index, upper, bracket.lower_limit
                        )));
                    }
                    let next = &self.brackets[index + 1];
                    if next.lower_limit != upper {
                        return Err(self.invalid(format!(
                            "bracket {} ends at {} but bracket {} starts at {}",
                            index,
                            upper,
                            index + 1,
                            next.lower_limit
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn invalid(&self, message: impl Into<String>) -> EngineError {
        EngineError::InvalidConfiguration {
            year: self.year,
            message: message.into(),
        }
    }
}
