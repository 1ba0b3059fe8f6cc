//! The tax calculation pipeline.
//!
//! [`TaxCalculator`] holds one tax year's configuration and turns a monthly
//! income into a [`TaxBreakdown`]:
//!
//! 1. annual income = monthly income × 12
//! 2. contribution base per kind = max(income × base fraction, minimum)
//! 3. monthly contribution per kind = base × rate
//! 4. annual contributions = (health + pension) × 12
//! 5. presumptive costs = annual income × presumptive-costs rate
//! 6. taxable income = annual income − presumptive costs − annual contributions
//! 7. taxable income in units = taxable income / unit value
//! 8. annual tax from the progressive brackets
//! 9. monthly tax = annual tax / 12
//! 10. effective rate = annual tax / annual income × 100
//! 11. total deductions = contributions + monthly tax;
//!     net income = monthly income − total deductions
//!
//! Every figure is kept at full decimal precision. Total deductions include
//! the monthly tax, so the net income is what is left after contributions
//! and tax alike.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{ContributionKind, TaxYearConfig, TaxYearStore};
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditTrace, AuditWarning, TaxBreakdown, TaxCalculation};

use super::brackets::calculate_bracket_tax;
use super::contributions::calculate_contribution;
use super::income::{MONTHS_PER_YEAR, validate_monthly_income};

/// Warning code raised when taxable income is zero or negative.
pub const NO_TAXABLE_INCOME_WARNING: &str = "NO_TAXABLE_INCOME";

/// Computes income tax and contributions for one tax year.
///
/// The configuration is resolved once at construction and never changes, so
/// a calculator can be shared freely between threads.
///
/// # Example
///
/// ```
/// use colombia_tax_engine::calculation::TaxCalculator;
/// use colombia_tax_engine::config::ConfigLoader;
/// use rust_decimal_macros::dec;
///
/// let loader = ConfigLoader::builtin()?;
/// let calculator = TaxCalculator::new(&loader, 2025)?;
///
/// let breakdown = calculator.calculate_tax(dec!(5000000))?;
/// assert_eq!(breakdown.annual_tax, dec!(0));
/// assert_eq!(breakdown.monthly_net_income, dec!(4430000));
/// # Ok::<(), colombia_tax_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TaxCalculator {
    config: TaxYearConfig,
}

impl TaxCalculator {
    /// Creates a calculator for `year`, looking its configuration up in
    /// `store`.
    ///
    /// Fails with `ConfigurationNotFound` when the store has no such year,
    /// and with `InvalidConfiguration` when its record breaks a table
    /// invariant. Records are validated here whatever store they came from.
    pub fn new<S: TaxYearStore + ?Sized>(store: &S, year: i32) -> EngineResult<Self> {
        let config = store.lookup(year)?.clone();
        config.validate()?;
        debug!(
            year,
            unit_value = %config.unit_value,
            brackets = config.brackets.len(),
            "Resolved tax year configuration"
        );
        Ok(Self { config })
    }

    /// Creates a calculator from a configuration record, validating it first.
    pub fn from_config(config: TaxYearConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the tax year this calculator computes.
    pub fn year(&self) -> i32 {
        self.config.year
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &TaxYearConfig {
        &self.config
    }

    /// Computes the full breakdown for a monthly income.
    ///
    /// Identical inputs always produce identical breakdowns. Fails with
    /// `InvalidIncome` before any arithmetic when the income is not strictly
    /// positive or exceeds the supported maximum.
    pub fn calculate_tax(&self, monthly_income: Decimal) -> EngineResult<TaxBreakdown> {
        let (breakdown, _steps) = self.run_pipeline(monthly_income)?;
        Ok(breakdown)
    }

    /// Computes the breakdown and records an audit trace of every step.
    ///
    /// # Example
    ///
    /// ```
    /// use colombia_tax_engine::calculation::TaxCalculator;
    /// use colombia_tax_engine::config::ConfigLoader;
    /// use rust_decimal_macros::dec;
    ///
    /// let calculator = TaxCalculator::new(&ConfigLoader::builtin()?, 2025)?;
    /// let calculation = calculator.calculate_with_audit(dec!(20000000))?;
    ///
    /// assert_eq!(calculation.tax_year, 2025);
    /// assert!(!calculation.audit_trace.steps.is_empty());
    /// # Ok::<(), colombia_tax_engine::error::EngineError>(())
    /// ```
    pub fn calculate_with_audit(&self, monthly_income: Decimal) -> EngineResult<TaxCalculation> {
        let start_time = Instant::now();
        let (breakdown, steps) = self.run_pipeline(monthly_income)?;

        let mut warnings = Vec::new();
        if breakdown.annual_taxable_income <= Decimal::ZERO {
            warnings.push(AuditWarning {
                code: NO_TAXABLE_INCOME_WARNING.to_string(),
                message: format!(
                    "Contributions and presumptive costs exceed annual income; taxable income is {}",
                    breakdown.annual_taxable_income.normalize()
                ),
                severity: "low".to_string(),
            });
        }

        let duration_us = start_time.elapsed().as_micros() as u64;
        info!(
            year = self.config.year,
            monthly_income = %breakdown.monthly_income,
            annual_tax = %breakdown.annual_tax,
            monthly_net_income = %breakdown.monthly_net_income,
            duration_us,
            "Tax calculation completed"
        );

        Ok(TaxCalculation {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            tax_year: self.config.year,
            breakdown,
            audit_trace: AuditTrace {
                steps,
                warnings,
                duration_us,
            },
        })
    }

    fn run_pipeline(&self, monthly_income: Decimal) -> EngineResult<(TaxBreakdown, Vec<AuditStep>)> {
        validate_monthly_income(monthly_income)?;

        let config = &self.config;
        let mut steps = Vec::with_capacity(6);

        let annual_income = monthly_income * MONTHS_PER_YEAR;
        steps.push(AuditStep {
            step_number: 1,
            rule_id: "annual_income".to_string(),
            rule_name: "Annual Income".to_string(),
            input: serde_json::json!({ "monthly_income": monthly_income.to_string() }),
            output: serde_json::json!({ "annual_income": annual_income.to_string() }),
            reasoning: format!(
                "{} × 12 = {}",
                monthly_income.normalize(),
                annual_income.normalize()
            ),
        });
        debug!(%annual_income, "Annual income");

        let health = calculate_contribution(
            monthly_income,
            ContributionKind::Health,
            config.contributions.get(ContributionKind::Health),
            2,
        );
        let pension = calculate_contribution(
            monthly_income,
            ContributionKind::Pension,
            config.contributions.get(ContributionKind::Pension),
            3,
        );
        for result in [&health, &pension] {
            debug!(
                kind = %result.contribution.kind,
                base = %result.contribution.base,
                amount = %result.contribution.amount,
                minimum_applied = result.contribution.minimum_applied,
                "Monthly contribution"
            );
        }
        steps.push(health.audit_step);
        steps.push(pension.audit_step);
        let health = health.contribution;
        let pension = pension.contribution;

        let total_monthly_contributions = health.amount + pension.amount;
        let annual_contributions = total_monthly_contributions * MONTHS_PER_YEAR;
        let annual_presumptive_costs = annual_income * config.presumptive_costs_rate;
        let annual_taxable_income =
            annual_income - annual_presumptive_costs - annual_contributions;
        let taxable_income_in_units = annual_taxable_income / config.unit_value;

        steps.push(AuditStep {
            step_number: 4,
            rule_id: "taxable_income".to_string(),
            rule_name: "Taxable Income".to_string(),
            input: serde_json::json!({
                "annual_income": annual_income.to_string(),
                "presumptive_costs_rate": config.presumptive_costs_rate.to_string(),
                "annual_contributions": annual_contributions.to_string(),
                "unit_value": config.unit_value.to_string()
            }),
            output: serde_json::json!({
                "presumptive_costs": annual_presumptive_costs.to_string(),
                "taxable_income": annual_taxable_income.to_string(),
                "taxable_income_units": taxable_income_in_units.to_string()
            }),
            reasoning: format!(
                "{} − {} presumptive costs − {} contributions = {} ({} units)",
                annual_income.normalize(),
                annual_presumptive_costs.normalize(),
                annual_contributions.normalize(),
                annual_taxable_income.normalize(),
                taxable_income_in_units.round_dp(2)
            ),
        });
        debug!(
            %annual_contributions,
            %annual_presumptive_costs,
            %annual_taxable_income,
            %taxable_income_in_units,
            "Taxable income"
        );

        let bracket_tax = calculate_bracket_tax(
            taxable_income_in_units,
            &config.brackets,
            config.unit_value,
            5,
        );
        for line in &bracket_tax.lines {
            debug!(
                lower_limit = %line.lower_limit,
                upper_limit = ?line.upper_limit,
                rate = %line.rate,
                tax = %line.tax,
                "Bracket tax"
            );
        }
        steps.push(bracket_tax.audit_step);
        let annual_tax = bracket_tax.annual_tax;

        let monthly_tax = annual_tax / MONTHS_PER_YEAR;
        let effective_tax_rate = annual_tax / annual_income * Decimal::ONE_HUNDRED;
        let total_monthly_deductions = total_monthly_contributions + monthly_tax;
        let monthly_net_income = monthly_income - total_monthly_deductions;

        steps.push(AuditStep {
            step_number: 6,
            rule_id: "net_income".to_string(),
            rule_name: "Monthly Net Income".to_string(),
            input: serde_json::json!({
                "monthly_income": monthly_income.to_string(),
                "total_monthly_contributions": total_monthly_contributions.to_string(),
                "annual_tax": annual_tax.to_string()
            }),
            output: serde_json::json!({
                "monthly_tax": monthly_tax.to_string(),
                "effective_tax_rate": effective_tax_rate.to_string(),
                "total_monthly_deductions": total_monthly_deductions.to_string(),
                "monthly_net_income": monthly_net_income.to_string()
            }),
            reasoning: format!(
                "{} − ({} contributions + {} tax) = {}",
                monthly_income.normalize(),
                total_monthly_contributions.normalize(),
                monthly_tax.round_dp(2),
                monthly_net_income.round_dp(2)
            ),
        });
        debug!(
            %monthly_tax,
            %effective_tax_rate,
            %monthly_net_income,
            "Net income"
        );

        let breakdown = TaxBreakdown {
            tax_year: config.year,
            monthly_income,
            annual_income,
            health,
            pension,
            total_monthly_contributions,
            annual_contributions,
            monthly_presumptive_costs: annual_presumptive_costs / MONTHS_PER_YEAR,
            annual_presumptive_costs,
            monthly_taxable_income: annual_taxable_income / MONTHS_PER_YEAR,
            annual_taxable_income,
            taxable_income_in_units,
            brackets: bracket_tax.lines,
            annual_tax,
            monthly_tax,
            effective_tax_rate,
            total_monthly_deductions,
            monthly_net_income,
        };

        Ok((breakdown, steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, ContributionConfig, Contributions, TaxBracket};
    use crate::error::EngineError;
    use rust_decimal_macros::dec;

    fn calculator() -> TaxCalculator {
        TaxCalculator::new(&ConfigLoader::builtin().unwrap(), 2025).unwrap()
    }

    /// A flat 10% table above 100 units, one COP per unit, no contributions.
    fn create_test_config() -> TaxYearConfig {
        let no_contribution = ContributionConfig {
            rate: dec!(0),
            base: dec!(0),
            minimum: dec!(0),
        };

        TaxYearConfig {
            year: 2000,
            unit_value: dec!(1),
            minimum_wage: dec!(0),
            contributions: Contributions {
                health: no_contribution.clone(),
                pension: no_contribution,
            },
            presumptive_costs_rate: dec!(0),
            brackets: vec![
                TaxBracket {
                    lower_limit: dec!(0),
                    upper_limit: Some(dec!(100)),
                    rate: dec!(0),
                },
                TaxBracket {
                    lower_limit: dec!(100),
                    upper_limit: None,
                    rate: dec!(10),
                },
            ],
        }
    }

    #[test]
    fn test_unknown_year_fails_at_construction() {
        let loader = ConfigLoader::builtin().unwrap();
        match TaxCalculator::new(&loader, 2031) {
            Err(EngineError::ConfigurationNotFound { year }) => assert_eq!(year, 2031),
            other => panic!("Expected ConfigurationNotFound, got {:?}", other),
        }
    }

    /// A store that hands out its record without validating it.
    struct UncheckedStore(TaxYearConfig);

    impl TaxYearStore for UncheckedStore {
        fn lookup(&self, year: i32) -> EngineResult<&TaxYearConfig> {
            if year == self.0.year {
                Ok(&self.0)
            } else {
                Err(EngineError::ConfigurationNotFound { year })
            }
        }

        fn years(&self) -> Vec<i32> {
            vec![self.0.year]
        }
    }

    #[test]
    fn test_new_validates_records_from_any_store() {
        let mut config = create_test_config();
        config.unit_value = dec!(0);
        let store = UncheckedStore(config);

        match TaxCalculator::new(&store, 2000) {
            Err(EngineError::InvalidConfiguration { year, message }) => {
                assert_eq!(year, 2000);
                assert!(message.contains("unit value"));
            }
            other => panic!("Expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_new_accepts_valid_record_from_custom_store() {
        let store = UncheckedStore(create_test_config());
        let calculator = TaxCalculator::new(&store, 2000).unwrap();
        assert_eq!(calculator.calculate_tax(dec!(1000)).unwrap().annual_tax, dec!(1190));
    }

    #[test]
    fn test_from_config_validates() {
        let mut config = create_test_config();
        config.brackets[1].lower_limit = dec!(150);
        assert!(matches!(
            TaxCalculator::from_config(config),
            Err(EngineError::InvalidConfiguration { year: 2000, .. })
        ));
    }

    #[test]
    fn test_five_million_scenario() {
        let breakdown = calculator().calculate_tax(dec!(5000000)).unwrap();

        assert_eq!(breakdown.tax_year, 2025);
        assert_eq!(breakdown.annual_income, dec!(60000000));
        assert_eq!(breakdown.health.base, dec!(2000000));
        assert_eq!(breakdown.pension.base, dec!(2000000));
        assert_eq!(breakdown.health.amount, dec!(250000));
        assert_eq!(breakdown.pension.amount, dec!(320000));
        assert_eq!(breakdown.total_monthly_contributions, dec!(570000));
        assert_eq!(breakdown.annual_contributions, dec!(6840000));
        assert_eq!(breakdown.annual_presumptive_costs, dec!(15000000));
        assert_eq!(breakdown.monthly_presumptive_costs, dec!(1250000));
        assert_eq!(breakdown.annual_taxable_income, dec!(38160000));
        assert_eq!(breakdown.monthly_taxable_income, dec!(3180000));
        assert_eq!(breakdown.taxable_income_in_units.round_dp(2), dec!(766.28));
        assert_eq!(breakdown.annual_tax, dec!(0));
        assert_eq!(breakdown.monthly_tax, dec!(0));
        assert_eq!(breakdown.effective_tax_rate, dec!(0));
        assert_eq!(breakdown.total_monthly_deductions, dec!(570000));
        assert_eq!(breakdown.monthly_net_income, dec!(4430000));
    }

    #[test]
    fn test_low_income_uses_contribution_floor() {
        let breakdown = calculator().calculate_tax(dec!(1500000)).unwrap();

        assert_eq!(breakdown.health.base, dec!(1300000));
        assert_eq!(breakdown.pension.base, dec!(1300000));
        assert!(breakdown.health.minimum_applied);
        assert_eq!(breakdown.health.amount, dec!(162500));
        assert_eq!(breakdown.pension.amount, dec!(208000));
    }

    #[test]
    fn test_high_income_reaches_upper_brackets() {
        let breakdown = calculator().calculate_tax(dec!(50000000)).unwrap();

        // 600M − 150M − 12 × (20M × 0.285) = 381.6M
        assert_eq!(breakdown.annual_taxable_income, dec!(381600000));
        // 7,662.8 units: top bracket reached is 33%
        assert_eq!(breakdown.brackets.len(), 4);
        assert_eq!(breakdown.brackets[3].rate, dec!(33));
        assert!(breakdown.annual_tax > dec!(0));
        assert!(breakdown.effective_tax_rate > dec!(0));
        assert!(breakdown.effective_tax_rate < dec!(39));
        assert_eq!(
            breakdown.total_monthly_deductions,
            breakdown.total_monthly_contributions + breakdown.monthly_tax
        );
    }

    #[test]
    fn test_injected_config_bracket_math() {
        let calculator = TaxCalculator::from_config(create_test_config()).unwrap();
        // 1,000 × 12 = 12,000 taxable; 11,900 above 100 at 10%
        let breakdown = calculator.calculate_tax(dec!(1000)).unwrap();

        assert_eq!(breakdown.annual_taxable_income, dec!(12000));
        assert_eq!(breakdown.annual_tax, dec!(1190));
        assert_eq!(breakdown.monthly_tax, dec!(1190) / dec!(12));
        assert_eq!(breakdown.total_monthly_contributions, dec!(0));
    }

    #[test]
    fn test_non_positive_income_rejected() {
        let calculator = calculator();
        for income in [dec!(0), dec!(-1), dec!(-5000000)] {
            assert!(matches!(
                calculator.calculate_tax(income),
                Err(EngineError::InvalidIncome { .. })
            ));
        }
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let calculator = calculator();
        let first = calculator.calculate_tax(dec!(12345678.9)).unwrap();
        let second = calculator.calculate_tax(dec!(12345678.9)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_audit_trace_covers_pipeline() {
        let calculation = calculator().calculate_with_audit(dec!(30000000)).unwrap();

        let rule_ids: Vec<_> = calculation
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "annual_income",
                "health_contribution",
                "pension_contribution",
                "taxable_income",
                "bracket_tax",
                "net_income"
            ]
        );
        let numbers: Vec<_> = calculation
            .audit_trace
            .steps
            .iter()
            .map(|s| s.step_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
        assert!(calculation.audit_trace.warnings.is_empty());
        assert_eq!(calculation.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_audit_breakdown_matches_plain_calculation() {
        let calculator = calculator();
        let plain = calculator.calculate_tax(dec!(30000000)).unwrap();
        let audited = calculator.calculate_with_audit(dec!(30000000)).unwrap();
        assert_eq!(plain, audited.breakdown);
    }

    #[test]
    fn test_no_taxable_income_warning() {
        // Floors push contributions above what is left after presumptive costs
        let calculation = calculator().calculate_with_audit(dec!(400000)).unwrap();

        assert!(calculation.breakdown.annual_taxable_income < dec!(0));
        assert_eq!(calculation.breakdown.annual_tax, dec!(0));
        assert!(calculation.has_warning(NO_TAXABLE_INCOME_WARNING));
    }

    #[test]
    fn test_calculator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TaxCalculator>();
    }
}
