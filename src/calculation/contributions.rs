//! Health and pension contribution calculation.
//!
//! Each contribution kind has its own base fraction, minimum and rate, so the
//! contribution base (IBC) is computed independently per kind even though the
//! statutory tables usually give both kinds the same base.

use rust_decimal::Decimal;

use crate::config::{ContributionConfig, ContributionKind};
use crate::models::{AuditStep, ContributionDetail};

/// The result of computing one contribution, including its audit step.
#[derive(Debug, Clone)]
pub struct ContributionResult {
    /// The computed contribution.
    pub contribution: ContributionDetail,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the contribution base: `max(income × base, minimum)`.
///
/// # Examples
///
/// ```
/// use colombia_tax_engine::calculation::contribution_base;
/// use colombia_tax_engine::config::ContributionConfig;
/// use rust_decimal_macros::dec;
///
/// let config = ContributionConfig {
///     rate: dec!(0.125),
///     base: dec!(0.4),
///     minimum: dec!(1300000),
/// };
///
/// assert_eq!(contribution_base(dec!(5000000), &config), dec!(2000000));
/// assert_eq!(contribution_base(dec!(2000000), &config), dec!(1300000));
/// ```
pub fn contribution_base(monthly_income: Decimal, config: &ContributionConfig) -> Decimal {
    let computed = monthly_income * config.base;
    computed.max(config.minimum)
}

/// Computes one monthly contribution and records how it was derived.
///
/// # Arguments
///
/// * `monthly_income` - Gross monthly income in COP
/// * `kind` - Which contribution is being computed
/// * `config` - The rate, base fraction and minimum for that kind
/// * `step_number` - The step number for audit trail sequencing
pub fn calculate_contribution(
    monthly_income: Decimal,
    kind: ContributionKind,
    config: &ContributionConfig,
    step_number: u32,
) -> ContributionResult {
    let computed_base = monthly_income * config.base;
    let minimum_applied = computed_base < config.minimum;
    let base = contribution_base(monthly_income, config);
    let amount = base * config.rate;

    let reasoning = if minimum_applied {
        format!(
            "{} × {} = {} is below the minimum {}; {} × {} = {}",
            monthly_income.normalize(),
            config.base.normalize(),
            computed_base.normalize(),
            config.minimum.normalize(),
            base.normalize(),
            config.rate.normalize(),
            amount.normalize()
        )
    } else {
        format!(
            "{} × {} = {}; {} × {} = {}",
            monthly_income.normalize(),
            config.base.normalize(),
            base.normalize(),
            base.normalize(),
            config.rate.normalize(),
            amount.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: format!("{}_contribution", kind),
        rule_name: match kind {
            ContributionKind::Health => "Health Contribution".to_string(),
            ContributionKind::Pension => "Pension Contribution".to_string(),
        },
        input: serde_json::json!({
            "monthly_income": monthly_income.to_string(),
            "base_fraction": config.base.to_string(),
            "minimum": config.minimum.to_string(),
            "rate": config.rate.to_string()
        }),
        output: serde_json::json!({
            "contribution_base": base.to_string(),
            "minimum_applied": minimum_applied,
            "amount": amount.to_string()
        }),
        reasoning,
    };

    ContributionResult {
        contribution: ContributionDetail {
            kind,
            base,
            rate: config.rate,
            amount,
            minimum_applied,
        },
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn health_config() -> ContributionConfig {
        ContributionConfig {
            rate: dec!(0.125),
            base: dec!(0.4),
            minimum: dec!(1300000),
        }
    }

    fn pension_config() -> ContributionConfig {
        ContributionConfig {
            rate: dec!(0.16),
            base: dec!(0.4),
            minimum: dec!(1300000),
        }
    }

    #[test]
    fn test_base_uses_fraction_above_floor() {
        assert_eq!(
            contribution_base(dec!(5000000), &health_config()),
            dec!(2000000)
        );
    }

    #[test]
    fn test_base_floored_at_minimum() {
        assert_eq!(
            contribution_base(dec!(1000000), &health_config()),
            dec!(1300000)
        );
        assert_eq!(
            contribution_base(dec!(3249999), &health_config()),
            dec!(1300000)
        );
    }

    #[test]
    fn test_base_at_exact_crossover() {
        // 3,250,000 × 0.4 == 1,300,000
        assert_eq!(
            contribution_base(dec!(3250000), &health_config()),
            dec!(1300000)
        );
        assert_eq!(
            contribution_base(dec!(3250001), &health_config()),
            dec!(1300000.4)
        );
    }

    #[test]
    fn test_health_contribution_for_five_million() {
        let result = calculate_contribution(
            dec!(5000000),
            ContributionKind::Health,
            &health_config(),
            1,
        );

        assert_eq!(result.contribution.base, dec!(2000000));
        assert_eq!(result.contribution.amount, dec!(250000));
        assert!(!result.contribution.minimum_applied);
        assert_eq!(result.audit_step.rule_id, "health_contribution");
        let recorded: Decimal = result.audit_step.output["amount"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(recorded, dec!(250000));
    }

    #[test]
    fn test_pension_contribution_for_five_million() {
        let result = calculate_contribution(
            dec!(5000000),
            ContributionKind::Pension,
            &pension_config(),
            2,
        );

        assert_eq!(result.contribution.amount, dec!(320000));
        assert_eq!(result.contribution.kind, ContributionKind::Pension);
        assert_eq!(result.audit_step.step_number, 2);
        assert_eq!(result.audit_step.rule_name, "Pension Contribution");
    }

    #[test]
    fn test_minimum_applied_is_recorded() {
        let result = calculate_contribution(
            dec!(2000000),
            ContributionKind::Health,
            &health_config(),
            1,
        );

        assert_eq!(result.contribution.base, dec!(1300000));
        assert_eq!(result.contribution.amount, dec!(162500));
        assert!(result.contribution.minimum_applied);
        assert_eq!(result.audit_step.output["minimum_applied"], true);
        assert!(result.audit_step.reasoning.contains("below the minimum"));
    }

    #[test]
    fn test_kinds_use_their_own_rules() {
        let mut pension = pension_config();
        pension.base = dec!(0.7);
        pension.minimum = dec!(0);

        let health = calculate_contribution(
            dec!(1000000),
            ContributionKind::Health,
            &health_config(),
            1,
        );
        let pension = calculate_contribution(dec!(1000000), ContributionKind::Pension, &pension, 2);

        assert_eq!(health.contribution.base, dec!(1300000));
        assert_eq!(pension.contribution.base, dec!(700000));
    }
}
