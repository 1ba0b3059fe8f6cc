//! Monthly income validation.
//!
//! The calculator accepts any strictly positive decimal up to
//! [`MAX_MONTHLY_INCOME`]. Turning user text into a decimal is the caller's
//! job; this module only guards the pipeline against values it must not see.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{EngineError, EngineResult};

/// Number of months in a tax year.
pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// The largest monthly income the pipeline accepts (10^18 COP).
///
/// Keeps every intermediate figure well inside the range of [`Decimal`].
pub const MAX_MONTHLY_INCOME: Decimal = dec!(1000000000000000000);

/// Rejects monthly incomes that are zero, negative, or beyond
/// [`MAX_MONTHLY_INCOME`].
///
/// # Examples
///
/// ```
/// use colombia_tax_engine::calculation::validate_monthly_income;
/// use rust_decimal_macros::dec;
///
/// assert!(validate_monthly_income(dec!(5000000)).is_ok());
/// assert!(validate_monthly_income(dec!(0)).is_err());
/// assert!(validate_monthly_income(dec!(-1)).is_err());
/// ```
pub fn validate_monthly_income(monthly_income: Decimal) -> EngineResult<()> {
    if monthly_income <= Decimal::ZERO {
        return Err(EngineError::InvalidIncome {
            input: monthly_income.to_string(),
            message: "monthly income must be greater than zero".to_string(),
        });
    }

    if monthly_income > MAX_MONTHLY_INCOME {
        return Err(EngineError::InvalidIncome {
            input: monthly_income.to_string(),
            message: format!("monthly income must not exceed {}", MAX_MONTHLY_INCOME),
        });
    }

    Ok(())
}
