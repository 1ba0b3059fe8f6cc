//! Reading a monthly income from the user.
//!
//! Incomes are typed the Colombian way, with `.` grouping thousands
//! (`15.000.000`) and `,` before decimals (`15.000.000,00`). Input grouped
//! with commas only (`15,000,000`) is read as thousands grouping as well.
//! Amounts must be whole pesos: a non-zero fraction is rejected.

use std::io::{self, BufRead, Write};

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculation::validate_monthly_income;
use crate::error::{EngineError, EngineResult};

/// Prompt shown when asking for the monthly income.
pub const INCOME_PROMPT: &str = "Ingrese su salario mensual (COP): ";

/// Message shown after an invalid entry.
pub const INVALID_INCOME_HINT: &str =
    "Por favor ingrese un valor numérico válido mayor a 0 (ejemplo: 15.000.000 o 15,000,000)";

/// Parses a Colombian-formatted monthly income.
///
/// Whitespace anywhere in the input is ignored.
///
/// # Examples
///
/// ```
/// use colombia_tax_engine::cli::parse_formatted_income;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_formatted_income("15.000.000").unwrap(), dec!(15000000));
/// assert_eq!(parse_formatted_income("15,000,000").unwrap(), dec!(15000000));
/// assert_eq!(parse_formatted_income("15.000.000,00").unwrap(), dec!(15000000));
/// assert!(parse_formatted_income("15.000.000,50").is_err());
/// assert!(parse_formatted_income("0").is_err());
/// ```
pub fn parse_formatted_income(input: &str) -> EngineResult<Decimal> {
    let invalid = |message: &str| EngineError::InvalidIncome {
        input: input.to_string(),
        message: message.to_string(),
    };

    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(invalid("no amount entered"));
    }

    let (integer_part, fraction) = if uses_comma_grouping(&cleaned) {
        (cleaned.replace(',', ""), "")
    } else {
        let (integer, fraction) = cleaned.split_once(',').unwrap_or((cleaned.as_str(), ""));
        if !is_grouped_by(integer, '.') {
            return Err(invalid("expected digits grouped with '.'"));
        }
        (integer.replace('.', ""), fraction)
    };

    if integer_part.is_empty() || !integer_part.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected digits grouped with '.'"));
    }
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected digits after ','"));
    }
    if fraction.chars().any(|c| c != '0') {
        return Err(invalid("amounts must be whole pesos"));
    }

    let amount: Decimal = integer_part
        .parse()
        .map_err(|_| invalid("amount is too large"))?;

    validate_monthly_income(amount).map_err(|err| match err {
        EngineError::InvalidIncome { message, .. } => invalid(&message),
        other => other,
    })?;

    Ok(amount)
}

/// True for inputs like `15,000,000`: no `.` and every comma followed by
/// exactly three digits.
fn uses_comma_grouping(cleaned: &str) -> bool {
    !cleaned.contains('.') && cleaned.contains(',') && is_grouped_by(cleaned, ',')
}

/// True when `separator` either does not occur or splits `integer` into a
/// 1-3 character head followed by groups of exactly three.
fn is_grouped_by(integer: &str, separator: char) -> bool {
    if !integer.contains(separator) {
        return true;
    }
    let mut groups = integer.split(separator);
    let head_ok = groups
        .next()
        .is_some_and(|head| !head.is_empty() && head.len() <= 3);
    head_ok && groups.all(|group| group.len() == 3)
}

/// Asks for the monthly income until a valid amount is entered.
///
/// Returns `Ok(None)` when the input ends before a valid amount is read.
pub fn prompt_income<R: BufRead, W: Write>(mut reader: R, mut writer: W) -> io::Result<Option<Decimal>> {
    let mut line = String::new();

    loop {
        write!(writer, "{}", INCOME_PROMPT)?;
        writer.flush()?;

        line.clear();
        if reader.read_line(&mut line)? == 0 {
            writeln!(writer)?;
            return Ok(None);
        }

        match parse_formatted_income(&line) {
            Ok(amount) => return Ok(Some(amount)),
            Err(err) => {
                warn!(error = %err, "Rejected income entry");
                writeln!(writer, "{}", INVALID_INCOME_HINT)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    #[test]
    fn test_plain_digits() {
        assert_eq!(parse_formatted_income("5000000").unwrap(), dec!(5000000));
    }

    #[test]
    fn test_dot_grouping() {
        assert_eq!(parse_formatted_income("5.000.000").unwrap(), dec!(5000000));
    }

    #[test]
    fn test_comma_grouping() {
        assert_eq!(parse_formatted_income("5,000,000").unwrap(), dec!(5000000));
        assert_eq!(parse_formatted_income("15,000").unwrap(), dec!(15000));
    }

    #[test]
    fn test_whitespace_ignored() {
        assert_eq!(
            parse_formatted_income("  5 000 000 \n").unwrap(),
            dec!(5000000)
        );
    }

    #[test]
    fn test_zero_fraction_accepted() {
        assert_eq!(parse_formatted_income("1.500.000,00").unwrap(), dec!(1500000));
        assert_eq!(parse_formatted_income("1500000,").unwrap(), dec!(1500000));
    }

    #[test]
    fn test_decimal_fraction_rejected() {
        match parse_formatted_income("1.500.000,50") {
            Err(EngineError::InvalidIncome { input, message }) => {
                assert_eq!(input, "1.500.000,50");
                assert!(message.contains("whole pesos"));
            }
            other => panic!("Expected InvalidIncome, got {:?}", other),
        }
        // Two decimals after a comma are not a thousands group
        assert!(parse_formatted_income("1500,50").is_err());
    }

    #[test]
    fn test_non_numeric_rejected() {
        for input in ["", "   ", "abc", "12a", "-5000", "$5.000", "1,2,3"] {
            assert!(
                parse_formatted_income(input).is_err(),
                "expected '{}' to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_dot_as_decimal_point_rejected() {
        for input in ["5000000.50", "1.5", "12.5", "1.2.3", "4.500.000.5", ".500", "1500.000,50"] {
            assert!(
                parse_formatted_income(input).is_err(),
                "expected '{}' to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_zero_rejected() {
        match parse_formatted_income("0.000") {
            Err(EngineError::InvalidIncome { message, .. }) => {
                assert!(message.contains("greater than zero"));
            }
            other => panic!("Expected InvalidIncome, got {:?}", other),
        }
    }

    #[test]
    fn test_overlong_amount_rejected() {
        assert!(parse_formatted_income("99999999999999999999999999999999").is_err());
        assert!(parse_formatted_income("10000000000000000000").is_err());
    }

    #[test]
    fn test_prompt_retries_until_valid() {
        let input = Cursor::new("abc\n0\n4.500.000\n");
        let mut output = Vec::new();

        let income = prompt_income(input, &mut output).unwrap();

        assert_eq!(income, Some(dec!(4500000)));
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches(INCOME_PROMPT).count(), 3);
        assert_eq!(printed.matches(INVALID_INCOME_HINT).count(), 2);
    }

    #[test]
    fn test_prompt_returns_none_at_end_of_input() {
        let input = Cursor::new("nope\n");
        let mut output = Vec::new();

        assert_eq!(prompt_income(input, &mut output).unwrap(), None);
    }
}
