//! Report rendering for a tax breakdown.
//!
//! The breakdown carries full-precision decimals; this is the only place they
//! are rounded, and only for display.

use rust_decimal::{Decimal, RoundingStrategy};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::models::{BracketLine, ContributionDetail, TaxBreakdown, TaxCalculation};

#[derive(Debug, Clone, Tabled)]
struct AmountRow {
    #[tabled(rename = "Concepto")]
    concept: String,
    #[tabled(rename = "Valor")]
    value: String,
}

impl AmountRow {
    fn new(concept: impl Into<String>, value: String) -> Self {
        Self {
            concept: concept.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct BracketRow {
    #[tabled(rename = "Rango (UVT)")]
    range: String,
    #[tabled(rename = "Tarifa")]
    rate: String,
    #[tabled(rename = "UVT gravadas")]
    units: String,
    #[tabled(rename = "Impuesto")]
    tax: String,
}

impl From<&BracketLine> for BracketRow {
    fn from(line: &BracketLine) -> Self {
        let range = match line.upper_limit {
            Some(upper) => format!("{} - {}", line.lower_limit.normalize(), upper.normalize()),
            None => format!("> {}", line.lower_limit.normalize()),
        };
        Self {
            range,
            rate: format!("{}%", line.rate.normalize()),
            units: format_units(line.taxable_units),
            tax: format_currency(line.tax),
        }
    }
}

/// Formats an amount as Colombian pesos, rounded to the whole peso.
///
/// # Examples
///
/// ```
/// use colombia_tax_engine::cli::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(4430000)), "$4.430.000 COP");
/// assert_eq!(format_currency(dec!(1234.5)), "$1.235 COP");
/// assert_eq!(format_currency(dec!(-846000)), "-$846.000 COP");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${} COP", sign, group_thousands(&rounded.abs().normalize().to_string()))
}

/// Formats a percentage with two decimals (`3.14%`).
pub fn format_percentage(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("{}%", rounded)
}

/// Formats a fraction as a percentage without trailing zeros (`0.125` as
/// `12.5%`).
pub fn format_fraction(fraction: Decimal) -> String {
    format!("{}%", (fraction * Decimal::ONE_HUNDRED).normalize())
}

fn format_units(units: Decimal) -> String {
    let mut rounded = units.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

// `digits` is ASCII digits only, so char positions equal byte positions.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

fn table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}

fn contribution_row(label: &str, contribution: &ContributionDetail) -> AmountRow {
    let floor = if contribution.minimum_applied {
        ", mínimo"
    } else {
        ""
    };
    AmountRow::new(
        format!(
            "{} ({} de IBC {}{})",
            label,
            format_fraction(contribution.rate),
            format_currency(contribution.base),
            floor
        ),
        format_currency(contribution.amount),
    )
}

/// Renders the breakdown as a plain-text report of titled tables.
pub fn render_text(breakdown: &TaxBreakdown) -> String {
    let contributions = vec![
        contribution_row("Salud", &breakdown.health),
        contribution_row("Pensión", &breakdown.pension),
        AmountRow::new("Total", format_currency(breakdown.total_monthly_contributions)),
    ];

    let monthly = vec![
        AmountRow::new("Salario Mensual", format_currency(breakdown.monthly_income)),
        AmountRow::new(
            "Costos Presuntivos Mensuales",
            format_currency(breakdown.monthly_presumptive_costs),
        ),
        AmountRow::new(
            "Base Gravable Mensual",
            format_currency(breakdown.monthly_taxable_income),
        ),
        AmountRow::new(
            "Impuesto Mensual a Pagar",
            format_currency(breakdown.monthly_tax),
        ),
    ];

    let annual = vec![
        AmountRow::new("Ingreso Anual", format_currency(breakdown.annual_income)),
        AmountRow::new(
            "Costos Presuntivos Anuales",
            format_currency(breakdown.annual_presumptive_costs),
        ),
        AmountRow::new(
            "Aportes Anuales",
            format_currency(breakdown.annual_contributions),
        ),
        AmountRow::new(
            "Base Gravable Anual",
            format_currency(breakdown.annual_taxable_income),
        ),
        AmountRow::new(
            "Base Gravable en UVT",
            format_units(breakdown.taxable_income_in_units),
        ),
        AmountRow::new(
            "Impuesto Anual a Pagar",
            format_currency(breakdown.annual_tax),
        ),
        AmountRow::new(
            "Tasa Efectiva de Impuestos",
            format_percentage(breakdown.effective_tax_rate),
        ),
    ];

    let summary = vec![
        AmountRow::new(
            "Total Deducciones Mensuales",
            format_currency(breakdown.total_monthly_deductions),
        ),
        AmountRow::new(
            "Ingreso Neto Mensual",
            format_currency(breakdown.monthly_net_income),
        ),
    ];

    let mut out = format!("=== REPORTE DE IMPUESTOS {} ===\n\n", breakdown.tax_year);
    out.push_str(&format!("--- Aportes ---\n{}\n\n", table(contributions)));
    out.push_str(&format!("--- Valores Mensuales ---\n{}\n\n", table(monthly)));
    out.push_str(&format!("--- Valores Anuales ---\n{}\n\n", table(annual)));
    if breakdown.brackets.iter().any(|line| !line.tax.is_zero()) {
        let brackets: Vec<BracketRow> = breakdown.brackets.iter().map(BracketRow::from).collect();
        out.push_str(&format!("--- Tramos ---\n{}\n\n", table(brackets)));
    }
    out.push_str(&format!("--- Resumen ---\n{}\n", table(summary)));
    out
}

/// Renders an audited calculation as pretty-printed JSON.
pub fn render_json(calculation: &TaxCalculation) -> serde_json::Result<String> {
    serde_json::to_string_pretty(calculation)
}
