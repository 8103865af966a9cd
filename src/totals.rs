//! Amount parsing and totals.

use crate::model::LineItem;

/// Parses the leading number of `input`, like a lenient form field would.
///
/// Leading whitespace is skipped and a comma counts as decimal separator.
/// Anything that does not start with a number, or is not finite, is 0.
pub fn parse_amount(input: &str) -> f64 {
    let normalized = input.trim_start().replace(',', ".");
    let bytes = normalized.as_bytes();

    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    // Optional exponent, only taken when complete.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match normalized[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Quantity times price; categories contribute nothing.
pub fn line_total(item: &LineItem) -> f64 {
    match item {
        LineItem::Item {
            quantity, price, ..
        } => parse_amount(quantity) * parse_amount(price),
        LineItem::Category { .. } => 0.0,
    }
}

pub fn grand_total(items: &[LineItem]) -> f64 {
    items.iter().map(line_total).sum()
}

/// Two decimals; a zero result never prints as "-0.00".
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value + 0.0)
}

/// Renders a parsed quantity without trailing zeros ("10", "2.5").
pub fn format_quantity(value: f64) -> String {
    format!("{}", value + 0.0)
}

/// Sum of one contiguous group of items.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtotal {
    /// Label of the opening category, `None` for items before the first one.
    pub category: Option<String>,
    pub amount: f64,
}

/// One subtotal per group.
///
/// A group opens at every category marker, and at the start of the list when
/// it does not begin with a category.
pub fn category_subtotals(items: &[LineItem]) -> Vec<Subtotal> {
    let mut groups: Vec<Subtotal> = Vec::new();

    for item in items {
        match item {
            LineItem::Category { description } => groups.push(Subtotal {
                category: Some(description.clone()),
                amount: 0.0,
            }),
            LineItem::Item { .. } => {
                if groups.is_empty() {
                    groups.push(Subtotal {
                        category: None,
                        amount: 0.0,
                    });
                }
                if let Some(group) = groups.last_mut() {
                    group.amount += line_total(item);
                }
            }
        }
    }

    groups
}
