// Tooltip and label formatting for chart values
use super::dataset::FieldValue;
use std::sync::Arc;

/// Formats a monetary amount for display
pub trait CurrencyFormatter: Send + Sync {
    fn format_currency(&self, amount: f64) -> String;
}

/// Currency rendered as a prefix symbol and a grouped fixed-point amount
#[derive(Debug, Clone)]
pub struct SymbolCurrency {
    pub symbol: String,
    pub decimals: usize,
}

impl SymbolCurrency {
    pub fn new(symbol: impl Into<String>, decimals: usize) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
        }
    }
}

impl Default for SymbolCurrency {
    fn default() -> Self {
        Self::new("$", 2)
    }
}

impl CurrencyFormatter for SymbolCurrency {
    fn format_currency(&self, amount: f64) -> String {
        let fixed = format!("{:.*}", self.decimals, amount.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let mut result = String::new();
        if amount < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
            result.push('-');
        }
        result.push_str(&self.symbol);
        result.push_str(&group_digits(int_part));
        if let Some(frac) = frac_part {
            result.push('.');
            result.push_str(frac);
        }
        result
    }
}

/// Picks a formatter per series field name.
///
/// Fields whose name contains "revenue" or "spend" are treated as money.
/// The substring test is case-sensitive but accepts the camelCase word form,
/// so `adRevenue` and `totalSpend` match while `REVENUE` does not.
#[derive(Clone)]
pub struct ValueFormatter {
    currency: Arc<dyn CurrencyFormatter>,
}

impl ValueFormatter {
    pub fn new(currency: Arc<dyn CurrencyFormatter>) -> Self {
        Self { currency }
    }

    pub fn is_currency_field(field: &str) -> bool {
        const MARKERS: [&str; 4] = ["revenue", "Revenue", "spend", "Spend"];
        MARKERS.iter().any(|marker| field.contains(marker))
    }

    pub fn format(&self, field: &str, value: &FieldValue) -> String {
        match value {
            FieldValue::Number(n) if Self::is_currency_field(field) => {
                self.currency.format_currency(*n)
            }
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self::new(Arc::new(SymbolCurrency::default()))
    }
}

/// Thousands-grouped number with at most two fraction digits
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }

    let fixed = format!("{:.2}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut result = String::new();
    if n < 0.0 && (int_part != "0" || !frac.is_empty()) {
        result.push('-');
    }
    result.push_str(&group_digits(int_part));
    if !frac.is_empty() {
        result.push('.');
        result.push_str(frac);
    }
    result
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
