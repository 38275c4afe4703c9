use chrono::NaiveDate;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Symbol-prefixed amounts with grouped thousands, e.g. `₪1,234.50`.
#[derive(Debug, Clone)]
pub struct SymbolCurrencyFormatter {
    symbol: String,
    precision: usize,
}

impl SymbolCurrencyFormatter {
    pub fn new(symbol: impl Into<String>, precision: u8) -> Self {
        Self {
            symbol: symbol.into(),
            precision: precision as usize,
        }
    }
}

impl Default for SymbolCurrencyFormatter {
    fn default() -> Self {
        Self::new("₪", 2)
    }
}

impl CurrencyFormatter for SymbolCurrencyFormatter {
    fn format_amount(&self, amount: f64) -> String {
        let raw = format!("{:.*}", self.precision, amount.abs());
        let (whole, fraction) = match raw.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (raw.as_str(), None),
        };
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (idx, ch) in whole.chars().enumerate() {
            if idx > 0 && (whole.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if amount < 0.0 && raw.chars().any(|c| c.is_ascii_digit() && c != '0') {
            "-"
        } else {
            ""
        };
        match fraction {
            Some(fraction) => format!("{sign}{}{grouped}.{fraction}", self.symbol),
            None => format!("{sign}{}{grouped}", self.symbol),
        }
    }
}

/// `DD/MM/YYYY`, as used on committee reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayFirstDateFormatter;

impl DateFormatter for DayFirstDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%d/%m/%Y").to_string()
    }
}
