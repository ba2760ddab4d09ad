//! Formatting helpers shared by the terminal renderers
//!
//! Amounts arrive as plain `f64`; the currency symbol comes from settings.

use chrono::NaiveDate;
use std::fmt::Write;

use crate::analytics::TrendDirection;

/// Width of section rules in terminal output
pub const RULE_WIDTH: usize = 64;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format an amount with thousands separators and two decimals
///
/// ```
/// use finsight::display::report::format_amount;
///
/// assert_eq!(format_amount(-1234.5, "$"), "-$1,234.50");
/// ```
pub fn format_amount(amount: f64, symbol: &str) -> String {
    if !amount.is_finite() {
        return format!("{}0.00", symbol);
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    format!("{}{}{}.{:02}", sign, symbol, whole, cents % 100)
}

/// Like [`format_amount`] but always carries a sign
pub fn format_signed_amount(amount: f64, symbol: &str) -> String {
    if amount > 0.0 {
        format!("+{}", format_amount(amount, symbol))
    } else {
        format_amount(amount, symbol)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format a percentage with precision that shrinks as the value grows
pub fn format_percentage(pct: f64) -> String {
    let magnitude = pct.abs();
    if magnitude > 0.0 && magnitude < 0.1 {
        format!("{:.2}%", pct)
    } else if magnitude < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Signed percentage change, e.g. `+12.5%`
pub fn format_change(pct: f64) -> String {
    if pct > 0.0 {
        format!("+{}", format_percentage(pct))
    } else {
        format_percentage(pct)
    }
}

/// Direction arrow followed by the strength
pub fn format_trend(direction: TrendDirection, strength: f64) -> String {
    format!("{} {:.1}%", direction.symbol(), strength)
}

/// Horizontal bar for a value out of `max_value`
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 || !value.is_finite() {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a date with a strftime pattern
///
/// Patterns chrono cannot apply to a bare date (unknown specifiers, time
/// fields) fall back to ISO `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        out.clear();
        out.push_str(&date.format(ISO_DATE_FORMAT).to_string());
    }
    out
}

/// Section title framed by a double rule
pub fn section_header(title: &str) -> String {
    format!("{}\n{}\n{}\n", "═".repeat(RULE_WIDTH), title, "═".repeat(RULE_WIDTH))
}

/// Truncate to `max_chars` characters with an ellipsis
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 3 {
        return ".".repeat(max_chars);
    }
    let kept: String = s.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}
