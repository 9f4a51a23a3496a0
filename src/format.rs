//! Boundary between editable text fields and the numeric model.
//!
//! Formatting is lossy and one-way. Nothing rendered here is parsed back
//! except the user's own keystrokes in the editable fields.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

pub const CURRENCY_PREFIX: &str = "$ ";
pub const PERCENT_SUFFIX: &str = " %";

/// How an editable field is decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Odds,
    Currency,
    Percent,
}

#[allow(clippy::expect_used)] // Patterns are compile-time constants
fn currency_regex() -> &'static Regex {
    static CURRENCY_REGEX: OnceLock<Regex> = OnceLock::new();
    CURRENCY_REGEX
        .get_or_init(|| Regex::new(r"^\$ (\d*?\.?\d{0,2})$").expect("currency regex is valid"))
}

#[allow(clippy::expect_used)] // Patterns are compile-time constants
fn percent_regex() -> &'static Regex {
    static PERCENT_REGEX: OnceLock<Regex> = OnceLock::new();
    PERCENT_REGEX.get_or_init(|| Regex::new(r"^(\d*\.?\d*) %$").expect("percent regex is valid"))
}

/// Nearest whole number of cents, with ties away from zero.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// `"$ "` followed by the amount at two decimals, dropping them for whole values.
pub fn format_currency(amount: f64) -> String {
    let cents = round_to_cents(amount);
    if cents == 0.0 {
        format!("{CURRENCY_PREFIX}0")
    } else if cents.fract() == 0.0 {
        format!("{CURRENCY_PREFIX}{cents:.0}")
    } else {
        format!("{CURRENCY_PREFIX}{cents:.2}")
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}{PERCENT_SUFFIX}")
}

/// Edit-buffer form of a percent value: `"60 %"`, `"12.5 %"`.
pub fn percent_buffer(value: f64) -> String {
    format!("{value}{PERCENT_SUFFIX}")
}

/// Edit-buffer form of an amount: `"$ 10"`, `"$ 12.5"`. Sub-cent digits are
/// rounded away so the buffer always passes the currency mask.
pub fn currency_buffer(amount: f64) -> String {
    format!("{CURRENCY_PREFIX}{}", round_to_cents(amount))
}

/// Whether a keystroke producing `text` should be kept. Empty input is an
/// in-progress edit and always accepted.
pub fn accepts_edit(format: FieldFormat, text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    match format {
        FieldFormat::Odds => text
            .chars()
            .enumerate()
            .all(|(i, c)| c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))),
        FieldFormat::Currency => currency_regex().is_match(text),
        FieldFormat::Percent => percent_regex().is_match(text),
    }
}

/// Parses a currency buffer. `None` while the buffer holds no number yet.
pub fn parse_currency(text: &str) -> Option<f64> {
    let caps = currency_regex().captures(text)?;
    caps.get(1)?.as_str().parse::<f64>().ok()
}

/// Parses a percent buffer into a fraction (`"60 %"` is `0.6`).
pub fn parse_percent_fraction(text: &str) -> Option<f64> {
    let caps = percent_regex().captures(text)?;
    caps.get(1)?
        .as_str()
        .parse::<f64>()
        .ok()
        .map(|percent| percent / 100.0)
}

/// The part of a field's text a click or focus should select: the number
/// without its decoration.
pub fn editable_range(format: FieldFormat, text: &str) -> Range<u32> {
    let len = text.len() as u32;
    match format {
        FieldFormat::Odds => 0..len,
        FieldFormat::Currency if text.starts_with(CURRENCY_PREFIX) => {
            CURRENCY_PREFIX.len() as u32..len
        }
        FieldFormat::Percent if text.ends_with(PERCENT_SUFFIX) => {
            0..len - PERCENT_SUFFIX.len() as u32
        }
        _ => 0..len,
    }
}
