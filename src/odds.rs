//! American odds and their multiplicative (decimal) equivalent.

use std::fmt;

use crate::error::InvalidOddsError;

/// A signed American odds line such as `+150` or `-110`.
///
/// Any `i32` can be held; only `>= +100` and `< -100` convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmericanOdds(pub i32);

impl AmericanOdds {
    pub fn is_valid(self) -> bool {
        self.0 >= 100 || self.0 < -100
    }

    /// Multiplicative payout factor: `payout = stake * factor`.
    pub fn to_multiplicative(self) -> Result<f64, InvalidOddsError> {
        to_multiplicative(self.0)
    }

    /// Parses an odds line as typed by a user: `"-110"`, `"+250"`, `"1,200"`.
    /// Returns `None` for anything that is not an integer line.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().replace(',', "");
        let s = s.as_str();
        if s.is_empty() {
            return None;
        }
        s.parse::<i32>().ok().map(Self)
    }
}

impl fmt::Display for AmericanOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Converts an American odds line to multiplicative odds.
///
/// `odds >= 100` maps to `(odds + 100) / 100`, `odds < -100` to
/// `(100 - odds) / -odds`. Everything in `[-100, 100)` is rejected. No rounding.
pub fn to_multiplicative(odds: i32) -> Result<f64, InvalidOddsError> {
    let o = f64::from(odds);
    if odds >= 100 {
        Ok((o + 100.0) / 100.0)
    } else if odds < -100 {
        Ok((100.0 - o) / -o)
    } else {
        Err(InvalidOddsError { odds })
    }
}
