//! Hedge calculator for sportsbook promotions.
//!
//! Given a promotional bet (free bet, insured bet, spend requirement) and a
//! hedge at a second book, works out the hedge stake that locks in the result
//! and reports payout, profit and a quality percentage.
//!
//! # Modules
//!
//! - [`odds`] - American odds and their multiplicative equivalent
//! - [`settlement`] - Per-promotion formulas behind one parameterized core
//! - [`recompute`] - Two-stage recomputation with sentinel fallback
//! - [`format`] - Currency/percent rendering and edit-buffer parsing
//! - [`config`] - Default inputs for each calculator
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```
//! use hedgecalc::odds::AmericanOdds;
//! use hedgecalc::recompute::Worksheet;
//! use hedgecalc::settlement::PromotionInput;
//!
//! let sheet = Worksheet::new(PromotionInput::FreeBet {
//!     promo_odds: AmericanOdds(-110),
//!     promo_stake: 10.0,
//!     hedge_odds: AmericanOdds(-110),
//! });
//! assert!((sheet.result().profit - 4.329).abs() < 1e-3);
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod odds;
pub mod recompute;
pub mod settlement;
