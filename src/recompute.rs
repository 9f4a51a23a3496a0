//! Two-stage recomputation of a calculator's derived fields.
//!
//! Stage A recomputes the hedge stake from the inputs. Stage B recomputes
//! payout, profit and quality from the inputs and Stage A's hedge stake.
//! Both stages run on every [`Worksheet::recompute`], in that order.
//!
//! A stage that cannot produce a number (invalid odds, or a non-finite value)
//! commits [`SENTINEL`] for its outputs, and any later quantity derived from a
//! sentinel is committed as the sentinel too.

use std::fmt;

use tracing::debug;

use crate::error::InvalidOddsError;
use crate::settlement::{CalculationResult, PromotionInput};

/// Value shown for any derived field without a result.
pub const SENTINEL: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Hedge stake.
    A,
    /// Payout, profit and quality.
    B,
}

/// Why a stage committed the sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    InvalidOdds(InvalidOddsError),
    NotFinite,
    Upstream,
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOdds(err) => write!(f, "{err}"),
            Self::NotFinite => write!(f, "result is not a finite number"),
            Self::Upstream => write!(f, "depends on a stage without a result"),
        }
    }
}

impl From<InvalidOddsError> for Fallback {
    fn from(err: InvalidOddsError) -> Self {
        Self::InvalidOdds(err)
    }
}

fn finite(value: f64) -> Result<f64, Fallback> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Fallback::NotFinite)
    }
}

/// The current input snapshot of one calculator and its derived result.
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    input: PromotionInput,
    result: CalculationResult,
    fallback: Option<(Stage, Fallback)>,
}

impl Worksheet {
    pub fn new(input: PromotionInput) -> Self {
        let mut sheet = Self {
            input,
            result: CalculationResult::default(),
            fallback: None,
        };
        sheet.recompute();
        sheet
    }

    pub fn input(&self) -> &PromotionInput {
        &self.input
    }

    pub fn result(&self) -> &CalculationResult {
        &self.result
    }

    /// The first stage that committed the sentinel on the last recompute.
    pub fn fallback(&self) -> Option<(Stage, Fallback)> {
        self.fallback
    }

    /// Replaces the input snapshot and recomputes everything derived from it.
    pub fn set_input(&mut self, input: PromotionInput) -> &CalculationResult {
        self.input = input;
        self.recompute()
    }

    pub fn recompute(&mut self) -> &CalculationResult {
        self.fallback = None;
        let hedge_stake = self.stage_a();
        self.stage_b(hedge_stake);
        &self.result
    }

    fn stage_a(&mut self) -> Result<f64, Fallback> {
        let hedge_stake = self
            .input
            .hedge_stake()
            .map_err(Fallback::from)
            .and_then(finite);
        self.result.hedge_stake = self.commit(Stage::A, hedge_stake);
        debug!(kind = ?self.input.kind(), hedge_stake = self.result.hedge_stake, "stage A");
        hedge_stake
    }

    fn stage_b(&mut self, hedge_stake: Result<f64, Fallback>) {
        let input = self.input;
        let settled = hedge_stake.map_err(|_| Fallback::Upstream).and_then(|hedge_stake| {
            let payout = finite(input.payout(hedge_stake)?)?;
            let profit = finite(input.profit(payout, hedge_stake))?;
            Ok((payout, profit))
        });

        let quality =
            settled.and_then(|(_, profit)| finite(input.quality_percent(profit)?));

        // Payout and profit survive a quality failure; they do not depend on it.
        let (payout, profit) = match settled {
            Ok(values) => values,
            Err(_) => (SENTINEL, SENTINEL),
        };
        self.result.payout = payout;
        self.result.profit = profit;
        if let Err(reason) = settled {
            self.record(Stage::B, reason);
        }
        self.result.quality_percent = self.commit(Stage::B, quality);
        debug!(
            payout = self.result.payout,
            profit = self.result.profit,
            quality_percent = self.result.quality_percent,
            "stage B"
        );
    }

    fn commit(&mut self, stage: Stage, value: Result<f64, Fallback>) -> f64 {
        match value {
            Ok(value) => value,
            Err(reason) => {
                self.record(stage, reason);
                SENTINEL
            }
        }
    }

    fn record(&mut self, stage: Stage, reason: Fallback) {
        if self.fallback.is_none() {
            debug!(?stage, %reason, "committing sentinel");
            self.fallback = Some((stage, reason));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::AmericanOdds;

    fn insurance(insured_odds: i32, hedge_odds: i32, stake: f64) -> PromotionInput {
        PromotionInput::BetInsurance {
            insured_odds: AmericanOdds(insured_odds),
            insured_stake: stake,
            hedge_odds: AmericanOdds(hedge_odds),
            insured_fraction: 1.0,
            conversion_fraction: 0.6,
        }
    }

    #[test]
    fn valid_input_matches_settle() {
        let input = insurance(-110, -110, 10.0);
        let sheet = Worksheet::new(input);
        assert_eq!(Ok(*sheet.result()), input.settle());
        assert_eq!(sheet.fallback(), None);
    }

    #[test]
    fn invalid_hedge_odds_zero_every_field() {
        // Payout only needs the insured odds, but profit would use the
        // sentinel hedge stake, so everything downstream is zeroed.
        let sheet = Worksheet::new(insurance(-110, 50, 10.0));
        assert_eq!(*sheet.result(), CalculationResult::default());
        assert_eq!(
            sheet.fallback(),
            Some((Stage::A, Fallback::InvalidOdds(InvalidOddsError { odds: 50 })))
        );
    }

    #[test]
    fn sentinel_replaces_stale_values() {
        let mut sheet = Worksheet::new(insurance(-110, -110, 10.0));
        assert!(sheet.result().payout > 0.0);
        sheet.set_input(insurance(-110, 0, 10.0));
        assert_eq!(*sheet.result(), CalculationResult::default());
        sheet.set_input(insurance(-110, -110, 10.0));
        assert_eq!(sheet.fallback(), None);
        assert!(sheet.result().payout > 0.0);
    }

    #[test]
    fn stage_b_follows_primary_odds_even_when_hedge_is_unchanged() {
        let mut sheet = Worksheet::new(insurance(-110, -110, 0.0));
        let first = *sheet.result();
        sheet.set_input(insurance(150, -110, 0.0));
        assert_eq!(sheet.result().hedge_stake, first.hedge_stake);
        assert_eq!(sheet.result().payout, 0.0);
        sheet.set_input(insurance(150, -110, 10.0));
        assert_eq!(sheet.result().payout, 25.0);
    }

    #[test]
    fn undefined_quality_keeps_payout_and_profit() {
        let input = PromotionInput::BetInsurance {
            insured_odds: AmericanOdds(100),
            insured_stake: 10.0,
            hedge_odds: AmericanOdds(100),
            insured_fraction: 0.0,
            conversion_fraction: 0.6,
        };
        let sheet = Worksheet::new(input);
        assert_eq!(sheet.result().payout, 20.0);
        assert_eq!(sheet.result().hedge_stake, 10.0);
        assert_eq!(sheet.result().profit, 0.0);
        assert_eq!(sheet.result().quality_percent, SENTINEL);
        assert_eq!(sheet.fallback(), Some((Stage::B, Fallback::NotFinite)));
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut sheet = Worksheet::new(insurance(135, -155, 37.5));
        let first = *sheet.result();
        let second = *sheet.recompute();
        assert_eq!(first.hedge_stake.to_bits(), second.hedge_stake.to_bits());
        assert_eq!(first.payout.to_bits(), second.payout.to_bits());
        assert_eq!(first.profit.to_bits(), second.profit.to_bits());
        assert_eq!(first.quality_percent.to_bits(), second.quality_percent.to_bits());
    }
}
