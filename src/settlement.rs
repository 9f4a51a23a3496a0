//! Hedge stake, payout, profit and quality for each promotion type.
//!
//! Every promotion is a primary bet at one book hedged at another. They differ
//! in three knobs, captured by [`Terms`]:
//!
//! - whether the primary stake comes back on a win (not for a free bet),
//! - how much credit is recovered when the primary bet loses,
//! - what the quality percentage is normalized against.
//!
//! Each [`PromotionInput`] lowers to one set of terms, so the formulas exist once.

use crate::error::InvalidOddsError;
use crate::odds::AmericanOdds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionKind {
    FreeBet,
    HedgeBet,
    BetInsurance,
    MustSpend,
}

/// Promotion-specific inputs beyond the two legs' odds and the primary stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    InsuredPercent,
    ConversionPercent,
    BonusValue,
}

impl PromotionKind {
    pub const ALL: [PromotionKind; 4] = [
        PromotionKind::FreeBet,
        PromotionKind::HedgeBet,
        PromotionKind::BetInsurance,
        PromotionKind::MustSpend,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::FreeBet => "Free Bet",
            Self::HedgeBet => "Hedge Bet",
            Self::BetInsurance => "Bet Insurance",
            Self::MustSpend => "Must Spend",
        }
    }

    /// Row label for the promotional leg.
    pub fn primary_label(self) -> &'static str {
        match self {
            Self::FreeBet => "Free Bet",
            Self::HedgeBet => "Bet",
            Self::BetInsurance => "Insured Bet",
            Self::MustSpend => "Qualifying Bet",
        }
    }

    pub fn quality_label(self) -> &'static str {
        match self {
            Self::FreeBet => "% Conversion",
            Self::HedgeBet => "% Return",
            Self::BetInsurance => "% Gain on Insured Amount",
            Self::MustSpend => "% Gain on Bonus",
        }
    }

    pub fn applies(self, field: Field) -> bool {
        matches!(
            (self, field),
            (Self::BetInsurance, Field::InsuredPercent)
                | (Self::BetInsurance, Field::ConversionPercent)
                | (Self::MustSpend, Field::ConversionPercent)
                | (Self::MustSpend, Field::BonusValue)
        )
    }
}

/// A snapshot of one promotion's inputs. Amounts are in currency units and
/// fractions are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromotionInput {
    FreeBet {
        promo_odds: AmericanOdds,
        promo_stake: f64,
        hedge_odds: AmericanOdds,
    },
    HedgeBet {
        bet_odds: AmericanOdds,
        bet_stake: f64,
        hedge_odds: AmericanOdds,
    },
    BetInsurance {
        insured_odds: AmericanOdds,
        insured_stake: f64,
        hedge_odds: AmericanOdds,
        insured_fraction: f64,
        conversion_fraction: f64,
    },
    MustSpend {
        required_spend: f64,
        bonus_value: f64,
        conversion_fraction: f64,
        odds_leg1: AmericanOdds,
        odds_leg2: AmericanOdds,
    },
}

/// Derived outputs. Never set directly, always recomputed from a [`PromotionInput`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalculationResult {
    pub hedge_stake: f64,
    pub payout: f64,
    pub profit: f64,
    pub quality_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PayoutLeg {
    Hedge,
    Primary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum QualityBase {
    /// Closed form over both odds; the stake cancels out.
    OddsOnly,
    Amount(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Terms {
    primary_odds: AmericanOdds,
    stake: f64,
    hedge_odds: AmericanOdds,
    stake_returned: bool,
    credit: f64,
    payout_leg: PayoutLeg,
    quality_base: QualityBase,
}

impl Terms {
    fn winning_return(&self, primary: f64) -> f64 {
        if self.stake_returned {
            primary * self.stake
        } else {
            (primary - 1.0) * self.stake
        }
    }

    fn hedge_stake(&self) -> Result<f64, InvalidOddsError> {
        let primary = self.primary_odds.to_multiplicative()?;
        let hedge = self.hedge_odds.to_multiplicative()?;
        Ok((self.winning_return(primary) - self.credit) / hedge)
    }

    fn payout(&self, hedge_stake: f64) -> Result<f64, InvalidOddsError> {
        match self.payout_leg {
            PayoutLeg::Hedge => Ok(self.hedge_odds.to_multiplicative()? * hedge_stake),
            PayoutLeg::Primary => Ok(self.primary_odds.to_multiplicative()? * self.stake),
        }
    }

    fn profit(&self, payout: f64, hedge_stake: f64) -> f64 {
        if self.stake_returned {
            payout - self.stake - hedge_stake
        } else {
            payout - hedge_stake
        }
    }

    fn quality_percent(&self, profit: f64) -> Result<f64, InvalidOddsError> {
        match self.quality_base {
            QualityBase::OddsOnly => {
                let primary = self.primary_odds.to_multiplicative()?;
                let hedge = self.hedge_odds.to_multiplicative()?;
                Ok((primary - 1.0) * (1.0 - 1.0 / hedge) * 100.0)
            }
            QualityBase::Amount(base) => Ok(100.0 * profit / base),
        }
    }
}

impl PromotionInput {
    pub fn kind(&self) -> PromotionKind {
        match self {
            Self::FreeBet { .. } => PromotionKind::FreeBet,
            Self::HedgeBet { .. } => PromotionKind::HedgeBet,
            Self::BetInsurance { .. } => PromotionKind::BetInsurance,
            Self::MustSpend { .. } => PromotionKind::MustSpend,
        }
    }

    fn terms(&self) -> Terms {
        match *self {
            Self::FreeBet {
                promo_odds,
                promo_stake,
                hedge_odds,
            } => Terms {
                primary_odds: promo_odds,
                stake: promo_stake,
                hedge_odds,
                stake_returned: false,
                credit: 0.0,
                payout_leg: PayoutLeg::Hedge,
                quality_base: QualityBase::OddsOnly,
            },
            Self::HedgeBet {
                bet_odds,
                bet_stake,
                hedge_odds,
            } => Terms {
                primary_odds: bet_odds,
                stake: bet_stake,
                hedge_odds,
                stake_returned: true,
                credit: 0.0,
                payout_leg: PayoutLeg::Hedge,
                quality_base: QualityBase::Amount(bet_stake),
            },
            Self::BetInsurance {
                insured_odds,
                insured_stake,
                hedge_odds,
                insured_fraction,
                conversion_fraction,
            } => Terms {
                primary_odds: insured_odds,
                stake: insured_stake,
                hedge_odds,
                stake_returned: true,
                credit: insured_stake * insured_fraction * conversion_fraction,
                payout_leg: PayoutLeg::Primary,
                quality_base: QualityBase::Amount(insured_stake * insured_fraction),
            },
            Self::MustSpend {
                required_spend,
                bonus_value,
                conversion_fraction,
                odds_leg1,
                odds_leg2,
            } => Terms {
                primary_odds: odds_leg1,
                stake: required_spend,
                hedge_odds: odds_leg2,
                stake_returned: true,
                credit: bonus_value * conversion_fraction,
                payout_leg: PayoutLeg::Primary,
                quality_base: QualityBase::Amount(bonus_value),
            },
        }
    }

    /// Stake on the hedge leg that locks in the same result whichever leg wins.
    pub fn hedge_stake(&self) -> Result<f64, InvalidOddsError> {
        self.terms().hedge_stake()
    }

    pub fn payout(&self, hedge_stake: f64) -> Result<f64, InvalidOddsError> {
        self.terms().payout(hedge_stake)
    }

    pub fn profit(&self, payout: f64, hedge_stake: f64) -> f64 {
        self.terms().profit(payout, hedge_stake)
    }

    /// Quality metric in percent. The normalization base depends on the
    /// promotion: both odds for a free bet, the stake for a hedge bet, the
    /// insured amount for insurance and the bonus for a must-spend offer.
    /// A zero base yields a non-finite value.
    pub fn quality_percent(&self, profit: f64) -> Result<f64, InvalidOddsError> {
        self.terms().quality_percent(profit)
    }

    /// Runs all four calculations in dependency order.
    pub fn settle(&self) -> Result<CalculationResult, InvalidOddsError> {
        let terms = self.terms();
        let hedge_stake = terms.hedge_stake()?;
        let payout = terms.payout(hedge_stake)?;
        let profit = terms.profit(payout, hedge_stake);
        let quality_percent = terms.quality_percent(profit)?;
        Ok(CalculationResult {
            hedge_stake,
            payout,
            profit,
            quality_percent,
        })
    }
}
