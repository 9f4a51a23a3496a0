//! Initial inputs for every calculator tab.
//!
//! The defaults ship inside the binary as `defaults.toml`; every table and
//! field falls back to the built-in value when omitted.

use serde::Deserialize;

use crate::error::{ConfigError, InvalidOddsError};
use crate::format::round_to_cents;
use crate::odds::AmericanOdds;
use crate::settlement::{PromotionInput, PromotionKind};

const EMBEDDED_DEFAULTS: &str = include_str!("../defaults.toml");

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub free_bet: FreeBetDefaults,
    pub hedge_bet: HedgeBetDefaults,
    pub bet_insurance: BetInsuranceDefaults,
    pub must_spend: MustSpendDefaults,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FreeBetDefaults {
    pub promo_odds: i32,
    pub promo_stake: f64,
    pub hedge_odds: i32,
}

impl Default for FreeBetDefaults {
    fn default() -> Self {
        Self {
            promo_odds: -110,
            promo_stake: 10.0,
            hedge_odds: -110,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HedgeBetDefaults {
    pub bet_odds: i32,
    pub bet_stake: f64,
    pub hedge_odds: i32,
}

impl Default for HedgeBetDefaults {
    fn default() -> Self {
        Self {
            bet_odds: -110,
            bet_stake: 10.0,
            hedge_odds: -110,
        }
    }
}

/// Percent fields are in `[0, 100]`, as typed into the form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BetInsuranceDefaults {
    pub insured_odds: i32,
    pub insured_stake: f64,
    pub hedge_odds: i32,
    pub percent_insured: f64,
    pub percent_conversion: f64,
}

impl Default for BetInsuranceDefaults {
    fn default() -> Self {
        Self {
            insured_odds: -110,
            insured_stake: 10.0,
            hedge_odds: -110,
            percent_insured: 100.0,
            percent_conversion: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MustSpendDefaults {
    pub required_spend: f64,
    pub bonus_value: f64,
    pub percent_conversion: f64,
    pub odds_leg1: i32,
    pub odds_leg2: i32,
}

impl Default for MustSpendDefaults {
    fn default() -> Self {
        Self {
            required_spend: 50.0,
            bonus_value: 50.0,
            percent_conversion: 60.0,
            odds_leg1: -110,
            odds_leg2: -110,
        }
    }
}

fn check_odds(field: &'static str, odds: i32) -> Result<(), ConfigError> {
    if !AmericanOdds(odds).is_valid() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: InvalidOddsError { odds }.to_string(),
        });
    }
    Ok(())
}

fn check_amount(field: &'static str, amount: f64) -> Result<(), ConfigError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be a non-negative amount".to_string(),
        });
    }
    if round_to_cents(amount) != amount {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be a whole number of cents".to_string(),
        });
    }
    Ok(())
}

fn check_percent(field: &'static str, percent: f64) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be between 0 and 100".to_string(),
        });
    }
    Ok(())
}

impl Config {
    /// Parses and validates a defaults document.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// The defaults compiled into the binary.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::parse_toml(EMBEDDED_DEFAULTS)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.free_bet;
        check_odds("free_bet.promo_odds", f.promo_odds)?;
        check_amount("free_bet.promo_stake", f.promo_stake)?;
        check_odds("free_bet.hedge_odds", f.hedge_odds)?;

        let h = &self.hedge_bet;
        check_odds("hedge_bet.bet_odds", h.bet_odds)?;
        check_amount("hedge_bet.bet_stake", h.bet_stake)?;
        check_odds("hedge_bet.hedge_odds", h.hedge_odds)?;

        let i = &self.bet_insurance;
        check_odds("bet_insurance.insured_odds", i.insured_odds)?;
        check_amount("bet_insurance.insured_stake", i.insured_stake)?;
        check_odds("bet_insurance.hedge_odds", i.hedge_odds)?;
        check_percent("bet_insurance.percent_insured", i.percent_insured)?;
        check_percent("bet_insurance.percent_conversion", i.percent_conversion)?;

        let m = &self.must_spend;
        check_amount("must_spend.required_spend", m.required_spend)?;
        check_amount("must_spend.bonus_value", m.bonus_value)?;
        check_percent("must_spend.percent_conversion", m.percent_conversion)?;
        check_odds("must_spend.odds_leg1", m.odds_leg1)?;
        check_odds("must_spend.odds_leg2", m.odds_leg2)?;
        Ok(())
    }

    /// The starting input snapshot for a calculator tab.
    pub fn input(&self, kind: PromotionKind) -> PromotionInput {
        match kind {
            PromotionKind::FreeBet => PromotionInput::FreeBet {
                promo_odds: AmericanOdds(self.free_bet.promo_odds),
                promo_stake: self.free_bet.promo_stake,
                hedge_odds: AmericanOdds(self.free_bet.hedge_odds),
            },
            PromotionKind::HedgeBet => PromotionInput::HedgeBet {
                bet_odds: AmericanOdds(self.hedge_bet.bet_odds),
                bet_stake: self.hedge_bet.bet_stake,
                hedge_odds: AmericanOdds(self.hedge_bet.hedge_odds),
            },
            PromotionKind::BetInsurance => PromotionInput::BetInsurance {
                insured_odds: AmericanOdds(self.bet_insurance.insured_odds),
                insured_stake: self.bet_insurance.insured_stake,
                hedge_odds: AmericanOdds(self.bet_insurance.hedge_odds),
                insured_fraction: self.bet_insurance.percent_insured / 100.0,
                conversion_fraction: self.bet_insurance.percent_conversion / 100.0,
            },
            PromotionKind::MustSpend => PromotionInput::MustSpend {
                required_spend: self.must_spend.required_spend,
                bonus_value: self.must_spend.bonus_value,
                conversion_fraction: self.must_spend.percent_conversion / 100.0,
                odds_leg1: AmericanOdds(self.must_spend.odds_leg1),
                odds_leg2: AmericanOdds(self.must_spend.odds_leg2),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{currency_buffer, parse_currency};

    #[test]
    fn embedded_defaults_match_built_in() {
        let config = Config::embedded().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_tables_fall_back() {
        let config = Config::parse_toml("[free_bet]\npromo_stake = 25.0\n").unwrap();
        assert_eq!(config.free_bet.promo_stake, 25.0);
        assert_eq!(config.free_bet.promo_odds, -110);
        assert_eq!(config.must_spend, MustSpendDefaults::default());
    }

    #[test]
    fn rejects_odds_in_the_dead_band() {
        match Config::parse_toml("[hedge_bet]\nhedge_odds = 50\n") {
            Err(ConfigError::InvalidValue {
                field: "hedge_bet.hedge_odds",
                ..
            }) => {}
            other => panic!("expected invalid hedge odds, got {other:?}"),
        }
    }

    #[test]
    fn rejects_sub_cent_amounts() {
        assert!(matches!(
            Config::parse_toml("[free_bet]\npromo_stake = 10.555\n"),
            Err(ConfigError::InvalidValue {
                field: "free_bet.promo_stake",
                ..
            })
        ));
        assert!(Config::parse_toml("[free_bet]\npromo_stake = 10.55\n").is_ok());
    }

    #[test]
    fn default_amounts_survive_the_edit_buffer() {
        let config = Config::embedded().unwrap();
        let amounts = [
            config.free_bet.promo_stake,
            config.hedge_bet.bet_stake,
            config.bet_insurance.insured_stake,
            config.must_spend.required_spend,
            config.must_spend.bonus_value,
        ];
        for amount in amounts {
            assert_eq!(parse_currency(&currency_buffer(amount)), Some(amount));
        }
        let custom = Config::parse_toml("[hedge_bet]\nbet_stake = 12.34\n").unwrap();
        let stake = custom.hedge_bet.bet_stake;
        assert_eq!(parse_currency(&currency_buffer(stake)), Some(stake));
    }

    #[test]
    fn rejects_percent_over_100() {
        assert!(matches!(
            Config::parse_toml("[bet_insurance]\npercent_insured = 120.0\n"),
            Err(ConfigError::InvalidValue {
                field: "bet_insurance.percent_insured",
                ..
            })
        ));
    }

    #[test]
    fn rejects_malformed_document() {
        assert!(matches!(
            Config::parse_toml("free_bet = ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn percents_become_fractions() {
        let input = Config::default().input(PromotionKind::BetInsurance);
        match input {
            PromotionInput::BetInsurance {
                insured_fraction,
                conversion_fraction,
                ..
            } => {
                assert_eq!(insured_fraction, 1.0);
                assert_eq!(conversion_fraction, 0.6);
            }
            other => panic!("unexpected input {other:?}"),
        }
    }
}
