use hedgecalc::config::Config;
use hedgecalc::error::InvalidOddsError;
use hedgecalc::format::{format_currency, format_percent, parse_currency, parse_percent_fraction};
use hedgecalc::odds::{to_multiplicative, AmericanOdds};
use hedgecalc::recompute::{Fallback, Stage, Worksheet};
use hedgecalc::settlement::{CalculationResult, PromotionInput, PromotionKind};

#[test]
fn free_bet_scenario_renders_like_the_form() {
    let sheet = Worksheet::new(PromotionInput::FreeBet {
        promo_odds: AmericanOdds(-110),
        promo_stake: 10.0,
        hedge_odds: AmericanOdds(-110),
    });
    let r = sheet.result();
    assert!((to_multiplicative(-110).unwrap() - 1.9091).abs() < 1e-4);
    assert_eq!(format_currency(r.hedge_stake), "$ 4.76");
    assert_eq!(format_currency(r.payout), "$ 9.09");
    assert_eq!(format_currency(r.profit), "$ 4.33");
    assert_eq!(format_percent(r.quality_percent), "43.29 %");
}

#[test]
fn invalid_odds_yield_no_number() {
    assert_eq!(to_multiplicative(50), Err(InvalidOddsError { odds: 50 }));

    let input = PromotionInput::FreeBet {
        promo_odds: AmericanOdds(50),
        promo_stake: 10.0,
        hedge_odds: AmericanOdds(-110),
    };
    assert!(input.settle().is_err());

    let sheet = Worksheet::new(input);
    assert_eq!(*sheet.result(), CalculationResult::default());
    assert_eq!(
        sheet.fallback(),
        Some((Stage::A, Fallback::InvalidOdds(InvalidOddsError { odds: 50 })))
    );
    assert_eq!(format_currency(sheet.result().profit), "$ 0");
    assert_eq!(format_percent(sheet.result().quality_percent), "0.00 %");
}

#[test]
fn edits_flow_from_buffers_into_the_worksheet() {
    let mut sheet = Worksheet::new(Config::default().input(PromotionKind::BetInsurance));
    let before = *sheet.result();

    let stake = parse_currency("$ 40").unwrap();
    let insured = parse_percent_fraction("50 %").unwrap();
    sheet.set_input(PromotionInput::BetInsurance {
        insured_odds: AmericanOdds(200),
        insured_stake: stake,
        hedge_odds: AmericanOdds(-200),
        insured_fraction: insured,
        conversion_fraction: 1.0,
    });

    let r = sheet.result();
    assert_ne!(*r, before);
    // 3.0 * 40 = 120 payout; hedge = (120 - 20) / 1.5
    assert!((r.payout - 120.0).abs() < 1e-9);
    assert!((r.hedge_stake - 66.666_666_666).abs() < 1e-6);
    assert!((r.profit - (120.0 - 40.0 - 66.666_666_666)).abs() < 1e-6);
    assert!((r.quality_percent - 100.0 * r.profit / 20.0).abs() < 1e-9);
}

#[test]
fn every_default_tab_computes() {
    let config = Config::embedded().unwrap();
    for kind in PromotionKind::ALL {
        let sheet = Worksheet::new(config.input(kind));
        assert_eq!(sheet.fallback(), None, "{kind:?}");
        assert_eq!(sheet.input().kind(), kind);
        assert!(sheet.result().hedge_stake > 0.0, "{kind:?}");
    }
}

#[test]
fn must_spend_defaults() {
    let sheet = Worksheet::new(Config::default().input(PromotionKind::MustSpend));
    let m = 210.0 / 110.0;
    let hedge = (m * 50.0 - 30.0) / m;
    let r = sheet.result();
    assert!((r.hedge_stake - hedge).abs() < 1e-9);
    assert!((r.payout - m * 50.0).abs() < 1e-9);
    assert!((r.profit - (m * 50.0 - 50.0 - hedge)).abs() < 1e-9);
    assert!((r.quality_percent - 100.0 * r.profit / 50.0).abs() < 1e-9);
}
