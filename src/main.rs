use gloo::console;
use hedgecalc::config::Config;
use hedgecalc::format::{
    accepts_edit, currency_buffer, editable_range, format_currency, format_percent,
    parse_currency, parse_percent_fraction, percent_buffer, FieldFormat,
};
use hedgecalc::odds::AmericanOdds;
use hedgecalc::recompute::Worksheet;
use hedgecalc::settlement::{Field, PromotionInput, PromotionKind};
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew::TargetCast;

/// Editable inputs of a calculator, in tab order.
#[derive(Clone, Copy, PartialEq, Debug)]
enum Slot {
    PrimaryOdds,
    HedgeOdds,
    PrimaryAmount,
    Bonus,
    Insured,
    Conversion,
}

const SLOT_COUNT: usize = 6;

impl Slot {
    fn index(self) -> usize {
        self as usize
    }

    fn format(self) -> FieldFormat {
        match self {
            Self::PrimaryOdds | Self::HedgeOdds => FieldFormat::Odds,
            Self::PrimaryAmount | Self::Bonus => FieldFormat::Currency,
            Self::Insured | Self::Conversion => FieldFormat::Percent,
        }
    }

    fn placeholder(self) -> &'static str {
        match self.format() {
            FieldFormat::Odds => "-110",
            FieldFormat::Currency => "$ 0",
            FieldFormat::Percent => "100 %",
        }
    }

    fn order(kind: PromotionKind) -> Vec<Slot> {
        let mut slots = vec![Self::PrimaryOdds, Self::HedgeOdds, Self::PrimaryAmount];
        if kind.applies(Field::BonusValue) {
            slots.push(Self::Bonus);
        }
        if kind.applies(Field::InsuredPercent) {
            slots.push(Self::Insured);
        }
        if kind.applies(Field::ConversionPercent) {
            slots.push(Self::Conversion);
        }
        slots
    }

    fn next(kind: PromotionKind, slot: Slot) -> Slot {
        let order = Self::order(kind);
        let at = order.iter().position(|s| *s == slot).unwrap_or(0);
        order[(at + 1) % order.len()]
    }
}

/// Raw text of each editable field. Only parsed, never rendered from numbers,
/// once the form exists.
#[derive(Clone, PartialEq, Default)]
struct Buffers {
    primary_odds: String,
    hedge_odds: String,
    primary_amount: String,
    bonus: String,
    insured: String,
    conversion: String,
}

impl Buffers {
    fn from_config(kind: PromotionKind, config: &Config) -> Self {
        let odds = |o: i32| AmericanOdds(o).to_string();
        match kind {
            PromotionKind::FreeBet => Self {
                primary_odds: odds(config.free_bet.promo_odds),
                hedge_odds: odds(config.free_bet.hedge_odds),
                primary_amount: currency_buffer(config.free_bet.promo_stake),
                ..Self::default()
            },
            PromotionKind::HedgeBet => Self {
                primary_odds: odds(config.hedge_bet.bet_odds),
                hedge_odds: odds(config.hedge_bet.hedge_odds),
                primary_amount: currency_buffer(config.hedge_bet.bet_stake),
                ..Self::default()
            },
            PromotionKind::BetInsurance => Self {
                primary_odds: odds(config.bet_insurance.insured_odds),
                hedge_odds: odds(config.bet_insurance.hedge_odds),
                primary_amount: currency_buffer(config.bet_insurance.insured_stake),
                insured: percent_buffer(config.bet_insurance.percent_insured),
                conversion: percent_buffer(config.bet_insurance.percent_conversion),
                ..Self::default()
            },
            PromotionKind::MustSpend => Self {
                primary_odds: odds(config.must_spend.odds_leg1),
                hedge_odds: odds(config.must_spend.odds_leg2),
                primary_amount: currency_buffer(config.must_spend.required_spend),
                bonus: currency_buffer(config.must_spend.bonus_value),
                conversion: percent_buffer(config.must_spend.percent_conversion),
                ..Self::default()
            },
        }
    }

    fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::PrimaryOdds => &self.primary_odds,
            Slot::HedgeOdds => &self.hedge_odds,
            Slot::PrimaryAmount => &self.primary_amount,
            Slot::Bonus => &self.bonus,
            Slot::Insured => &self.insured,
            Slot::Conversion => &self.conversion,
        }
    }

    fn get_mut(&mut self, slot: Slot) -> &mut String {
        match slot {
            Slot::PrimaryOdds => &mut self.primary_odds,
            Slot::HedgeOdds => &mut self.hedge_odds,
            Slot::PrimaryAmount => &mut self.primary_amount,
            Slot::Bonus => &mut self.bonus,
            Slot::Insured => &mut self.insured,
            Slot::Conversion => &mut self.conversion,
        }
    }

    fn input(&self, kind: PromotionKind) -> PromotionInput {
        // A blank or partial line reads as 0, which is not a valid odds line.
        let odds = |s: &str| AmericanOdds::parse(s).unwrap_or(AmericanOdds(0));
        let amount = |s: &str| parse_currency(s).unwrap_or(0.0);
        let fraction = |s: &str| parse_percent_fraction(s).unwrap_or(0.0);
        match kind {
            PromotionKind::FreeBet => PromotionInput::FreeBet {
                promo_odds: odds(&self.primary_odds),
                promo_stake: amount(&self.primary_amount),
                hedge_odds: odds(&self.hedge_odds),
            },
            PromotionKind::HedgeBet => PromotionInput::HedgeBet {
                bet_odds: odds(&self.primary_odds),
                bet_stake: amount(&self.primary_amount),
                hedge_odds: odds(&self.hedge_odds),
            },
            PromotionKind::BetInsurance => PromotionInput::BetInsurance {
                insured_odds: odds(&self.primary_odds),
                insured_stake: amount(&self.primary_amount),
                hedge_odds: odds(&self.hedge_odds),
                insured_fraction: fraction(&self.insured),
                conversion_fraction: fraction(&self.conversion),
            },
            PromotionKind::MustSpend => PromotionInput::MustSpend {
                required_spend: amount(&self.primary_amount),
                bonus_value: amount(&self.bonus),
                conversion_fraction: fraction(&self.conversion),
                odds_leg1: odds(&self.primary_odds),
                odds_leg2: odds(&self.hedge_odds),
            },
        }
    }
}

#[derive(Clone, PartialEq)]
struct Form {
    buffers: Buffers,
    sheet: Worksheet,
}

impl Form {
    fn new(kind: PromotionKind, config: &Config) -> Self {
        Self {
            buffers: Buffers::from_config(kind, config),
            sheet: Worksheet::new(config.input(kind)),
        }
    }
}

fn select_editable(input: &HtmlInputElement, format: FieldFormat) {
    let range = editable_range(format, &input.value());
    if let Err(err) = input.set_selection_range(range.start, range.end) {
        console::debug!("selection not supported", err);
    }
}

#[derive(Properties, PartialEq)]
struct CalculatorProps {
    kind: PromotionKind,
    config: Config,
}

#[function_component(Calculator)]
fn calculator(props: &CalculatorProps) -> Html {
    let kind = props.kind;
    let form = {
        let config = props.config.clone();
        use_state(move || Form::new(kind, &config))
    };
    let refs = use_state(|| {
        std::array::from_fn::<NodeRef, SLOT_COUNT, _>(|_| NodeRef::default())
    });

    let render_input = |slot: Slot| -> Html {
        let on_input = {
            let form = form.clone();
            Callback::from(move |e: InputEvent| {
                let target: HtmlInputElement = e.target_unchecked_into();
                let text = target.value();
                let mut next = (*form).clone();
                if !accepts_edit(slot.format(), &text) {
                    console::debug!(format!("rejected {slot:?} edit {text:?}"));
                    target.set_value(next.buffers.get(slot));
                    return;
                }
                *next.buffers.get_mut(slot) = text;
                let input = next.buffers.input(kind);
                next.sheet.set_input(input);
                form.set(next);
            })
        };
        let on_keydown = {
            let refs = refs.clone();
            Callback::from(move |e: KeyboardEvent| {
                if e.key() != "Enter" {
                    return;
                }
                e.prevent_default();
                let next = Slot::next(kind, slot);
                if let Some(input) = refs[next.index()].cast::<HtmlInputElement>() {
                    if input.focus().is_ok() {
                        select_editable(&input, next.format());
                    }
                }
            })
        };
        let on_click = Callback::from(move |e: MouseEvent| {
            if let Some(input) = e.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
                select_editable(&input, slot.format());
            }
        });
        html! {
            <input
                type="text"
                ref={refs[slot.index()].clone()}
                placeholder={slot.placeholder()}
                value={form.buffers.get(slot).to_string()}
                oninput={on_input}
                onkeydown={on_keydown}
                onclick={on_click}
                aria-label={format!("{slot:?}")} />
        }
    };

    let result = *form.sheet.result();
    let fallback = form.sheet.fallback();
    let readonly = |value: String| html! { <input type="text" value={value} readonly=true /> };

    html! {
        <div class="card">
            <h2>
                <span>{format!("{} Calculator", kind.title())}</span>
                { if let Some((_, reason)) = fallback {
                    html!{ <span class="status-indicator warning tooltip" data-tooltip={reason.to_string()}>{"Check inputs"}</span> }
                } else {
                    html!{ <span class="status-indicator success">{"Valid"}</span> }
                }}
            </h2>
            <table class="table">
                <thead>
                    <tr>
                        <th scope="col"></th>
                        <th scope="col">{"Odds"}</th>
                        <th scope="col">{"Bet Amount"}</th>
                    </tr>
                </thead>
                <tbody>
                    <tr>
                        <th scope="row">{kind.primary_label()}</th>
                        <td>{render_input(Slot::PrimaryOdds)}</td>
                        <td>{render_input(Slot::PrimaryAmount)}</td>
                    </tr>
                    <tr>
                        <th scope="row">{"Hedge Bet"}</th>
                        <td>{render_input(Slot::HedgeOdds)}</td>
                        <td>{readonly(format_currency(result.hedge_stake))}</td>
                    </tr>
                </tbody>
            </table>

            { if Slot::order(kind).len() > 3 {
                html!{
                    <table class="table">
                        <thead>
                            <tr>
                                { if kind.applies(Field::BonusValue) { html!{ <th scope="col">{"Bonus Value"}</th> } } else { html!{} } }
                                { if kind.applies(Field::InsuredPercent) { html!{ <th scope="col">{"% Insured"}</th> } } else { html!{} } }
                                { if kind.applies(Field::ConversionPercent) { html!{ <th scope="col">{"Assumed % Free Bet Conversion"}</th> } } else { html!{} } }
                            </tr>
                        </thead>
                        <tbody>
                            <tr>
                                { if kind.applies(Field::BonusValue) { html!{ <td>{render_input(Slot::Bonus)}</td> } } else { html!{} } }
                                { if kind.applies(Field::InsuredPercent) { html!{ <td>{render_input(Slot::Insured)}</td> } } else { html!{} } }
                                { if kind.applies(Field::ConversionPercent) { html!{ <td>{render_input(Slot::Conversion)}</td> } } else { html!{} } }
                            </tr>
                        </tbody>
                    </table>
                }
            } else { html!{} }}

            <table class="table">
                <thead>
                    <tr>
                        <th scope="col">{kind.quality_label()}</th>
                        <th scope="col">{"Payout"}</th>
                        <th scope="col">{"Profit"}</th>
                    </tr>
                </thead>
                <tbody>
                    <tr>
                        <td>{readonly(format_percent(result.quality_percent))}</td>
                        <td>{readonly(format_currency(result.payout))}</td>
                        <td>{readonly(format_currency(result.profit))}</td>
                    </tr>
                </tbody>
            </table>
        </div>
    }
}

#[function_component(App)]
fn app() -> Html {
    let config = use_state(|| match Config::embedded() {
        Ok(config) => config,
        Err(err) => {
            console::warn!(format!("using built-in defaults: {err}"));
            Config::default()
        }
    });
    let active = use_state(|| PromotionKind::FreeBet);

    html! {
        <div class="container">
            <header>
                <h1>{"Hedge Calculator"}</h1>
                <div class="tooltip pill" data-tooltip="Lock in profit from sportsbook promotions by hedging at a second book">
                    {"Bonus Conversion"}
                </div>
            </header>

            <ul class="nav">
                { for PromotionKind::ALL.iter().map(|kind| {
                    let kind = *kind;
                    let onclick = {
                        let active = active.clone();
                        Callback::from(move |_| active.set(kind))
                    };
                    html!{
                        <li class={if kind == *active { "active" } else { "" }} {onclick}>
                            { kind.title() }
                        </li>
                    }
                })}
            </ul>

            // Every calculator stays mounted so each tab keeps its own inputs.
            <div class="outlet">
                { for PromotionKind::ALL.iter().map(|kind| html!{
                    <div hidden={*kind != *active}>
                        <Calculator kind={*kind} config={(*config).clone()} />
                    </div>
                })}
            </div>

            <footer>
                {"Hedge Calculator v0.1 - free bet, hedge, insurance and must-spend conversion"}
            </footer>
        </div>
    }
}

fn main() {
    tracing_wasm::set_as_global_default();
    yew::Renderer::<App>::new().render();
}
