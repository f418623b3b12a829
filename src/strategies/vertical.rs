//! Vertical spreads: two strikes, one option type, one long and one short leg

use super::{Blueprint, BreakEven, Bound, LegPricer, Position, Premium, StrategyError, StrategyKind};
use crate::pricing::OptionType;

/// Which leg is long is fixed by the kind, never by strike order in the request.
///
/// Max profit of a debit spread is the strike width less the net cost. For the
/// bear put that is `(long - short) - net_cost`, so it stays positive.
pub(crate) fn build(
    kind: StrategyKind,
    legs: &LegPricer,
    strikes: &[f64],
) -> Result<Blueprint, StrategyError> {
    let (option_type, long_at_low_strike) = match kind {
        StrategyKind::BullCallSpread => (OptionType::Call, true),
        StrategyKind::BearCallSpread => (OptionType::Call, false),
        StrategyKind::BullPutSpread => (OptionType::Put, true),
        StrategyKind::BearPutSpread => (OptionType::Put, false),
        StrategyKind::IronCondor
        | StrategyKind::CallButterfly
        | StrategyKind::PutButterfly
        | StrategyKind::Straddle => return Err(StrategyError::UnsupportedStrategy(kind.to_string())),
    };

    let low = strikes.iter().copied().fold(f64::INFINITY, f64::min);
    let high = strikes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (long_strike, short_strike) = if long_at_low_strike { (low, high) } else { (high, low) };
    let width = high - low;

    let long = legs.leg(option_type, long_strike, Position::Long, 1)?;
    let short = legs.leg(option_type, short_strike, Position::Short, 1)?;

    let (premium, max_profit, max_loss, break_even) = match kind {
        StrategyKind::BullCallSpread => {
            let net_cost = long.theoretical_price - short.theoretical_price;
            (Premium::NetDebit(net_cost), width - net_cost, net_cost, long_strike + net_cost)
        }
        StrategyKind::BearPutSpread => {
            let net_cost = long.theoretical_price - short.theoretical_price;
            (Premium::NetDebit(net_cost), width - net_cost, net_cost, long_strike - net_cost)
        }
        StrategyKind::BearCallSpread => {
            let net_credit = short.theoretical_price - long.theoretical_price;
            (Premium::NetCredit(net_credit), net_credit, width - net_credit, short_strike + net_credit)
        }
        StrategyKind::BullPutSpread => {
            let net_credit = short.theoretical_price - long.theoretical_price;
            (Premium::NetCredit(net_credit), net_credit, width - net_credit, short_strike - net_credit)
        }
        StrategyKind::IronCondor
        | StrategyKind::CallButterfly
        | StrategyKind::PutButterfly
        | StrategyKind::Straddle => return Err(StrategyError::UnsupportedStrategy(kind.to_string())),
    };

    Ok(Blueprint {
        legs: vec![long, short],
        premium,
        max_profit: Bound::Limited(max_profit),
        max_loss,
        break_even: BreakEven::Single(break_even),
    })
}
