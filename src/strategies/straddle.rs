//! Long straddle: a call and a put at the same strike

use super::{Blueprint, BreakEven, Bound, LegPricer, Position, Premium, StrategyError};
use crate::pricing::OptionType;

pub(crate) fn build(legs: &LegPricer, strike: f64) -> Result<Blueprint, StrategyError> {
    let call = legs.leg(OptionType::Call, strike, Position::Long, 1)?;
    let put = legs.leg(OptionType::Put, strike, Position::Long, 1)?;
    let net_cost = call.theoretical_price + put.theoretical_price;

    Ok(Blueprint {
        legs: vec![call, put],
        premium: Premium::NetDebit(net_cost),
        max_profit: Bound::Unlimited,
        max_loss: net_cost,
        break_even: BreakEven::Range {
            low: strike - net_cost,
            high: strike + net_cost,
        },
    })
}
