//! Iron condor: short put spread below spot, short call spread above

use super::{Blueprint, BreakEven, Bound, LegPricer, Position, Premium, StrategyError};
use crate::pricing::OptionType;

/// Strikes are sorted before legs are assigned; beyond that, ordering is
/// the caller's concern and degenerate sets are priced as given.
pub(crate) fn build(legs: &LegPricer, strikes: &[f64]) -> Result<Blueprint, StrategyError> {
    let mut sorted = strikes.to_vec();
    sorted.sort_by(f64::total_cmp);
    let [put_low, put_high, call_low, call_high] = sorted[..] else {
        return Err(StrategyError::WrongStrikeCount {
            kind: super::StrategyKind::IronCondor,
            expected: 4,
            actual: strikes.len(),
        });
    };

    let long_put = legs.leg(OptionType::Put, put_low, Position::Long, 1)?;
    let short_put = legs.leg(OptionType::Put, put_high, Position::Short, 1)?;
    let short_call = legs.leg(OptionType::Call, call_low, Position::Short, 1)?;
    let long_call = legs.leg(OptionType::Call, call_high, Position::Long, 1)?;

    let net_credit = (short_put.theoretical_price + short_call.theoretical_price)
        - (long_put.theoretical_price + long_call.theoretical_price);
    let max_loss = ((put_high - put_low) - net_credit).max((call_high - call_low) - net_credit);

    Ok(Blueprint {
        legs: vec![long_put, short_put, short_call, long_call],
        premium: Premium::NetCredit(net_credit),
        max_profit: Bound::Limited(net_credit),
        max_loss,
        break_even: BreakEven::Range {
            low: put_high - net_credit,
            high: call_low + net_credit,
        },
    })
}
