//! Payoff at expiry
//!
//! Every strategy shares one generator: sum the signed intrinsic value of
//! each leg at a hypothetical expiry price, then subtract the debit paid
//! or add the credit received. Legs are not repriced.

use serde::{Deserialize, Serialize};

use super::{Premium, StrategyLeg};
use crate::pricing::PriceGrid;

/// One point of a payoff curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffSample {
    pub underlying_price: f64,
    pub payoff: f64,
}

/// Strategy payoff if the underlying settles at `underlying_price`
pub fn payoff_at(legs: &[StrategyLeg], premium: Premium, underlying_price: f64) -> f64 {
    let intrinsic: f64 = legs.iter().map(|leg| leg.payoff_at(underlying_price)).sum();
    intrinsic + premium.cash_flow()
}

/// Sample the payoff at every grid price, in ascending order
pub fn payoff_curve(legs: &[StrategyLeg], premium: Premium, grid: PriceGrid) -> Vec<PayoffSample> {
    grid.map(|underlying_price| PayoffSample {
        underlying_price,
        payoff: payoff_at(legs, premium, underlying_price),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::OptionType;
    use crate::strategies::Position;

    fn leg(option_type: OptionType, strike: f64, position: Position, quantity: u32) -> StrategyLeg {
        StrategyLeg {
            option_type,
            strike,
            position,
            quantity,
            theoretical_price: 0.0,
        }
    }

    #[test]
    fn test_signed_intrinsic_and_premium() {
        let legs = vec![
            leg(OptionType::Call, 100.0, Position::Long, 1),
            leg(OptionType::Call, 110.0, Position::Short, 2),
        ];
        // 20 - 2 * 10 - 3
        assert_eq!(payoff_at(&legs, Premium::NetDebit(3.0), 120.0), -3.0);
        // 5 + 1.5
        assert_eq!(payoff_at(&legs, Premium::NetCredit(1.5), 105.0), 6.5);
        assert_eq!(payoff_at(&legs, Premium::NetCredit(1.5), 90.0), 1.5);
    }

    #[test]
    fn test_curve_follows_grid() {
        let legs = vec![leg(OptionType::Put, 50.0, Position::Long, 1)];
        let curve = payoff_curve(&legs, Premium::NetDebit(2.0), PriceGrid::new(40.0, 60.0, 4));
        let expected = vec![
            PayoffSample { underlying_price: 40.0, payoff: 8.0 },
            PayoffSample { underlying_price: 45.0, payoff: 3.0 },
            PayoffSample { underlying_price: 50.0, payoff: -2.0 },
            PayoffSample { underlying_price: 55.0, payoff: -2.0 },
            PayoffSample { underlying_price: 60.0, payoff: -2.0 },
        ];
        assert_eq!(curve, expected);
    }
}
