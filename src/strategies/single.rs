//! Single-leg profile: breakeven and profit/loss caps for one option

use serde::{Deserialize, Serialize};

use super::{Bound, Position};
use crate::pricing::OptionType;

/// Max profit and max loss of a single option held to expiry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitLoss {
    pub max_profit: Bound,
    pub max_loss: Bound,
}

/// Underlying price at expiry where the premium is recovered
pub fn break_even(option_type: OptionType, strike: f64, premium: f64) -> f64 {
    match option_type {
        OptionType::Call => strike + premium,
        OptionType::Put => strike - premium,
    }
}

pub fn profit_loss(option_type: OptionType, strike: f64, premium: f64, position: Position) -> ProfitLoss {
    match (option_type, position) {
        (OptionType::Call, Position::Long) => ProfitLoss {
            max_profit: Bound::Unlimited,
            max_loss: Bound::Limited(premium),
        },
        (OptionType::Call, Position::Short) => ProfitLoss {
            max_profit: Bound::Limited(premium),
            max_loss: Bound::Unlimited,
        },
        // A put pays at most the strike, when the underlying goes to zero
        (OptionType::Put, Position::Long) => ProfitLoss {
            max_profit: Bound::Limited(strike - premium),
            max_loss: Bound::Limited(premium),
        },
        (OptionType::Put, Position::Short) => ProfitLoss {
            max_profit: Bound::Limited(premium),
            max_loss: Bound::Limited(strike - premium),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_even() {
        assert_eq!(break_even(OptionType::Call, 100.0, 4.5), 104.5);
        assert_eq!(break_even(OptionType::Put, 100.0, 4.5), 95.5);
    }

    #[test]
    fn test_profit_loss_table() {
        let long_call = profit_loss(OptionType::Call, 100.0, 4.0, Position::Long);
        assert_eq!(long_call.max_profit, Bound::Unlimited);
        assert_eq!(long_call.max_loss, Bound::Limited(4.0));

        let short_call = profit_loss(OptionType::Call, 100.0, 4.0, Position::Short);
        assert_eq!(short_call.max_profit, Bound::Limited(4.0));
        assert_eq!(short_call.max_loss, Bound::Unlimited);

        let long_put = profit_loss(OptionType::Put, 100.0, 4.0, Position::Long);
        assert_eq!(long_put.max_profit, Bound::Limited(96.0));
        assert_eq!(long_put.max_loss, Bound::Limited(4.0));

        let short_put = profit_loss(OptionType::Put, 100.0, 4.0, Position::Short);
        assert_eq!(short_put.max_profit, Bound::Limited(4.0));
        assert_eq!(short_put.max_loss, Bound::Limited(96.0));
    }
}
