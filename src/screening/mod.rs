//! Option Chain Screening
//!
//! Per-contract metrics a chain view sorts and filters on: moneyness,
//! strike distance from spot, and the annualized return of selling the
//! contract against cash or stock collateral.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::pricing::{clamp_day_count, OptionType, DAYS_PER_YEAR};

/// Screening parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Shares per contract
    #[serde(default = "default_contract_multiplier")]
    pub contract_multiplier: f64,
    /// Commission charged per contract sold
    #[serde(default = "default_fee_per_contract")]
    pub fee_per_contract: f64,
    /// Strikes within this fraction of spot count as at the money
    #[serde(default = "default_atm_band")]
    pub atm_band: f64,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: default_contract_multiplier(),
            fee_per_contract: default_fee_per_contract(),
            atm_band: default_atm_band(),
        }
    }
}

fn default_contract_multiplier() -> f64 {
    100.0
}

fn default_fee_per_contract() -> f64 {
    1.0
}

fn default_atm_band() -> f64 {
    0.02
}

/// Where a strike sits relative to spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Moneyness {
    AtTheMoney,
    InTheMoney,
    OutOfTheMoney,
}

impl Moneyness {
    pub fn classify(option_type: OptionType, strike: f64, spot: f64, atm_band: f64) -> Self {
        if (strike - spot).abs() < spot * atm_band {
            return Moneyness::AtTheMoney;
        }
        let in_the_money = match option_type {
            OptionType::Call => strike < spot,
            OptionType::Put => strike > spot,
        };
        if in_the_money {
            Moneyness::InTheMoney
        } else {
            Moneyness::OutOfTheMoney
        }
    }
}

/// Strike above (+) or below (-) spot, in percent
pub fn strike_distance_percent(strike: f64, spot: f64) -> f64 {
    strike / spot * 100.0 - 100.0
}

/// Annualized percent return of selling one contract at `bid`
///
/// Puts are cash-secured (collateral is the strike), calls are covered
/// (collateral is the stock). Returns `None` when there is no bid.
pub fn seller_annualized_return(
    option_type: OptionType,
    bid: f64,
    strike: f64,
    spot: f64,
    days_to_expiry: i64,
    config: &ScreeningConfig,
) -> Option<f64> {
    if bid <= 0.0 {
        return None;
    }
    let premium = bid * config.contract_multiplier - config.fee_per_contract;
    let collateral = match option_type {
        OptionType::Put => strike * config.contract_multiplier,
        OptionType::Call => spot * config.contract_multiplier,
    };
    let days = clamp_day_count(days_to_expiry) as f64;
    Some(premium / collateral * (DAYS_PER_YEAR / days) * 100.0)
}

/// Calendar days until expiry, never less than one
pub fn days_to_expiry(today: NaiveDate, expiry: NaiveDate) -> i64 {
    clamp_day_count((expiry - today).num_days())
}
