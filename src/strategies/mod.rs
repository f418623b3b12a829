//! Multi-Leg Option Strategies
//!
//! Builds vertical spreads, iron condors, butterflies and straddles from
//! Black-Scholes leg prices, and derives net premium, max profit/loss,
//! breakevens and the payoff curve at expiry.

pub mod butterfly;
pub mod condor;
pub mod payoff;
pub mod single;
pub mod straddle;
pub mod vertical;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::pricing::{
    time_to_expiry_years, BlackScholes, CurveSpec, OptionType, PricerConfig, PricingError,
};
pub use payoff::PayoffSample;

/// Strategy kinds the engine can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    BullCallSpread,
    BearCallSpread,
    BullPutSpread,
    BearPutSpread,
    IronCondor,
    CallButterfly,
    PutButterfly,
    Straddle,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 8] = [
        StrategyKind::BullCallSpread,
        StrategyKind::BearCallSpread,
        StrategyKind::BullPutSpread,
        StrategyKind::BearPutSpread,
        StrategyKind::IronCondor,
        StrategyKind::CallButterfly,
        StrategyKind::PutButterfly,
        StrategyKind::Straddle,
    ];

    /// Number of strikes a request for this kind must carry
    pub fn strike_count(&self) -> usize {
        match self {
            StrategyKind::BullCallSpread
            | StrategyKind::BearCallSpread
            | StrategyKind::BullPutSpread
            | StrategyKind::BearPutSpread => 2,
            StrategyKind::IronCondor => 4,
            StrategyKind::CallButterfly | StrategyKind::PutButterfly => 3,
            StrategyKind::Straddle => 1,
        }
    }

    /// Payoff curve range and resolution used when a request sets none
    pub fn default_curve(&self) -> CurveSpec {
        match self {
            StrategyKind::IronCondor => CurveSpec::new(0.4, 50),
            StrategyKind::Straddle => CurveSpec::new(0.4, 40),
            _ => CurveSpec::new(0.3, 40),
        }
    }

    pub fn is_vertical_spread(&self) -> bool {
        self.strike_count() == 2
    }

    pub fn is_butterfly(&self) -> bool {
        matches!(self, StrategyKind::CallButterfly | StrategyKind::PutButterfly)
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::BullCallSpread => "bullCallSpread",
            StrategyKind::BearCallSpread => "bearCallSpread",
            StrategyKind::BullPutSpread => "bullPutSpread",
            StrategyKind::BearPutSpread => "bearPutSpread",
            StrategyKind::IronCondor => "ironCondor",
            StrategyKind::CallButterfly => "callButterfly",
            StrategyKind::PutButterfly => "putButterfly",
            StrategyKind::Straddle => "straddle",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| StrategyError::UnsupportedStrategy(s.to_string()))
    }
}

/// Side of a leg (Long or Short)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Long,
    Short,
}

impl Position {
    pub fn sign(&self) -> f64 {
        match self {
            Position::Long => 1.0,
            Position::Short => -1.0,
        }
    }
}

/// One priced option position within a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyLeg {
    pub option_type: OptionType,
    pub strike: f64,
    pub position: Position,
    pub quantity: u32,
    pub theoretical_price: f64,
}

impl StrategyLeg {
    /// Signed payoff of this leg at expiry, scaled by quantity
    pub fn payoff_at(&self, underlying_price: f64) -> f64 {
        self.position.sign()
            * f64::from(self.quantity)
            * self.option_type.intrinsic(underlying_price, self.strike)
    }
}

/// Premium paid or received to open a strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "amount")]
pub enum Premium {
    NetDebit(f64),
    NetCredit(f64),
}

impl Premium {
    pub fn amount(&self) -> f64 {
        match self {
            Premium::NetDebit(amount) | Premium::NetCredit(amount) => *amount,
        }
    }

    /// Cash received on entry (negative for a debit)
    pub fn cash_flow(&self) -> f64 {
        match self {
            Premium::NetDebit(amount) => -amount,
            Premium::NetCredit(amount) => *amount,
        }
    }
}

/// A profit or loss figure that may have no cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bound {
    Limited(f64),
    Unlimited,
}

impl Bound {
    pub fn limited(&self) -> Option<f64> {
        match self {
            Bound::Limited(value) => Some(*value),
            Bound::Unlimited => None,
        }
    }
}

/// Underlying price(s) at expiry where the strategy breaks even
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakEven {
    Single(f64),
    Range { low: f64, high: f64 },
}

/// Parameters for one strategy computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRequest {
    pub kind: StrategyKind,
    pub spot: f64,
    pub strikes: Vec<f64>,
    pub days_to_expiry: i64,
    pub volatility: f64,
    /// Overrides the engine's configured rate
    #[serde(default)]
    pub risk_free_rate: Option<f64>,
    /// Overrides the kind's default payoff curve
    #[serde(default)]
    pub curve: Option<CurveSpec>,
}

impl StrategyRequest {
    pub fn new(
        kind: StrategyKind,
        spot: f64,
        strikes: Vec<f64>,
        days_to_expiry: i64,
        volatility: f64,
    ) -> Self {
        Self {
            kind,
            spot,
            strikes,
            days_to_expiry,
            volatility,
            risk_free_rate: None,
            curve: None,
        }
    }

    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = Some(risk_free_rate);
        self
    }

    pub fn with_curve(mut self, curve: CurveSpec) -> Self {
        self.curve = Some(curve);
        self
    }

    fn validate(&self) -> Result<(), StrategyError> {
        if !self.spot.is_finite() || self.spot <= 0.0 {
            return Err(StrategyError::InvalidInput(format!("spot must be positive, got {}", self.spot)));
        }
        if !self.volatility.is_finite() || self.volatility <= 0.0 {
            return Err(StrategyError::InvalidInput(format!(
                "volatility must be positive, got {}",
                self.volatility
            )));
        }
        if let Some(strike) = self.strikes.iter().find(|k| !k.is_finite() || **k <= 0.0) {
            return Err(StrategyError::InvalidInput(format!("strike must be positive, got {}", strike)));
        }
        if let Some(curve) = &self.curve {
            curve
                .validate()
                .map_err(|e| StrategyError::InvalidInput(format!("payoff curve {}", e)))?;
        }
        if self.strikes.len() != self.kind.strike_count() {
            return Err(StrategyError::WrongStrikeCount {
                kind: self.kind,
                expected: self.kind.strike_count(),
                actual: self.strikes.len(),
            });
        }
        Ok(())
    }
}

/// Aggregate economics of a built strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub kind: StrategyKind,
    pub legs: Vec<StrategyLeg>,
    pub premium: Premium,
    pub max_profit: Bound,
    pub max_loss: f64,
    pub break_even: BreakEven,
    pub payoff_curve: Vec<PayoffSample>,
}

impl StrategyResult {
    pub fn net_cost(&self) -> Option<f64> {
        match self.premium {
            Premium::NetDebit(amount) => Some(amount),
            Premium::NetCredit(_) => None,
        }
    }

    pub fn net_credit(&self) -> Option<f64> {
        match self.premium {
            Premium::NetCredit(amount) => Some(amount),
            Premium::NetDebit(_) => None,
        }
    }
}

/// Strategy construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    #[error("unsupported strategy: {0}")]
    UnsupportedStrategy(String),
    #[error("{kind} requires {expected} strikes, got {actual}")]
    WrongStrikeCount {
        kind: StrategyKind,
        expected: usize,
        actual: usize,
    },
    #[error("invalid strategy input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Everything a family builder works out before the payoff curve is sampled
#[derive(Debug, Clone)]
pub(crate) struct Blueprint {
    pub legs: Vec<StrategyLeg>,
    pub premium: Premium,
    pub max_profit: Bound,
    pub max_loss: f64,
    pub break_even: BreakEven,
}

/// Market inputs shared by every leg of one strategy
#[derive(Debug, Clone, Copy)]
pub(crate) struct LegPricer {
    pricer: BlackScholes,
    spot: f64,
    time_to_expiry_years: f64,
    volatility: f64,
}

impl LegPricer {
    pub fn leg(
        &self,
        option_type: OptionType,
        strike: f64,
        position: Position,
        quantity: u32,
    ) -> Result<StrategyLeg, StrategyError> {
        let spec = self
            .pricer
            .spec(option_type, self.spot, strike, self.time_to_expiry_years, self.volatility);
        spec.validate()?;
        Ok(StrategyLeg {
            option_type,
            strike,
            position,
            quantity,
            theoretical_price: BlackScholes::price(&spec),
        })
    }
}

/// Builds strategies on top of a Black-Scholes pricer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrategyEngine {
    pricer: BlackScholes,
}

impl StrategyEngine {
    pub fn new(pricer: BlackScholes) -> Self {
        Self { pricer }
    }

    pub fn pricer(&self) -> &BlackScholes {
        &self.pricer
    }

    /// Validate a request, price its legs and assemble the result
    pub fn compute(&self, request: &StrategyRequest) -> Result<StrategyResult, StrategyError> {
        request.validate()?;

        let pricer = match request.risk_free_rate {
            Some(risk_free_rate) => BlackScholes::new(PricerConfig {
                risk_free_rate,
                ..*self.pricer.config()
            }),
            None => self.pricer,
        };
        let legs = LegPricer {
            pricer,
            spot: request.spot,
            time_to_expiry_years: time_to_expiry_years(request.days_to_expiry),
            volatility: request.volatility,
        };

        let kind = request.kind;
        let strikes = &request.strikes;
        let blueprint = match kind {
            StrategyKind::BullCallSpread
            | StrategyKind::BearCallSpread
            | StrategyKind::BullPutSpread
            | StrategyKind::BearPutSpread => vertical::build(kind, &legs, strikes)?,
            StrategyKind::IronCondor => condor::build(&legs, strikes)?,
            StrategyKind::CallButterfly | StrategyKind::PutButterfly => {
                butterfly::build(kind, &legs, strikes)?
            }
            StrategyKind::Straddle => straddle::build(&legs, strikes[0])?,
        };

        let curve = request.curve.unwrap_or_else(|| kind.default_curve());
        let payoff_curve =
            payoff::payoff_curve(&blueprint.legs, blueprint.premium, curve.grid(request.spot));

        debug!(
            %kind,
            premium = ?blueprint.premium,
            break_even = ?blueprint.break_even,
            samples = payoff_curve.len(),
            "built strategy"
        );

        Ok(StrategyResult {
            kind,
            legs: blueprint.legs,
            premium: blueprint.premium,
            max_profit: blueprint.max_profit,
            max_loss: blueprint.max_loss,
            break_even: blueprint.break_even,
            payoff_curve,
        })
    }

    /// Bull/bear call/put spread from two strikes
    pub fn vertical_spread(
        &self,
        kind: StrategyKind,
        spot: f64,
        strikes: &[f64],
        days_to_expiry: i64,
        volatility: f64,
    ) -> Result<StrategyResult, StrategyError> {
        if !kind.is_vertical_spread() {
            return Err(StrategyError::UnsupportedStrategy(kind.to_string()));
        }
        self.compute(&StrategyRequest::new(kind, spot, strikes.to_vec(), days_to_expiry, volatility))
    }

    pub fn iron_condor(
        &self,
        spot: f64,
        strikes: &[f64],
        days_to_expiry: i64,
        volatility: f64,
    ) -> Result<StrategyResult, StrategyError> {
        self.compute(&StrategyRequest::new(
            StrategyKind::IronCondor,
            spot,
            strikes.to_vec(),
            days_to_expiry,
            volatility,
        ))
    }

    /// Call or put butterfly from three strikes
    pub fn butterfly(
        &self,
        kind: StrategyKind,
        spot: f64,
        strikes: &[f64],
        days_to_expiry: i64,
        volatility: f64,
    ) -> Result<StrategyResult, StrategyError> {
        if !kind.is_butterfly() {
            return Err(StrategyError::UnsupportedStrategy(kind.to_string()));
        }
        self.compute(&StrategyRequest::new(kind, spot, strikes.to_vec(), days_to_expiry, volatility))
    }

    pub fn straddle(
        &self,
        spot: f64,
        strike: f64,
        days_to_expiry: i64,
        volatility: f64,
    ) -> Result<StrategyResult, StrategyError> {
        self.compute(&StrategyRequest::new(
            StrategyKind::Straddle,
            spot,
            vec![strike],
            days_to_expiry,
            volatility,
        ))
    }
}
