//! Options Analytics
//!
//! Pricing and strategy analytics for European options:
//! - Black-Scholes prices and Greeks
//! - Implied volatility by bisection
//! - Price sensitivity curves
//! - Vertical spreads, iron condors, butterflies and straddles with
//!   net premium, max profit/loss, breakevens and payoff at expiry
//! - Option chain screening metrics
//! - YAML configuration
//!
//! Everything here is synchronous and free of I/O apart from loading
//! configuration files.

pub mod config;
pub mod pricing;
pub mod screening;
pub mod strategies;

pub use config::{ConfigError, EngineConfig};
pub use pricing::{
    BlackScholes, CurveSpec, Greeks, ImpliedVolatility, OptionSpec, OptionType, PricerConfig,
    PricingError,
};
pub use strategies::{
    Bound, BreakEven, PayoffSample, Position, Premium, StrategyEngine, StrategyError, StrategyKind,
    StrategyLeg, StrategyRequest, StrategyResult,
};
