//! Option Pricing Model
//!
//! Black-Scholes for European options on a dividend-paying stock,
//! Greeks, and implied volatility by bisection.

pub mod grid;
pub mod sensitivity;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub use grid::{CurveSpec, PriceGrid};
pub use sensitivity::{PriceSensitivity, SensitivityPoint};

/// Calendar days per year used for day-count conversion and theta scaling
pub const DAYS_PER_YEAR: f64 = 365.0;

const IV_LOWER_BOUND: f64 = 0.001;
const IV_UPPER_BOUND: f64 = 5.0;
const IV_MAX_ITERATIONS: u32 = 100;
const IV_PRICE_TOLERANCE: f64 = 0.0001;

/// Standard normal cumulative distribution function
///
/// Abramowitz-Stegun rational approximation (26.2.17). The coefficients
/// are fixed; prices and implied volatilities elsewhere depend on them.
pub fn cumulative_normal(x: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.2316419 * x.abs());
    let d = 0.3989423 * (-x * x / 2.0).exp();
    let p = d
        * t
        * (0.3193815 + t * (-0.3565638 + t * (1.781478 + t * (-1.821256 + t * 1.330274))));

    if x > 0.0 {
        1.0 - p
    } else {
        p
    }
}

/// Standard normal probability density function
pub fn norm_pdf(x: f64) -> f64 {
    (-x * x / 2.0).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Day counts below one are raised to one
///
/// Every day count in the crate goes through here before it divides anything.
pub fn clamp_day_count(days_to_expiry: i64) -> i64 {
    if days_to_expiry < 1 {
        debug!(days_to_expiry, "clamping day count to 1");
        1
    } else {
        days_to_expiry
    }
}

/// Convert a day count to a year fraction, clamped to at least one day
pub fn time_to_expiry_years(days_to_expiry: i64) -> f64 {
    clamp_day_count(days_to_expiry) as f64 / DAYS_PER_YEAR
}

/// Option type (Put or Call)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff of one contract at expiry
    pub fn intrinsic(&self, underlying_price: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (underlying_price - strike).max(0.0),
            OptionType::Put => (strike - underlying_price).max(0.0),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// Rate and dividend defaults a pricer puts on the specs it builds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricerConfig {
    /// Annual risk-free rate (e.g., 0.03 for 3%)
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Continuous dividend yield
    #[serde(default)]
    pub dividend_yield: f64,
}

impl Default for PricerConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            dividend_yield: 0.0,
        }
    }
}

fn default_risk_free_rate() -> f64 {
    0.03
}

/// Inputs to a single-leg valuation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub option_type: OptionType,
    /// Current underlying price (S)
    pub spot: f64,
    /// Strike price (K)
    pub strike: f64,
    /// Time to expiry in years (T)
    pub time_to_expiry_years: f64,
    /// Annualized volatility (σ)
    pub volatility: f64,
    /// Risk-free rate (r)
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Dividend yield (q)
    #[serde(default)]
    pub dividend_yield: f64,
}

impl OptionSpec {
    /// Create a spec with the default rate (3%) and no dividend
    pub fn new(
        option_type: OptionType,
        spot: f64,
        strike: f64,
        time_to_expiry_years: f64,
        volatility: f64,
    ) -> Self {
        Self {
            option_type,
            spot,
            strike,
            time_to_expiry_years,
            volatility,
            risk_free_rate: default_risk_free_rate(),
            dividend_yield: 0.0,
        }
    }

    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    pub fn with_spot(mut self, spot: f64) -> Self {
        self.spot = spot;
        self
    }

    /// Check the inputs the closed form divides by or takes logs of
    ///
    /// `BlackScholes::price` does not call this; degenerate specs there
    /// produce NaN or infinite values.
    pub fn validate(&self) -> Result<(), PricingError> {
        let positive = [
            ("spot", self.spot),
            ("strike", self.strike),
            ("time_to_expiry_years", self.time_to_expiry_years),
            ("volatility", self.volatility),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PricingError::InvalidInput { field, value });
            }
        }
        for (field, value) in [
            ("risk_free_rate", self.risk_free_rate),
            ("dividend_yield", self.dividend_yield),
        ] {
            if !value.is_finite() {
                return Err(PricingError::InvalidInput { field, value });
            }
        }
        Ok(())
    }

    fn d1(&self) -> f64 {
        let s = self.spot;
        let k = self.strike;
        let t = self.time_to_expiry_years;
        let sigma = self.volatility;
        ((s / k).ln() + (self.risk_free_rate - self.dividend_yield + sigma.powi(2) / 2.0) * t)
            / (sigma * t.sqrt())
    }

    fn d2(&self) -> f64 {
        self.d1() - self.volatility * self.time_to_expiry_years.sqrt()
    }
}

/// Pricing input errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("invalid {field}: {value}")]
    InvalidInput { field: &'static str, value: f64 },
}

/// Greeks for an option
///
/// Theta is per calendar day; vega and rho are per one percentage point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

/// Outcome of an implied volatility search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpliedVolatility {
    /// Volatility estimate (last bisection midpoint)
    pub volatility: f64,
    /// Whether the price came within tolerance of the observed price
    pub converged: bool,
    /// Bisection steps taken
    pub iterations: u32,
}

/// Black-Scholes pricer for European options
///
/// Holds read-only defaults; every call takes its inputs explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlackScholes {
    config: PricerConfig,
}

impl BlackScholes {
    pub fn new(config: PricerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricerConfig {
        &self.config
    }

    /// Build a spec using this pricer's rate and dividend yield
    pub fn spec(
        &self,
        option_type: OptionType,
        spot: f64,
        strike: f64,
        time_to_expiry_years: f64,
        volatility: f64,
    ) -> OptionSpec {
        OptionSpec::new(option_type, spot, strike, time_to_expiry_years, volatility)
            .with_risk_free_rate(self.config.risk_free_rate)
            .with_dividend_yield(self.config.dividend_yield)
    }

    /// Theoretical price of a European option
    pub fn price(spec: &OptionSpec) -> f64 {
        let s = spec.spot;
        let k = spec.strike;
        let t = spec.time_to_expiry_years;
        let d1 = spec.d1();
        let d2 = spec.d2();
        let dividend_discount = (-spec.dividend_yield * t).exp();
        let discount = (-spec.risk_free_rate * t).exp();

        match spec.option_type {
            OptionType::Call => {
                s * dividend_discount * cumulative_normal(d1)
                    - k * discount * cumulative_normal(d2)
            }
            OptionType::Put => {
                k * discount * cumulative_normal(-d2)
                    - s * dividend_discount * cumulative_normal(-d1)
            }
        }
    }

    /// Calculate Greeks for a European option
    pub fn greeks(spec: &OptionSpec) -> Greeks {
        let s = spec.spot;
        let k = spec.strike;
        let t = spec.time_to_expiry_years;
        let r = spec.risk_free_rate;
        let q = spec.dividend_yield;
        let sigma = spec.volatility;
        let d1 = spec.d1();
        let d2 = spec.d2();
        let dividend_discount = (-q * t).exp();
        let discount = (-r * t).exp();

        let delta = match spec.option_type {
            OptionType::Call => dividend_discount * cumulative_normal(d1),
            OptionType::Put => dividend_discount * (cumulative_normal(d1) - 1.0),
        };

        // Gamma (same for calls and puts)
        let gamma = dividend_discount * norm_pdf(d1) / (s * sigma * t.sqrt());

        // Theta (per year, reported per day)
        let decay = -s * sigma * dividend_discount * norm_pdf(d1) / (2.0 * t.sqrt());
        let theta = match spec.option_type {
            OptionType::Call => {
                decay - r * k * discount * cumulative_normal(d2)
                    + q * s * dividend_discount * cumulative_normal(d1)
            }
            OptionType::Put => {
                decay + r * k * discount * cumulative_normal(-d2)
                    - q * s * dividend_discount * cumulative_normal(-d1)
            }
        };

        let vega = s * dividend_discount * t.sqrt() * norm_pdf(d1);

        let rho = match spec.option_type {
            OptionType::Call => k * t * discount * cumulative_normal(d2),
            OptionType::Put => -k * t * discount * cumulative_normal(-d2),
        };

        Greeks {
            delta,
            gamma,
            theta: theta / DAYS_PER_YEAR,
            vega: vega / 100.0,
            rho: rho / 100.0,
        }
    }

    /// Calculate implied volatility from an observed price
    ///
    /// Bisection over [0.001, 5.0], assuming price rises with volatility.
    /// When 100 steps pass without matching the price to 1e-4 the last
    /// midpoint is returned with `converged == false`.
    pub fn implied_volatility(
        &self,
        option_type: OptionType,
        observed_price: f64,
        spot: f64,
        strike: f64,
        time_to_expiry_years: f64,
        dividend_yield: f64,
    ) -> ImpliedVolatility {
        let base = OptionSpec::new(option_type, spot, strike, time_to_expiry_years, IV_LOWER_BOUND)
            .with_risk_free_rate(self.config.risk_free_rate)
            .with_dividend_yield(dividend_yield);

        let mut low = IV_LOWER_BOUND;
        let mut high = IV_UPPER_BOUND;
        let mut mid = (low + high) / 2.0;

        for iteration in 1..=IV_MAX_ITERATIONS {
            mid = (low + high) / 2.0;
            let price = Self::price(&base.with_volatility(mid));

            if (price - observed_price).abs() < IV_PRICE_TOLERANCE {
                return ImpliedVolatility {
                    volatility: mid,
                    converged: true,
                    iterations: iteration,
                };
            }

            if price > observed_price {
                high = mid;
            } else {
                low = mid;
            }
        }

        warn!(
            %option_type,
            observed_price,
            spot,
            strike,
            estimate = mid,
            "implied volatility search did not converge"
        );

        ImpliedVolatility {
            volatility: mid,
            converged: false,
            iterations: IV_MAX_ITERATIONS,
        }
    }

    /// Option price across a band of underlying prices around `spot`
    ///
    /// Yields `steps + 1` points from `spot * (1 - range)` to
    /// `spot * (1 + range)`; the sequence is computed lazily and can be
    /// cloned to start over.
    pub fn price_sensitivity(
        &self,
        option_type: OptionType,
        spot: f64,
        strike: f64,
        time_to_expiry_years: f64,
        volatility: f64,
        price_range_fraction: f64,
        steps: usize,
    ) -> PriceSensitivity {
        let spec = self.spec(option_type, spot, strike, time_to_expiry_years, volatility);
        PriceSensitivity::new(spec, PriceGrid::around(spot, price_range_fraction, steps))
    }
}
