//! Underlying price grids for sensitivity and payoff curves

use serde::{Deserialize, Serialize};

use super::PricingError;

/// Width and resolution of a curve sampled around the spot price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSpec {
    /// Fraction of spot covered on each side (0.3 = ±30%)
    pub range_fraction: f64,
    /// Number of intervals; the curve has `steps + 1` samples
    pub steps: usize,
}

impl CurveSpec {
    pub const fn new(range_fraction: f64, steps: usize) -> Self {
        Self {
            range_fraction,
            steps,
        }
    }

    /// Range must lie in (0, 1) so every sample stays positive; steps must be at least 1
    pub fn validate(&self) -> Result<(), PricingError> {
        let range = self.range_fraction;
        if !(range > 0.0 && range < 1.0) {
            return Err(PricingError::InvalidInput {
                field: "range_fraction",
                value: range,
            });
        }
        if self.steps == 0 {
            return Err(PricingError::InvalidInput {
                field: "steps",
                value: 0.0,
            });
        }
        Ok(())
    }

    pub fn grid(&self, spot: f64) -> PriceGrid {
        PriceGrid::around(spot, self.range_fraction, self.steps)
    }
}

impl Default for CurveSpec {
    fn default() -> Self {
        Self::new(0.2, 40)
    }
}

/// Evenly spaced underlying prices from `low` to `high` inclusive
///
/// Always yields `steps + 1` prices; the last one is exactly `high`.
/// A zero-step grid yields `high` alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceGrid {
    low: f64,
    high: f64,
    steps: usize,
    next: usize,
}

impl PriceGrid {
    pub fn new(low: f64, high: f64, steps: usize) -> Self {
        Self {
            low,
            high,
            steps,
            next: 0,
        }
    }

    /// Grid spanning `spot * (1 - range_fraction)` to `spot * (1 + range_fraction)`
    pub fn around(spot: f64, range_fraction: f64, steps: usize) -> Self {
        Self::new(spot * (1.0 - range_fraction), spot * (1.0 + range_fraction), steps)
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    fn price_at(&self, index: usize) -> f64 {
        if index == self.steps {
            return self.high;
        }
        self.low + (self.high - self.low) * index as f64 / self.steps as f64
    }
}

impl Iterator for PriceGrid {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next > self.steps {
            return None;
        }
        let price = self.price_at(self.next);
        self.next += 1;
        Some(price)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PriceGrid {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_endpoints_and_count() {
        let prices: Vec<f64> = PriceGrid::around(100.0, 0.3, 40).collect();
        assert_eq!(prices.len(), 41);
        assert!((prices[0] - 70.0).abs() < 1e-12);
        assert!((prices[40] - 130.0).abs() < 1e-12);
        assert!(prices.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_grid_exact_size() {
        let mut grid = PriceGrid::new(10.0, 20.0, 5);
        assert_eq!(grid.len(), 6);
        grid.next();
        assert_eq!(grid.len(), 5);
    }

    #[test]
    fn test_grid_zero_steps_yields_one_price() {
        let grid = PriceGrid::new(1.0, 2.0, 0);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.collect::<Vec<f64>>(), vec![2.0]);
    }

    #[test]
    fn test_curve_spec_validation() {
        assert!(CurveSpec::default().validate().is_ok());
        assert!(CurveSpec::new(0.99, 1).validate().is_ok());
        for bad in [CurveSpec::new(1.0, 40), CurveSpec::new(1.5, 40), CurveSpec::new(0.0, 40), CurveSpec::new(f64::NAN, 4)] {
            assert!(
                matches!(bad.validate(), Err(PricingError::InvalidInput { field: "range_fraction", .. })),
                "{:?}",
                bad
            );
        }
        assert_eq!(
            CurveSpec::new(0.2, 0).validate(),
            Err(PricingError::InvalidInput {
                field: "steps",
                value: 0.0
            })
        );
    }
}
