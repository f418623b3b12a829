//! Option price as a function of the underlying price

use serde::{Deserialize, Serialize};

use super::{BlackScholes, OptionSpec, PriceGrid};

/// One point of a sensitivity curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub underlying_price: f64,
    pub option_price: f64,
}

/// Lazily priced sensitivity curve
///
/// Each item reprices the spec at the next grid price. Clone it to
/// regenerate the curve from the start.
#[derive(Debug, Clone)]
pub struct PriceSensitivity {
    spec: OptionSpec,
    grid: PriceGrid,
}

impl PriceSensitivity {
    pub fn new(spec: OptionSpec, grid: PriceGrid) -> Self {
        Self { spec, grid }
    }
}

impl Iterator for PriceSensitivity {
    type Item = SensitivityPoint;

    fn next(&mut self) -> Option<SensitivityPoint> {
        let underlying_price = self.grid.next()?;
        Some(SensitivityPoint {
            underlying_price,
            option_price: BlackScholes::price(&self.spec.with_spot(underlying_price)),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.grid.size_hint()
    }
}

impl ExactSizeIterator for PriceSensitivity {}
