//! Price-range labels and numeric bounds.
//!
//! The filter sidebar shows price ranges as labels such as
//! `"₦10,000 - ₦15,000"` or `"₦50,000+"` while the index service needs
//! numeric bounds. [`PriceRangeCodec`] converts in both directions.

use serde::{Deserialize, Serialize};

use crate::money::{parse_amount, Currency};

/// Label used for the unbounded range.
pub const ALL_LABEL: &str = "All";

/// A numeric price range. `max == None` means no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceBound {
    pub min: u64,
    pub max: Option<u64>,
}

impl PriceBound {
    /// The range that matches every price.
    pub const ALL: PriceBound = PriceBound { min: 0, max: None };

    /// Create a bound, swapping the ends if they arrive reversed.
    pub fn new(min: u64, max: Option<u64>) -> Self {
        match max {
            Some(max) if max < min => Self {
                min: max,
                max: Some(min),
            },
            _ => Self { min, max },
        }
    }

    /// Prices at or above `min`.
    pub fn at_least(min: u64) -> Self {
        Self::new(min, None)
    }

    /// Prices between `min` and `max`, inclusive.
    pub fn between(min: u64, max: u64) -> Self {
        Self::new(min, Some(max))
    }

    /// Whether this bound excludes nothing.
    pub fn is_all(&self) -> bool {
        *self == Self::ALL
    }
}

impl Default for PriceBound {
    fn default() -> Self {
        Self::ALL
    }
}

/// Price display settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PriceConfig {
    /// Listing currency.
    pub currency: Currency,
    /// Slider granularity in whole currency units.
    pub step: u64,
    /// Slider position treated as "no upper bound".
    pub slider_ceiling: u64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            currency: Currency::NGN,
            step: 1_000,
            slider_ceiling: 500_000,
        }
    }
}

/// Converts between price-range labels and [`PriceBound`]s.
#[derive(Debug, Clone, Default)]
pub struct PriceRangeCodec {
    config: PriceConfig,
}

impl PriceRangeCodec {
    /// Create a codec with the given display settings.
    pub fn new(config: PriceConfig) -> Self {
        Self { config }
    }

    /// Get the display settings.
    pub fn config(&self) -> &PriceConfig {
        &self.config
    }

    /// Parse a label into a bound.
    ///
    /// Accepts `"All"`, `"<amount>+"` and `"<amount> - <amount>"` with an
    /// optional currency prefix on each amount. Anything else yields
    /// [`PriceBound::ALL`].
    pub fn parse(&self, label: &str) -> PriceBound {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case(ALL_LABEL) {
            return PriceBound::ALL;
        }

        if let Some(lower) = label.strip_suffix('+') {
            if let Some(min) = parse_amount(lower) {
                return PriceBound::at_least(min);
            }
        } else if let Some((lower, upper)) = label.split_once(['-', '\u{2013}']) {
            if let (Some(min), Some(max)) = (parse_amount(lower.trim()), parse_amount(upper.trim()))
            {
                return PriceBound::between(min, max);
            }
        }

        tracing::debug!(label, "unrecognised price label, matching all prices");
        PriceBound::ALL
    }

    /// Render a bound as a label. Inverse of [`parse`](Self::parse).
    pub fn format(&self, bound: &PriceBound) -> String {
        let currency = self.config.currency;
        match bound.max {
            None if bound.min == 0 => ALL_LABEL.to_string(),
            None => format!("{}+", currency.display(bound.min)),
            Some(max) => format!("{} - {}", currency.display(bound.min), currency.display(max)),
        }
    }

    /// Build a bound from raw slider positions.
    ///
    /// Both ends snap to the nearest step; a max at or past the ceiling
    /// becomes unbounded. Negative or non-finite positions count as zero.
    pub fn from_slider(&self, min: f64, max: f64) -> PriceBound {
        let min = self.snap(min);
        let max = self.snap(max);
        if max >= self.config.slider_ceiling {
            PriceBound::at_least(min)
        } else {
            PriceBound::between(min, max)
        }
    }

    /// Labels for a price dropdown: `"All"`, one range per gap between
    /// breakpoints starting at zero, then an open-ended top bucket.
    pub fn presets(&self, breakpoints: &[u64]) -> Vec<String> {
        let mut points: Vec<u64> = breakpoints.iter().copied().filter(|b| *b > 0).collect();
        points.sort_unstable();
        points.dedup();

        let mut labels = vec![ALL_LABEL.to_string()];
        let mut lower = 0;
        for upper in points {
            labels.push(self.format(&PriceBound::between(lower, upper)));
            lower = upper;
        }
        if lower > 0 {
            labels.push(self.format(&PriceBound::at_least(lower)));
        }
        labels
    }

    fn snap(&self, position: f64) -> u64 {
        if !position.is_finite() || position <= 0.0 {
            return 0;
        }
        let step = self.config.step.max(1) as f64;
        ((position / step).round() * step) as u64
    }
}
