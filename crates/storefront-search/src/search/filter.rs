//! Filter state and compilation into index filter expressions.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::price::{PriceBound, PriceRangeCodec, ALL_LABEL};

/// Highest selectable star rating.
pub const MAX_RATING: u8 = 5;

/// A single filter clause.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Filter by price bound.
    Price(PriceBound),
    /// Filter by exact category name.
    Category(String),
    /// Filter by exact brand name.
    Brand(String),
    /// Only show in-stock items.
    InStock,
    /// Filter by minimum rating.
    Rating { min: u8 },
}

impl Filter {
    /// Create a category filter.
    pub fn category(name: impl Into<String>) -> Self {
        Filter::Category(name.into())
    }

    /// Create a brand filter.
    pub fn brand(name: impl Into<String>) -> Self {
        Filter::Brand(name.into())
    }

    /// Create an in-stock filter.
    pub fn in_stock() -> Self {
        Filter::InStock
    }

    /// Render this clause in the index service's filter syntax.
    pub fn to_expression(&self) -> String {
        match self {
            Filter::Price(PriceBound { min, max: None }) => format!("price >= {}", min),
            Filter::Price(PriceBound { min, max: Some(max) }) => {
                format!("price:{} TO {}", min, max)
            }
            Filter::Category(name) => format!("category:\"{}\"", escape_quoted(name)),
            Filter::Brand(name) => format!("brand:\"{}\"", escape_quoted(name)),
            Filter::InStock => "stockQuantity > 0".to_string(),
            Filter::Rating { min } => format!("rating >= {}", min),
        }
    }
}

/// Escape backslashes and double quotes inside a quoted filter value.
fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Whether a facet value is the "no restriction" sentinel.
fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL_LABEL)
}

/// The price part of the filter sidebar: either the dropdown label or a
/// bound already produced by the slider.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PriceSelection {
    Label(String),
    Bound(PriceBound),
}

impl PriceSelection {
    /// Resolve to a numeric bound.
    pub fn resolve(&self, codec: &PriceRangeCodec) -> PriceBound {
        match self {
            PriceSelection::Label(label) => codec.parse(label),
            PriceSelection::Bound(bound) => PriceBound::new(bound.min, bound.max),
        }
    }
}

impl Default for PriceSelection {
    fn default() -> Self {
        PriceSelection::Label(ALL_LABEL.to_string())
    }
}

impl From<&str> for PriceSelection {
    fn from(label: &str) -> Self {
        PriceSelection::Label(label.to_string())
    }
}

impl From<PriceBound> for PriceSelection {
    fn from(bound: PriceBound) -> Self {
        PriceSelection::Bound(bound)
    }
}

impl<'de> Deserialize<'de> for PriceSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(label) => PriceSelection::Label(label),
            Value::Object(map) => {
                let min = map.get("min").and_then(coerce_amount).unwrap_or(0);
                let max = map.get("max").and_then(coerce_amount);
                PriceSelection::Bound(PriceBound::new(min, max))
            }
            other => {
                if !other.is_null() {
                    tracing::debug!(value = %other, "unrecognised price range, matching all prices");
                }
                PriceSelection::default()
            }
        })
    }
}

/// Coerce a JSON number or numeric string into whole units. Negative,
/// non-finite and non-numeric values give `None`.
fn coerce_amount(value: &Value) -> Option<u64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if !n.is_finite() || n < 0.0 {
        return None;
    }
    Some(n.trunc() as u64)
}

/// Text facets: anything but a string is the `"All"` sentinel.
fn lenient_facet<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => ALL_LABEL.to_string(),
    })
}

/// Only `true` (or the string `"true"`) enables a flag.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn lenient_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value)
        .map(|n| n.min(MAX_RATING as u64) as u8)
        .unwrap_or(0))
}

/// Filter sidebar state as the storefront UI holds it.
///
/// Every field has an "unset" sentinel: `"All"` for text facets and the
/// price range, `false` for stock, `0` for rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    #[serde(deserialize_with = "lenient_facet")]
    pub category: String,
    #[serde(deserialize_with = "lenient_facet")]
    pub brand: String,
    pub price_range: PriceSelection,
    #[serde(deserialize_with = "lenient_flag")]
    pub in_stock: bool,
    #[serde(deserialize_with = "lenient_rating")]
    pub min_rating: u8,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: ALL_LABEL.to_string(),
            brand: ALL_LABEL.to_string(),
            price_range: PriceSelection::default(),
            in_stock: false,
            min_rating: 0,
        }
    }
}

impl FilterState {
    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the brand.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Set the price range.
    pub fn with_price(mut self, price: impl Into<PriceSelection>) -> Self {
        self.price_range = price.into();
        self
    }

    /// Restrict to in-stock items.
    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// Set the minimum rating.
    pub fn with_min_rating(mut self, rating: u8) -> Self {
        self.min_rating = rating;
        self
    }

    /// Compile with the default price codec.
    pub fn compile(&self) -> Option<String> {
        FilterCompiler::default().compile(self)
    }
}

/// Compiles [`FilterState`] into the index service's filter expression.
#[derive(Debug, Clone, Default)]
pub struct FilterCompiler {
    codec: PriceRangeCodec,
}

impl FilterCompiler {
    /// Create a compiler that resolves price labels with `codec`.
    pub fn new(codec: PriceRangeCodec) -> Self {
        Self { codec }
    }

    /// Active clauses in fixed order: price, category, brand, stock, rating.
    pub fn filters(&self, state: &FilterState) -> Vec<Filter> {
        let mut filters = Vec::new();

        let bound = state.price_range.resolve(&self.codec);
        if !bound.is_all() {
            filters.push(Filter::Price(bound));
        }
        if !is_unset(&state.category) {
            filters.push(Filter::category(state.category.as_str()));
        }
        if !is_unset(&state.brand) {
            filters.push(Filter::brand(state.brand.as_str()));
        }
        if state.in_stock {
            filters.push(Filter::in_stock());
        }
        let rating = state.min_rating.min(MAX_RATING);
        if rating > 0 {
            filters.push(Filter::Rating { min: rating });
        }

        filters
    }

    /// Join active clauses with `AND`.
    ///
    /// Returns `None` when nothing is active; callers must then omit the
    /// filter parameter entirely.
    pub fn compile(&self, state: &FilterState) -> Option<String> {
        let clauses: Vec<String> = self
            .filters(state)
            .iter()
            .map(Filter::to_expression)
            .collect();

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" AND "))
        }
    }
}
