use serde::{Deserialize, Serialize};

use shelfline_core::{CoreError, CoreResult};

use crate::record::ProductRecord;

/// Closed set of filter criteria.
///
/// Requests arrive as a string tag plus parameters; [`FilterCriterion::parse`]
/// is the only way in, so an unknown tag is rejected explicitly instead of
/// falling through to an empty result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterCriterion {
    /// Inclusive on both ends: `min <= price <= max`.
    PriceRange { min: f64, max: f64 },
    /// Exact category match.
    Category(String),
    /// Records flagged as best sellers.
    BestSeller,
}

impl FilterCriterion {
    /// Build a validated price-range criterion.
    pub fn price_range(min: f64, max: f64) -> CoreResult<Self> {
        if !(min.is_finite() && max.is_finite()) {
            return Err(CoreError::invalid_filter("price bounds must be finite numbers"));
        }
        if min < 0.0 || max < 0.0 {
            return Err(CoreError::invalid_filter("price bounds must be non-negative"));
        }
        if min > max {
            return Err(CoreError::invalid_filter(format!(
                "min price {min} exceeds max price {max}"
            )));
        }
        Ok(Self::PriceRange { min, max })
    }

    /// Resolve a string tag into a criterion.
    ///
    /// `price` requires both bounds, `category` requires a non-empty value,
    /// `best_seller` takes no parameters. Anything else is `InvalidFilter`.
    pub fn parse(
        filter_type: &str,
        value: Option<&str>,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> CoreResult<Self> {
        match filter_type {
            "price" => {
                let (Some(min), Some(max)) = (min_price, max_price) else {
                    return Err(CoreError::invalid_filter(
                        "price filter requires min_price and max_price",
                    ));
                };
                Self::price_range(min, max)
            }
            "category" => match value {
                Some(v) if !v.trim().is_empty() => Ok(Self::Category(v.trim().to_string())),
                _ => Err(CoreError::invalid_filter("category filter requires a value")),
            },
            "best_seller" => Ok(Self::BestSeller),
            other => Err(CoreError::invalid_filter(format!(
                "unknown filter type '{other}' (expected price, category, or best_seller)"
            ))),
        }
    }

    pub fn matches(&self, record: &ProductRecord) -> bool {
        match self {
            Self::PriceRange { min, max } => record.price >= *min && record.price <= *max,
            Self::Category(category) => record.category == *category,
            Self::BestSeller => record.is_best_seller,
        }
    }
}
