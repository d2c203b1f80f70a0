//! `shelfline-analytics` — statistical predictions over the inventory.
//!
//! Two components live here, both deterministic:
//! - [`demand::DemandModel`]: price-to-demand least-squares regression,
//!   trained once from a startup snapshot and never retrained;
//! - [`forecast`]: ARIMA(1,1,1) projection over the live per-product stock
//!   sequence, refit on every call.
//!
//! Charts for both are rendered in-memory and base64-encoded by [`chart`].

pub mod chart;
pub mod demand;
pub mod forecast;

pub use chart::ChartImage;
pub use demand::DemandModel;
pub use forecast::forecast_stock;
