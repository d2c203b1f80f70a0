//! `shelfline-core` — shared foundation for the serving core.
//!
//! This crate contains the error taxonomy every other layer speaks. It has
//! no knowledge of storage, HTTP, or the statistical components.

pub mod error;

pub use error::{CoreError, CoreResult};
