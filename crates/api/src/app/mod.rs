//! HTTP application wiring (axum router + service construction).
//!
//! Layout:
//! - `services.rs`: the `QueryService` orchestration layer
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: error-to-response mapping

use std::path::Path;
use std::sync::Arc;

use axum::{Extension, Router};

use shelfline_inventory::InventoryStore;
use shelfline_persistence::CsvInventory;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::QueryService;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
///
/// Loads the inventory once from `data_path` and trains the demand model
/// from that startup snapshot before the router accepts traffic.
pub fn build_app(data_path: &Path) -> anyhow::Result<Router> {
    let source = CsvInventory::new(data_path);
    let records = source.load()?;
    let store = InventoryStore::from_records(records)?;

    let service = Arc::new(QueryService::new(store, Arc::new(source)));

    Ok(routes::router().layer(Extension(service)))
}
