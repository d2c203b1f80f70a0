//! `shelfline-persistence` — the durable tabular source for the inventory.
//!
//! The core's contract with durable storage is deliberately small: load
//! once at startup producing the initial ordered record sequence, and
//! flush the full current record set synchronously after every successful
//! mutation. This crate implements it over a CSV file.

pub mod csv_store;

pub use csv_store::CsvInventory;
