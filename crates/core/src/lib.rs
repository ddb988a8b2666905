//! Core business logic for the VAT return engine.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence and ledger access are traits implemented by the db crate.
//!
//! # Modules
//!
//! - `vat` - Period selection, aggregation, and the declaration
//! - `lifecycle` - Return status state machine and mutation guard
//! - `export` - Fixed-width files for the tax authority
//! - `returns` - Orchestration of the control operations over a store
//! - `memory` - In-memory store and ledger adapters

pub mod export;
pub mod lifecycle;
pub mod memory;
pub mod returns;
pub mod vat;
