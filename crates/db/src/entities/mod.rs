//! `SeaORM` entities for the VAT return engine.

pub mod companies;
pub mod sea_orm_active_enums;
pub mod vat_ledger_lines;
pub mod vat_returns;
