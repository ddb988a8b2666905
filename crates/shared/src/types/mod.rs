//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{COEFFICIENT_SCALE, CURRENCY_SCALE, round_coefficient, round_currency};
