//! Budget balance derived across the income and expense sections.

mod calculator;
mod deficit_model;

#[cfg(test)]
mod calculator_tests;

pub use calculator::compute_deficit;
pub use deficit_model::DeficitResult;
