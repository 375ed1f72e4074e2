//! Aggregation module - rollup engine, level filtering, and domain models.
//!
//! - `aggregation_model` - line items, budget columns, aggregation results
//! - `engine` - recursive rollup from leaves to roots
//! - `view_filter` - level/inclusion filtering for output views

mod aggregation_model;
mod engine;
mod view_filter;


pub use aggregation_model::{
    AggregationResult, BudgetAmounts, BudgetLevel, BudgetType, ComputedLine, DataType,
    Discrepancy, LineItem, Section,
};
pub use engine::aggregate;
pub use view_filter::{filter_for_view, should_include, LevelScope};
