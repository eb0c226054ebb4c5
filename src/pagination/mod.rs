//! Pagination module
//!
//! # Overview
//!
//! One planning request decides everything: the planner reads the
//! total-count and per-page fields from the first response and computes
//! `total_pages = ceil(total_count / per_page)`. When either field is
//! missing the raw body is the final result (`Plan::Unpaged`). Page
//! requests then carry a 1-based page index and, when configured, a
//! start-index offset.

mod planner;
mod types;

pub use planner::Planner;
pub use types::{PageRequest, Plan};

#[cfg(test)]
mod tests;
