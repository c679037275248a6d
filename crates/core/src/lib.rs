//! Core business logic for Civica.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Every function here is synchronous and side-effect free, so it can be called
//! concurrently without coordination.
//!
//! # Modules
//!
//! - `financing` - Group subtotals, final totals and the audit trace
//! - `budget` - Budget variance analysis

pub mod budget;
pub mod financing;
