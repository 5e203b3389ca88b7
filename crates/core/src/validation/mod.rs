//! Field-level validation building blocks.
//!
//! [`fields`] holds the independent predicates, [`rules`] the error types the
//! engines report through.

pub mod fields;
pub mod rules;
