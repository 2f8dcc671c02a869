//! Mock bank domain
//!
//! Fixture data, tool argument records and the operations that combine them.

pub mod fixtures;
pub mod operations;
pub mod requests;
