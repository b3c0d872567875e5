//! Utilities Module
//!
//! Common utilities used across the crate.

pub mod display;
pub mod logging;

pub use display::*;
