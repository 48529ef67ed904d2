//! Demo programs for tessel.

/// Demo configuration files.
pub mod config;
/// Focus playground.
pub mod focusgym;
