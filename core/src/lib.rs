//! Core library for the tally nutrition tracker.
//!
//! Pure calculation engine, local durable cache, remote store contract, and
//! the reconciling data store that ties the two tiers together. Transport
//! (HTTP) and presentation live in the `tally` CLI crate.

pub mod cache;
pub mod calc;
pub mod catalog;
pub mod export;
pub mod models;
pub mod remote;
pub mod store;
