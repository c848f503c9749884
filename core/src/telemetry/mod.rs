//! telemetry/mod.rs
//! Per-facade call, byte and dispatch-shape counters.

pub mod counters;

pub use counters::*;
