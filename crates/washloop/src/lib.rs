//! Wiring that runs a washout loop against a simulated motion feed.

pub mod config;
pub mod feed;
pub mod gain;
pub mod runner;
