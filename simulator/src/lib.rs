//! Generates synthetic evoked-response recordings with known ground truth.
pub mod config;
mod noise;
pub mod simulation;
