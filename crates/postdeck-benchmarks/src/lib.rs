#![warn(missing_docs)]
//! # postdeck-benchmarks
//!
//! Test-only crate. Lightweight latency guardrails for the payload assembly
//! path live under `tests/`.
