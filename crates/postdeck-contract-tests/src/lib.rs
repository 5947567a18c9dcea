#![warn(missing_docs)]
//! # postdeck-contract-tests
//!
//! Test-only crate. The actual contract validation lives under `tests/`,
//! exercising the frozen JSON schemas in the workspace `contracts/` directory.
