//! Pure domain logic for the Storyloom generation pipeline.
//!
//! This crate has no I/O: storage addressing, prompt composition, and
//! candidate scoring are all deterministic functions so the api crate can
//! orchestrate them around its async calls and the tests can exercise them
//! without a database or network.

pub mod addressing;
pub mod error;
pub mod prompt;
pub mod scoring;
pub mod types;
