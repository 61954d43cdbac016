//! Keyword-weighted screening of journal text for depressive sentiment.
//!
//! The [`scoring`] module holds the engine: text is scored against weighted
//! patterns starting from a baseline of 12.5, clamped to `[0, 25]`, and mapped
//! to one of five severity categories. It is a screening aid, not a clinical
//! instrument.

pub mod config;
pub mod input;
pub mod logging;
pub mod output;
pub mod scoring;

pub use scoring::{analyze, classify, score};
