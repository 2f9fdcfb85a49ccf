//! Context detection
//!
//! Heuristic language detection used to resolve an "auto" source language.

pub mod detection;

pub use detection::detect_language;
