//! Translation features: request orchestration, quality scoring, the
//! simulated heatmap and the mascot.

pub mod evaluation;
pub mod heatmap;
pub mod mascot;
pub mod translator;
