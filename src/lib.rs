pub mod cli;
pub mod core;
pub mod shared;

pub use crate::core::session::{SubmitOutcome, TranslatorSession};
pub use crate::shared::error::{AppError, AppResult};
