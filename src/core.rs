pub mod context;
pub mod features;
pub mod session;
