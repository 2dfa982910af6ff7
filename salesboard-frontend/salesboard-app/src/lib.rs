pub mod analysis;
pub mod components;
pub mod config;
mod dashboard;
pub mod error;
pub mod format;
pub mod global_state;

pub use dashboard::Dashboard;
