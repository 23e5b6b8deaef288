//! Load a small business dataset, summarize it, and render charts and a
//! text report from an interactive menu.

pub mod analysis;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod menu;
pub mod output;
pub mod render;
pub mod report;
pub mod session;

pub use error::{DataVisError, Result};
