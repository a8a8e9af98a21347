//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed interface for:
//! - Patient data entry with live BMI
//! - Risk assessment display with factors and recommendations

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
