//! User Interface layer
//!
//! This module contains all UI-related code:
//! - Theme palette built from the selected accent
//! - Reusable widgets
//! - Screen renderers

pub mod theme;
pub mod render;
pub mod widgets;

pub use theme::Theme;
pub use render::render;
