//! Reusable UI components
//!
//! - `keybindings` - context-aware keybinding registry
//! - `nav_bar` - bottom navigation bar with per-phase hints
//! - `help_overlay` - floating help window

pub mod help_overlay;
pub mod keybindings;
pub mod nav_bar;
