//! UI module for the chatdock TUI.

pub mod layout;
pub mod theme;
pub mod widgets;

pub use layout::*;
