//! Widgets composing the chat widget screen.

pub mod input_bar;
pub mod loading;
pub mod output_panel;
pub mod welcome;

pub use input_bar::{InputBar, SendButton};
pub use loading::LoadingIndicator;
pub use output_panel::OutputPanel;
pub use welcome::WelcomeBanner;
