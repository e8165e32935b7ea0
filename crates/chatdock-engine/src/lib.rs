//! chatdock-engine: Headless core for the chatdock chat widget
//!
//! This crate provides the surface-agnostic logic of the widget:
//! - Configuration loading and endpoint URL construction
//! - Input trimming and the Enter-to-submit keyboard policy
//! - The outbound request to the assistant endpoint
//! - Payload classification (image vs text) and output markup
//! - The request/response/render controller and its surface trait
//! - Export of image payloads to PNG files

pub mod client;
pub mod config;
pub mod controller;
pub mod image;
pub mod input;
pub mod payload;

// Re-export commonly used types
pub use client::{AssistantClient, HttpAssistant, RequestFailure};
pub use config::{Config, ConfigError, CONFIG_DIR, CONFIG_FILE};
pub use controller::{ChatController, ChatSurface, Submission, Ticket};
pub use image::{decode_png_data_uri, save_png, ImageError};
pub use input::{normalize_input, KeyPolicy, DEFAULT_SUBMIT_MIN_WIDTH_PX};
pub use payload::{classify, Output, Payload, ERROR_PREAMBLE, IMAGE_PREFIX};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
