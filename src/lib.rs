//! Screenshot to text: capture the screen, decode a QR code if there is one,
//! otherwise run OCR.

pub mod capture;
pub mod config;
pub mod error;
pub mod export;
pub mod ocr;
pub mod outcome;
pub mod pipeline;
pub mod qr;

pub use config::ShotscanConfig;
pub use error::DecodeError;
pub use outcome::{DecodeOutcome, Stage};
pub use pipeline::Pipeline;

/// Capture to the default temp path and decode with the default tools
pub fn run(qr_enabled: bool, language: &str) -> DecodeOutcome {
    Pipeline::default().run(qr_enabled, language)
}
