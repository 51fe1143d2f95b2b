//! OCR (Optical Character Recognition) module using rusty-tesseract

use std::collections::HashMap;
use std::path::Path;

use image::DynamicImage;
use rusty_tesseract::{Args, Image};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::qr::load_image;

/// Extracts text from an image file for a language spec such as `eng` or `eng+hin`
pub trait TextRecognizer {
    fn recognize_text(&self, image_path: &Path, language: &str) -> Result<String, DecodeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrOptions {
    pub dpi: Option<i32>,
    /// Page segmentation mode, 3 = fully automatic
    pub psm: i32,
    /// OCR engine mode, 3 = default
    pub oem: i32,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            dpi: Some(150),
            psm: 3,
            oem: 3,
        }
    }
}

/// Split a `+`-joined language spec into its model names
pub fn language_codes(language: &str) -> impl Iterator<Item = &str> {
    language.split('+').map(str::trim)
}

/// The spec as tesseract's `-l` expects it, without stray whitespace
pub fn tesseract_lang(language: &str) -> String {
    language_codes(language).collect::<Vec<_>>().join("+")
}

/// Tesseract configured for one language spec.
///
/// Dropping it releases the engine; it is never reused across runs.
pub struct OcrEngine {
    language: String,
    args: Args,
}

impl std::fmt::Debug for OcrEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrEngine")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl OcrEngine {
    /// Fails if tesseract is missing or lacks data for any requested language
    pub fn init(language: &str, options: &OcrOptions) -> Result<Self, DecodeError> {
        let init_failed = |reason: String| DecodeError::EngineInitFailed {
            language: language.to_string(),
            reason,
        };

        let installed = rusty_tesseract::get_tesseract_langs()
            .map_err(|e| init_failed(format!("tesseract unavailable: {}", e)))?;
        if let Some(missing) =
            language_codes(language).find(|code| !installed.iter().any(|l| l == code))
        {
            return Err(init_failed(format!("missing language data for '{}'", missing)));
        }

        log::debug!("Tesseract initialized for '{}'", language);
        Ok(Self {
            language: language.to_string(),
            args: Args {
                lang: tesseract_lang(language),
                config_variables: HashMap::new(),
                dpi: options.dpi,
                psm: Some(options.psm),
                oem: Some(options.oem),
            },
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Full-page extraction; an image without text yields an empty string
    pub fn recognize(&self, img: &DynamicImage) -> Result<String, DecodeError> {
        log::info!(
            "Running OCR with rusty-tesseract on {}x{} image...",
            img.width(),
            img.height()
        );

        let tess_img = Image::from_dynamic_image(img).map_err(|e| {
            DecodeError::EngineInitFailed {
                language: self.language.clone(),
                reason: format!("failed to create tesseract image: {}", e),
            }
        })?;

        let text = rusty_tesseract::image_to_string(&tess_img, &self.args).map_err(|e| {
            DecodeError::EngineInitFailed {
                language: self.language.clone(),
                reason: format!("tesseract failed: {}", e),
            }
        })?;

        let text = text.trim().to_string();
        log::info!("OCR produced {} characters", text.chars().count());
        Ok(text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TesseractRecognizer {
    options: OcrOptions,
}

impl TesseractRecognizer {
    pub fn new(options: OcrOptions) -> Self {
        Self { options }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize_text(&self, image_path: &Path, language: &str) -> Result<String, DecodeError> {
        recognize_text(image_path, language, &self.options)
    }
}

/// Initialize the engine, load the image, extract text
pub fn recognize_text(
    image_path: &Path,
    language: &str,
    options: &OcrOptions,
) -> Result<String, DecodeError> {
    let engine = OcrEngine::init(language, options)?;
    let img = load_image(image_path)?;
    engine.recognize(&img)
}
