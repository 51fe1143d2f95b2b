//! QR code detection module using rqrr

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Downsampling passes tried in exhaustive mode (0 = full resolution)
const TRY_HARDER_RESOLUTIONS: [u32; 3] = [0, 1500, 500];

/// Finds a QR code in an image file.
///
/// `Ok(None)` means the image loaded but held no decodable symbol.
pub trait QrDecoder {
    fn decode_qr(&self, image_path: &Path) -> Result<Option<String>, DecodeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Also scan downsampled and inverted copies
    pub try_harder: bool,
    /// Also scan the image rotated by 90 degrees
    pub try_rotate: bool,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            try_harder: true,
            try_rotate: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RqrrDecoder {
    options: QrOptions,
}

impl RqrrDecoder {
    pub fn new(options: QrOptions) -> Self {
        Self { options }
    }
}

impl QrDecoder for RqrrDecoder {
    fn decode_qr(&self, image_path: &Path) -> Result<Option<String>, DecodeError> {
        decode_qr(image_path, &self.options)
    }
}

/// Load an image file and search it for a QR code
pub fn decode_qr(image_path: &Path, options: &QrOptions) -> Result<Option<String>, DecodeError> {
    let img = load_image(image_path)?;
    let rgba = normalize(img);
    log::info!(
        "Scanning {}x{} image for QR codes...",
        rgba.width(),
        rgba.height()
    );
    let found = scan_image(&rgba, options);
    match &found {
        Some(content) => log::info!("QR code decoded ({} bytes)", content.len()),
        None => log::info!("No QR code found"),
    }
    Ok(found)
}

pub(crate) fn load_image(path: &Path) -> Result<DynamicImage, DecodeError> {
    image::open(path).map_err(|source| DecodeError::ImageLoadFailed {
        path: PathBuf::from(path),
        source,
    })
}

/// Bring any source encoding to 8-bit RGBA so the scan sees one layout
pub fn normalize(img: DynamicImage) -> RgbaImage {
    match img {
        DynamicImage::ImageRgba8(rgba) => rgba,
        other => other.to_rgba8(),
    }
}

/// Run every configured pass over an already-normalized image
pub fn scan_image(rgba: &RgbaImage, options: &QrOptions) -> Option<String> {
    let gray = DynamicImage::ImageRgba8(rgba.clone()).to_luma8();

    if let Some(content) = scan_orientation(&gray, options) {
        return Some(content);
    }
    if options.try_rotate {
        log::debug!("Retrying QR scan on rotated image");
        let rotated = image::imageops::rotate90(&gray);
        return scan_orientation(&rotated, options);
    }
    None
}

fn scan_orientation(gray: &GrayImage, options: &QrOptions) -> Option<String> {
    if !options.try_harder {
        return detect_qr_at_resolution(gray, 0).into_iter().next();
    }

    for max_dim in TRY_HARDER_RESOLUTIONS {
        if let Some(content) = detect_qr_at_resolution(gray, max_dim).into_iter().next() {
            return Some(content);
        }
    }

    // light modules on a dark background
    let mut inverted = gray.clone();
    image::imageops::invert(&mut inverted);
    detect_qr_at_resolution(&inverted, 0).into_iter().next()
}

/// Decode every QR code found at a specific resolution
/// max_dim: maximum dimension to downsample to (0 = no downsampling)
pub fn detect_qr_at_resolution(gray: &GrayImage, max_dim: u32) -> Vec<String> {
    use rqrr::PreparedImage;

    let (orig_w, orig_h) = (gray.width(), gray.height());
    if orig_w == 0 || orig_h == 0 {
        return Vec::new();
    }
    let downsample_factor = if max_dim > 0 && (orig_w > max_dim || orig_h > max_dim) {
        orig_w.max(orig_h) as f32 / max_dim as f32
    } else {
        1.0
    };

    let scaled = if downsample_factor > 1.0 {
        let new_w = ((orig_w as f32 / downsample_factor) as u32).max(1);
        let new_h = ((orig_h as f32 / downsample_factor) as u32).max(1);
        log::debug!("QR pass at {}x{}", new_w, new_h);
        image::imageops::resize(gray, new_w, new_h, image::imageops::FilterType::Nearest)
    } else {
        log::debug!("QR pass at full resolution");
        gray.clone()
    };

    let mut prepared = PreparedImage::prepare(scaled);
    let grids = prepared.detect_grids();

    let mut results = Vec::new();
    for grid in grids {
        match grid.decode() {
            Ok((_, content)) => results.push(content),
            Err(e) => log::debug!("Found QR grid but failed to decode it: {:?}", e),
        }
    }
    results
}
