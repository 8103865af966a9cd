//! Logo loading from data URIs, URLs or local files.

use ::image::DynamicImage;
use base64::{engine::general_purpose, Engine as _};
use log::{debug, warn};
use std::io::Read;

use crate::error::AppError;

/// Which logo sources may be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoAccess {
    /// Data URIs, http(s) URLs and local files.
    Any,
    /// Data URIs only. Used for documents received over HTTP, so a request
    /// can neither read server files nor make the server fetch URLs.
    DataUriOnly,
}

/// Loads the logo behind `source`, or `None` if it cannot be used.
///
/// Failures are logged and never abort document generation.
pub fn load_logo(source: &str, access: LogoAccess) -> Option<DynamicImage> {
    let result = match access {
        LogoAccess::DataUriOnly if !is_data_uri(source) => Err(AppError::LogoError(
            "Only data URI logos are accepted here".to_string(),
        )),
        _ => fetch_logo(source),
    };

    match result {
        Ok(img) => {
            debug!("Loaded logo ({}x{})", img.width(), img.height());
            Some(img)
        }
        Err(e) => {
            warn!("{}; continuing without logo", e);
            None
        }
    }
}

fn is_data_uri(source: &str) -> bool {
    source.trim_start().starts_with("data:")
}

pub fn fetch_logo(source: &str) -> Result<DynamicImage, AppError> {
    let source = source.trim();
    let image_bytes = if is_data_uri(source) {
        decode_data_uri(source)?
    } else if source.starts_with("http://") || source.starts_with("https://") {
        let response = ureq::get(source)
            .call()
            .map_err(|e| AppError::LogoError(format!("Failed to fetch URL: {}", e)))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| AppError::LogoError(format!("Failed to read response: {}", e)))?;
        bytes
    } else {
        std::fs::read(source).map_err(|e| AppError::LogoError(format!("{}: {}", source, e)))?
    };

    ::image::load_from_memory(&image_bytes)
        .map_err(|e| AppError::LogoError(format!("Failed to decode image: {}", e)))
}

/// Decodes `data:[<mime>][;base64],<payload>`. Only base64 payloads carry images.
fn decode_data_uri(uri: &str) -> Result<Vec<u8>, AppError> {
    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| AppError::LogoError("Malformed data URI".to_string()))?;

    if !header.ends_with(";base64") {
        return Err(AppError::LogoError(
            "Data URI is not base64 encoded".to_string(),
        ));
    }

    general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::LogoError(format!("Invalid base64 payload: {}", e)))
}

/// Wraps raw image bytes as a base64 data URI.
pub fn to_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}
