//! JSON inputs: the company profile and the document to render.

use log::{info, warn};

use crate::error::AppError;
use crate::model::{CompanyProfile, Document};

/// Reads the company profile, or falls back to an empty one.
///
/// Empty fields are printed as bracketed placeholders, so a missing profile
/// still yields a complete document.
pub fn load_company_profile(path: &Option<String>) -> Result<CompanyProfile, AppError> {
    match path {
        Some(p) => {
            let content = std::fs::read_to_string(p)
                .map_err(|e| AppError::ConfigError(format!("{}: {}", p, e)))?;
            let profile: CompanyProfile = serde_json::from_str(&content)
                .map_err(|e| AppError::ConfigError(format!("Invalid company profile: {}", e)))?;
            info!("Loaded company profile '{}' from {}", profile.name, p);
            Ok(profile)
        }
        None => {
            warn!("No company profile configured, sender fields will show placeholders");
            Ok(CompanyProfile::default())
        }
    }
}

/// Reads a document from JSON, or starts from an empty one.
pub fn load_document(path: &Option<String>) -> Result<Document, AppError> {
    match path {
        Some(p) => parse_document(&std::fs::read_to_string(p).map_err(|e| {
            AppError::DocumentError(format!("{}: {}", p, e))
        })?),
        None => Ok(Document::default()),
    }
}

pub fn parse_document(json: &str) -> Result<Document, AppError> {
    serde_json::from_str(json).map_err(|e| AppError::DocumentError(format!("Invalid JSON: {}", e)))
}
