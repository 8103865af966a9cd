use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to read document: {0}")]
    DocumentError(String),
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
    #[error("Failed to load logo: {0}")]
    LogoError(String),
    #[error("Password hashing failed: {0}")]
    AuthError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
