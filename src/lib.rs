//! invoice-offer-pdf: paginated invoice and offer PDFs for a small business.

pub mod auth;
pub mod config;
pub mod error;
pub mod kind;
pub mod layout;
pub mod logo;
pub mod metrics;
pub mod model;
pub mod pdf;
pub mod server;
pub mod totals;

pub use error::AppError;
pub use kind::DocumentKind;
pub use model::{CompanyProfile, Document, LineItem, Recipient, Salutation};
