//! HTTP surface: the login check and PDF export/preview endpoints.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

use crate::auth::Account;
use crate::error::AppError;
use crate::kind::DocumentKind;
use crate::logo::LogoAccess;
use crate::model::{CompanyProfile, Document, ProfileField};
use crate::pdf::pdf_bytes;

pub struct AppState {
    pub account: Account,
    pub profile: CompanyProfile,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub username: String,
}

/// Body of the export and preview endpoints.
#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    #[serde(flatten)]
    pub document: Document,
    /// Company profile fields replaced for this request only, keyed like the
    /// profile JSON ("taxNumber").
    #[serde(default)]
    pub company: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/documents/:kind", post(export_document))
        .route("/api/documents/:kind/preview", post(preview_document))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    info!("Login attempt for: {}", req.username);

    let username = req.username.clone();
    let verifier = Arc::clone(&state);
    let authenticated = tokio::task::spawn_blocking(move || {
        verifier.account.authenticate(&req.username, &req.password)
    })
    .await
    .map_err(|e| {
        error!("Password verification task failed: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    })?;

    if !authenticated {
        warn!("Invalid credentials for: {}", username);
        return Err(api_error(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }

    Ok(Json(LoginResponse {
        user: UserInfo { username },
    }))
}

pub async fn export_document(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(req): Json<DocumentRequest>,
) -> Result<Response, ApiError> {
    render_pdf_response(state, &kind, req, "attachment").await
}

pub async fn preview_document(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(req): Json<DocumentRequest>,
) -> Result<Response, ApiError> {
    render_pdf_response(state, &kind, req, "inline").await
}

async fn render_pdf_response(
    state: Arc<AppState>,
    slug: &str,
    req: DocumentRequest,
    disposition: &str,
) -> Result<Response, ApiError> {
    let kind = DocumentKind::from_slug(slug)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Unknown document type: {}", slug)))?;

    let mut profile = state.profile.clone();
    for (key, value) in req.company {
        let field: ProfileField = key
            .parse()
            .map_err(|e: AppError| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
        profile.set(field, value);
    }

    let doc = req.document;
    let bytes = tokio::task::spawn_blocking(move || {
        pdf_bytes(&doc, &profile, &kind, LogoAccess::DataUriOnly)
    })
    .await
    .map_err(|e| {
        error!("Render task failed: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    })?
    .map_err(|e: AppError| {
        error!("{}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let disposition = format!("{}; filename=\"{}\"", disposition, kind.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Serves until Ctrl-C, over TLS when a certificate and key are given.
pub async fn serve(
    state: Arc<AppState>,
    addr: SocketAddr,
    tls: Option<(String, String)>,
) -> Result<(), AppError> {
    let app = router(state);

    match tls {
        Some((cert_path, key_path)) => {
            let tls_config = RustlsConfig::from_pem_file(&cert_path, &key_path).await?;
            info!("HTTPS server listening on {}", addr);

            let handle = axum_server::Handle::new();
            let handle_clone = handle.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                handle_clone.graceful_shutdown(Some(Duration::from_secs(10)));
            });

            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            warn!("TLS certificates not configured, using HTTP");
            let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                error!("Failed to bind to {}: {}", addr, e);
                e
            })?;
            info!("HTTP server listening on {}", addr);
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down server...");
}
