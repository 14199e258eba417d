use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::path::{Component, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::{Watermark, WatermarkError};
use crate::{AppState, WatermarkConfig};

pub type SharedWatermarker = Arc<Watermarker>;

/// Watermarks images from a source directory on request
pub struct Watermarker {
    source_directory: PathBuf,
    settings: WatermarkConfig,
}

impl Watermarker {
    pub fn new(source_directory: PathBuf, settings: WatermarkConfig) -> Self {
        Self {
            source_directory,
            settings,
        }
    }

    /// Watermark `relative_path` and respond with the encoded bytes
    pub async fn serve(&self, relative_path: &str) -> Response {
        // Security check
        let relative = std::path::Path::new(relative_path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            warn!("Rejected path outside source directory: {}", relative_path);
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        }

        let full_path = self.source_directory.join(relative);
        if !full_path.is_file() {
            debug!("Image file not found: {:?}", full_path);
            return (StatusCode::NOT_FOUND, "Image not found").into_response();
        }

        let settings = self.settings.clone();
        let rendered = tokio::task::spawn_blocking(move || {
            settings
                .apply_appearance(Watermark::new().original(&full_path))
                .show()
        })
        .await;

        match rendered {
            Ok(Ok(rendered)) => (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, rendered.mime_type().to_string()),
                    (header::CACHE_CONTROL, "no-cache".to_string()),
                ],
                rendered.bytes,
            )
                .into_response(),
            Ok(Err(WatermarkError::Configuration(e))) => {
                warn!("Cannot watermark {}: {}", relative_path, e);
                (StatusCode::BAD_REQUEST, e.to_string()).into_response()
            }
            Ok(Err(e @ WatermarkError::InvalidConfig(_))) => {
                warn!("Cannot watermark {}: {}", relative_path, e);
                (StatusCode::BAD_REQUEST, e.to_string()).into_response()
            }
            Ok(Err(e)) => {
                error!("Failed to watermark {}: {}", relative_path, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to watermark image").into_response()
            }
            Err(e) => {
                error!("Watermark task failed for {}: {}", relative_path, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to watermark image").into_response()
            }
        }
    }
}

pub async fn watermark_handler(
    State(app_state): State<AppState>,
    Path(path): Path<String>,
) -> impl IntoResponse {
    app_state.watermarker.serve(&path).await
}
