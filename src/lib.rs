use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod startup_checks;
pub mod watermark;

use watermark::{AlignX, AlignY, Dimension, Offset, OutputFormat, Watermark, WatermarkOptions};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub watermark: WatermarkConfig,
    pub serve: ServeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

/// The `[watermark]` table. Every field is optional in the file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Path of the watermark image
    pub image: Option<PathBuf>,
    pub opacity: f64,
    pub width: Dimension,
    pub height: Dimension,
    pub align_x: AlignX,
    pub align_y: AlignY,
    pub offset_x: Offset,
    pub offset_y: Offset,
    pub output_format: OutputFormat,
    pub quality: u8,
    pub debug: bool,
    pub destination_path: Option<PathBuf>,
    pub destination_filename: Option<String>,
    pub backup_path: Option<PathBuf>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        let options = WatermarkOptions::default();
        Self {
            image: None,
            opacity: options.opacity,
            width: options.width,
            height: options.height,
            align_x: options.align_x,
            align_y: options.align_y,
            offset_x: options.offset_x,
            offset_y: options.offset_y,
            output_format: options.output_format,
            quality: options.quality,
            debug: false,
            destination_path: None,
            destination_filename: None,
            backup_path: None,
        }
    }
}

impl WatermarkConfig {
    /// Apply the watermark image and how it is drawn and encoded
    pub fn apply_appearance(&self, builder: Watermark) -> Watermark {
        let builder = match &self.image {
            Some(image) => builder.watermark(image),
            None => builder,
        };

        builder
            .opacity(self.opacity)
            .width(self.width)
            .height(self.height)
            .align_x(self.align_x)
            .align_y(self.align_y)
            .offset_x(self.offset_x)
            .offset_y(self.offset_y)
            .output_format(self.output_format)
            .quality(self.quality)
            .debug(self.debug)
    }

    /// Apply everything, including where results and backups are written
    pub fn apply(&self, builder: Watermark) -> Watermark {
        let mut builder = self.apply_appearance(builder);
        if let Some(path) = &self.destination_path {
            builder = builder.destination_path(path);
        }
        if let Some(name) = &self.destination_filename {
            builder = builder.destination_filename(name.clone());
        }
        if let Some(path) = &self.backup_path {
            builder = builder.backup_path(path);
        }
        builder
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServeConfig {
    /// Images served by `GET /watermark/{path}` are looked up here
    pub source_directory: PathBuf,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            source_directory: PathBuf::from("photos"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            app: AppConfig {
                name: "overmark".to_string(),
                log_level: "info".to_string(),
            },
            watermark: WatermarkConfig::default(),
            serve: ServeConfig::default(),
        }
    }
}

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub watermarker: watermark::SharedWatermarker,
    pub config: Config,
}

async fn healthz_handler() -> &'static str {
    "ok"
}

pub async fn create_app(config: Config) -> Router {
    let watermarker = Arc::new(watermark::Watermarker::new(
        config.serve.source_directory.clone(),
        config.watermark.clone(),
    ));

    let app_state = AppState {
        watermarker,
        config: config.clone(),
    };

    Router::new()
        .route("/healthz", axum::routing::get(healthz_handler))
        .route(
            "/watermark/{*path}",
            axum::routing::get(watermark::watermark_handler),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let method = request.method();
                    let uri = request.uri();
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched_path| matched_path.as_str());

                    tracing::info_span!(
                        "http_request",
                        method = %method,
                        uri = %uri,
                        matched_path,
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    let user_agent = request
                        .headers()
                        .get("user-agent")
                        .and_then(|h| h.to_str().ok())
                        .unwrap_or("-");

                    tracing::info!(
                        target: "access_log",
                        method = %request.method(),
                        path = %request.uri().path(),
                        user_agent = %user_agent,
                        "request"
                    );
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        let size = response
                            .headers()
                            .get("content-length")
                            .and_then(|h| h.to_str().ok())
                            .unwrap_or("-");

                        tracing::info!(
                            target: "access_log",
                            status = %response.status(),
                            size = %size,
                            latency_ms = %latency.as_millis(),
                            "response"
                        );
                    },
                ),
        )
        .with_state(app_state)
}
