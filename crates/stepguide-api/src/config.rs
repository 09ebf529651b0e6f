//! Service configuration.

use std::path::PathBuf;
use std::time::Duration;

use stepguide_callback::CallbackConfig;
use stepguide_storage::StoreMode;
use tracing::warn;

/// Default upload limit: 100 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Room for multipart framing and text fields on top of the upload limit.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Submission service configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Shared secret expected as `Authorization: Bearer <secret>`
    pub import_token: String,
    /// Largest accepted uploaded video
    pub max_upload_bytes: usize,
    /// Require `video_url` to be an absolute http(s) URL
    pub strict_video_url: bool,
    /// Upper bound for one webhook delivery
    pub callback_timeout: Duration,
    /// Where placeholder frame images are served from
    pub frame_image_base_url: String,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            import_token: String::new(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            strict_video_url: false,
            callback_timeout: CallbackConfig::default().timeout,
            frame_image_base_url: "http://example.com".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: cors_origins_from_env(),
            import_token: std::env::var("IMPORT_TOKEN").unwrap_or_default(),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            strict_video_url: std::env::var("VIDEO_URL_STRICT")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            callback_timeout: CallbackConfig::from_env().timeout,
            frame_image_base_url: std::env::var("FRAME_IMAGE_BASE_URL")
                .unwrap_or_else(|_| "http://example.com".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Hard cap on the request body, framing included.
    pub fn max_body_size(&self) -> usize {
        self.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

/// Receiver service configuration.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// File holding received guides
    pub store_path: PathBuf,
    /// Single-slot or keyed retention
    pub store_mode: StoreMode,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            cors_origins: vec!["*".to_string()],
            store_path: PathBuf::from("received.json"),
            store_mode: StoreMode::SingleSlot,
            environment: "development".to_string(),
        }
    }
}

impl ReceiverConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let store_mode = match std::env::var("STORE_MODE") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, falling back to single-slot store", e);
                StoreMode::SingleSlot
            }),
            Err(_) => StoreMode::SingleSlot,
        };

        Self {
            host: std::env::var("RECEIVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("RECEIVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4000),
            cors_origins: cors_origins_from_env(),
            store_path: std::env::var("RECEIVED_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("received.json")),
            store_mode,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }
}

fn cors_origins_from_env() -> Vec<String> {
    std::env::var("CORS_ORIGINS")
        .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_else(|_| vec!["*".to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_upload_bytes, 104_857_600);
        assert_eq!(config.max_body_size(), 104_857_600 + 1_048_576);
        assert_eq!(config.callback_timeout, Duration::from_secs(5));
        assert!(config.import_token.is_empty());
        assert!(!config.strict_video_url);
    }

    #[test]
    fn test_receiver_defaults() {
        let config = ReceiverConfig::default();
        assert_eq!(config.port, 4000);
        assert_eq!(config.store_path, PathBuf::from("received.json"));
        assert_eq!(config.store_mode, StoreMode::SingleSlot);
    }
}
