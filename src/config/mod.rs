use std::env;

/// Runtime configuration for the menu backend
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory where menu item photos are stored (default: "./uploads")
    pub upload_dir: String,

    /// Maximum photo upload size in bytes (default: 5 MB)
    pub max_upload_size: usize,

    /// Base URL used to build public photo links (default: "http://localhost:3000")
    pub base_url: String,

    /// Restaurant id used when the x-restaurant-id header is absent.
    /// Stand-in until a token-based scheme carries the tenant.
    pub default_restaurant_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload_dir: "./uploads".to_string(),
            max_upload_size: 5 * 1024 * 1024, // 5 MB
            base_url: "http://localhost:3000".to_string(),
            default_restaurant_id: "00000000-0000-0000-0000-000000000001".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            upload_dir: env::var("UPLOAD_DIR").unwrap_or(default.upload_dir),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            base_url: env::var("BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(default.base_url),

            default_restaurant_id: env::var("DEFAULT_RESTAURANT_ID")
                .unwrap_or(default.default_restaurant_id),
        }
    }
}
