use std::time::Duration;

/// Process-wide configuration, loaded once at startup from the environment
/// and shared behind an `Arc`. Nothing here is mutated after construction.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,

    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,

    pub classifier_base_url: String,
    pub classifier_timeout: Duration,

    pub max_upload_size: usize,
    pub allowed_image_extensions: Vec<String>,
    pub upload_dir: String,

    pub cors_origins: Vec<String>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppConfig {
    /// Reads configuration from the environment. Panics on missing
    /// `DATABASE_URL` or `JWT_SECRET_KEY`; everything else has a default.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            redis_url: env_or("REDIS_URL", "redis://localhost:6379"),
            jwt_secret: std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set"),
            access_token_expire_minutes: env_parse("ACCESS_TOKEN_EXPIRE_MINUTES", 30),
            refresh_token_expire_days: env_parse("REFRESH_TOKEN_EXPIRE_DAYS", 7),
            classifier_base_url: env_or("CLASSIFIER_API_BASE_URL", "http://localhost:9000"),
            classifier_timeout: Duration::from_secs(env_parse("CLASSIFIER_API_TIMEOUT", 30)),
            max_upload_size: env_parse("MAX_UPLOAD_SIZE", 10 * 1024 * 1024),
            allowed_image_extensions: split_list(&env_or(
                "ALLOWED_IMAGE_EXTENSIONS",
                ".jpg,.jpeg,.png,.gif",
            )),
            upload_dir: env_or("UPLOAD_DIR", "./uploads"),
            cors_origins: split_list(&env_or("CORS_ORIGINS", "http://localhost:3000")),
        }
    }

    pub fn extension_allowed(&self, ext: &str) -> bool {
        let dotted = if ext.starts_with('.') {
            ext.to_ascii_lowercase()
        } else {
            format!(".{}", ext.to_ascii_lowercase())
        };
        self.allowed_image_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&dotted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".into(),
            redis_url: "redis://localhost:6379".into(),
            jwt_secret: "test-secret".into(),
            access_token_expire_minutes: 30,
            refresh_token_expire_days: 7,
            classifier_base_url: "http://localhost:9000".into(),
            classifier_timeout: Duration::from_secs(30),
            max_upload_size: 10 * 1024 * 1024,
            allowed_image_extensions: split_list(".jpg,.jpeg,.png,.gif"),
            upload_dir: "./uploads".into(),
            cors_origins: split_list("http://localhost:3000"),
        }
    }

    #[test]
    fn split_list_trims_and_drops_empties() {
        assert_eq!(
            split_list(" .jpg, .png ,,.gif"),
            vec![".jpg", ".png", ".gif"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn extension_allowed_handles_dot_and_case() {
        let config = test_config();
        assert!(config.extension_allowed(".jpg"));
        assert!(config.extension_allowed("JPEG"));
        assert!(config.extension_allowed("png"));
        assert!(!config.extension_allowed(".bmp"));
    }
}
