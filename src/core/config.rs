use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Which index collaborator backs the file repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBackend {
    Elasticsearch,
    /// Process-local index, contents are lost on restart
    Memory,
}

/// Elasticsearch connection settings
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub backend: SearchBackend,
    /// Base URL of the cluster, e.g. "http://localhost:9200"
    pub url: String,
    /// Index holding file documents
    pub index: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
    /// Upper bound of `from + size` accepted by the index
    pub max_result_window: u64,
}

/// File metadata rules
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Top-level MIME types that become a category tag on upload
    pub file_categories: Vec<String>,
    /// How many times a tag update is retried after a version conflict
    pub tag_update_max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            search: SearchConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

/// Split a comma-separated value into trimmed, non-empty items
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins =
            parse_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SearchBackend {
    fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_lowercase().as_str() {
            "elasticsearch" | "es" => Ok(Self::Elasticsearch),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "SEARCH_BACKEND must be 'elasticsearch' or 'memory', got '{}'",
                other
            )),
        }
    }
}

impl SearchConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    // Matches the index.max_result_window default of Elasticsearch
    const DEFAULT_MAX_RESULT_WINDOW: u64 = 10_000;

    pub fn from_env() -> Result<Self, String> {
        let backend = SearchBackend::parse(
            &env::var("SEARCH_BACKEND").unwrap_or_else(|_| "elasticsearch".to_string()),
        )?;

        let url = env::var("ELASTICSEARCH_URL")
            .unwrap_or_else(|_| "http://localhost:9200".to_string())
            .trim_end_matches('/')
            .to_string();

        let index = env::var("ELASTICSEARCH_INDEX").unwrap_or_else(|_| "files".to_string());
        if index.is_empty() {
            return Err("ELASTICSEARCH_INDEX must not be empty".to_string());
        }

        let username = env::var("ELASTICSEARCH_USERNAME")
            .ok()
            .filter(|s| !s.is_empty());
        let password = env::var("ELASTICSEARCH_PASSWORD")
            .ok()
            .filter(|s| !s.is_empty());

        let timeout_secs = env::var("ELASTICSEARCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "ELASTICSEARCH_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_result_window = env::var("ELASTICSEARCH_MAX_RESULT_WINDOW")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_RESULT_WINDOW.to_string())
            .parse::<u64>()
            .map_err(|_| "ELASTICSEARCH_MAX_RESULT_WINDOW must be a valid number".to_string())?;

        Ok(Self {
            backend,
            url,
            index,
            username,
            password,
            timeout: Duration::from_secs(timeout_secs),
            max_result_window,
        })
    }
}

impl StorageConfig {
    const DEFAULT_FILE_CATEGORIES: &'static str = "audio,video,text,image";
    const DEFAULT_TAG_UPDATE_MAX_RETRIES: u32 = 3;

    pub fn from_env() -> Result<Self, String> {
        let file_categories = parse_list(
            &env::var("FILE_CATEGORIES")
                .unwrap_or_else(|_| Self::DEFAULT_FILE_CATEGORIES.to_string()),
        )
        .into_iter()
        .map(|c| c.to_lowercase())
        .collect();

        let tag_update_max_retries = env::var("TAG_UPDATE_MAX_RETRIES")
            .unwrap_or_else(|_| Self::DEFAULT_TAG_UPDATE_MAX_RETRIES.to_string())
            .parse::<u32>()
            .map_err(|_| "TAG_UPDATE_MAX_RETRIES must be a valid number".to_string())?;

        Ok(Self {
            file_categories,
            tag_update_max_retries,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "File Tag Storage API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Metadata and tag search for stored files".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
