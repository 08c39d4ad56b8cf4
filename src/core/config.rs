use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub submission: SubmissionConfig,
    pub map: MapConfig,
    pub geocoding: GeocodingConfig,
    pub admin: AdminConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Local key-value storage holding the report collection
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding one file per storage key
    pub dir: PathBuf,
    /// Total bytes the storage may hold across all keys
    pub quota_bytes: usize,
    /// Key under which the report collection is persisted
    pub reports_key: String,
}

#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    /// Minimum number of photos a submission must carry
    pub min_photos: usize,
    /// Fixed delay before a successful submission is confirmed
    pub delay: Duration,
}

/// Map picker settings rendered into the report form
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Tile URL template; `None` disables the map picker
    pub tile_url: Option<String>,
    pub attribution: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
}

#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub base_url: String,
    pub country_codes: Option<String>,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: Option<String>,
    pub password: Option<String>,
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
            storage: StorageConfig::from_env()?,
            submission: SubmissionConfig::from_env()?,
            map: MapConfig::from_env()?,
            geocoding: GeocodingConfig::from_env()?,
            admin: AdminConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    // Photos travel inline in the multipart body
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 25 * 1024 * 1024; // 25MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

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

impl StorageConfig {
    // Same order of magnitude as a browser's local storage allowance
    const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024; // 5MB
    pub const DEFAULT_REPORTS_KEY: &'static str = "bmc_reports";

    pub fn from_env() -> Result<Self, String> {
        let dir = env::var("STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let quota_bytes = env::var("STORAGE_QUOTA_BYTES")
            .unwrap_or_else(|_| Self::DEFAULT_QUOTA_BYTES.to_string())
            .parse::<usize>()
            .map_err(|_| "STORAGE_QUOTA_BYTES must be a valid number".to_string())?;

        let reports_key = env::var("STORAGE_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_REPORTS_KEY.to_string());

        Ok(Self {
            dir,
            quota_bytes,
            reports_key,
        })
    }
}

impl SubmissionConfig {
    const DEFAULT_MIN_PHOTOS: usize = 1;
    const DEFAULT_DELAY_MS: u64 = 1000;

    pub fn from_env() -> Result<Self, String> {
        let min_photos = env::var("MIN_PHOTOS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_PHOTOS.to_string())
            .parse::<usize>()
            .map_err(|_| "MIN_PHOTOS must be a valid number".to_string())?;

        if min_photos == 0 {
            return Err("MIN_PHOTOS must be at least 1".to_string());
        }

        let delay_ms = env::var("SUBMISSION_DELAY_MS")
            .unwrap_or_else(|_| Self::DEFAULT_DELAY_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "SUBMISSION_DELAY_MS must be a valid number".to_string())?;

        Ok(Self {
            min_photos,
            delay: Duration::from_millis(delay_ms),
        })
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            min_photos: Self::DEFAULT_MIN_PHOTOS,
            delay: Duration::from_millis(Self::DEFAULT_DELAY_MS),
        }
    }
}

impl MapConfig {
    const DEFAULT_TILE_URL: &'static str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
    const DEFAULT_ATTRIBUTION: &'static str =
        "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
    // Mumbai
    const DEFAULT_CENTER_LAT: f64 = 19.0760;
    const DEFAULT_CENTER_LNG: f64 = 72.8777;
    const DEFAULT_ZOOM: u8 = 11;

    pub fn from_env() -> Result<Self, String> {
        // An explicitly empty MAP_TILE_URL disables the picker
        let tile_url = match env::var("MAP_TILE_URL") {
            Ok(url) if url.trim().is_empty() => None,
            Ok(url) => Some(url),
            Err(_) => Some(Self::DEFAULT_TILE_URL.to_string()),
        };

        let attribution =
            env::var("MAP_ATTRIBUTION").unwrap_or_else(|_| Self::DEFAULT_ATTRIBUTION.to_string());

        let center_lat = env::var("MAP_CENTER_LAT")
            .unwrap_or_else(|_| Self::DEFAULT_CENTER_LAT.to_string())
            .parse::<f64>()
            .map_err(|_| "MAP_CENTER_LAT must be a valid number".to_string())?;

        let center_lng = env::var("MAP_CENTER_LNG")
            .unwrap_or_else(|_| Self::DEFAULT_CENTER_LNG.to_string())
            .parse::<f64>()
            .map_err(|_| "MAP_CENTER_LNG must be a valid number".to_string())?;

        let zoom = env::var("MAP_ZOOM")
            .unwrap_or_else(|_| Self::DEFAULT_ZOOM.to_string())
            .parse::<u8>()
            .map_err(|_| "MAP_ZOOM must be a valid number".to_string())?;

        Ok(Self {
            tile_url,
            attribution,
            center_lat,
            center_lng,
            zoom,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.tile_url.is_some()
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: Some(Self::DEFAULT_TILE_URL.to_string()),
            attribution: Self::DEFAULT_ATTRIBUTION.to_string(),
            center_lat: Self::DEFAULT_CENTER_LAT,
            center_lng: Self::DEFAULT_CENTER_LNG,
            zoom: Self::DEFAULT_ZOOM,
        }
    }
}

impl GeocodingConfig {
    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("GEOCODING_BASE_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string())
            .trim_end_matches('/')
            .to_string();

        let country_codes = env::var("GEOCODING_COUNTRY_CODES")
            .unwrap_or_else(|_| "in".to_string());
        let country_codes = Some(country_codes).filter(|s| !s.trim().is_empty());

        let user_agent = env::var("GEOCODING_USER_AGENT")
            .unwrap_or_else(|_| "CivicReportDesk/0.1 (civic-issue-reporting)".to_string());

        Ok(Self {
            base_url,
            country_codes,
            user_agent,
        })
    }
}

impl AdminConfig {
    pub fn from_env() -> Result<Self, String> {
        let username = env::var("ADMIN_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());

        Ok(Self { username, password })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Civic Report Desk API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for Civic Report Desk".to_string());

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
