/// Image shown when a photo could not be encoded
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/150/334155/FFFFFF?text=Report+Image";

/// Image MIME types accepted as report photos
pub const ALLOWED_IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Maximum size of a single photo in bytes (10MB)
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Shortest query the geocoder will look up
pub const MIN_GEOCODE_QUERY_LEN: usize = 3;

/// Maximum number of geocoding suggestions returned
pub const GEOCODE_SUGGESTION_LIMIT: usize = 5;
