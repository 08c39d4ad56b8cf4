use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating storage keys
    /// Must be ASCII alphanumeric, underscores, hyphens or dots, not starting with a dot
    /// - Valid: "bmc_reports", "reports-v2", "a.b"
    /// - Invalid: "", ".hidden", "../escape", "a/b", "with space"
    pub static ref STORAGE_KEY_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-][A-Za-z0-9_.-]*$").unwrap();

    /// Regex for image sources that are safe to place in an `src` attribute
    /// - Valid: "data:image/png;base64,iVBO...", "https://via.placeholder.com/150"
    /// - Invalid: "javascript:alert(1)", "data:text/html;base64,...", "//evil.example"
    pub static ref SAFE_IMAGE_SRC_REGEX: Regex =
        Regex::new(r"^(?:data:image/(?:jpeg|png|gif|webp);base64,[A-Za-z0-9+/=]*|https?://\S+)$").unwrap();
}
