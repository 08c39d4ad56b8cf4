use base64::prelude::*;
use thiserror::Error;

use crate::shared::constants::{ALLOWED_IMAGE_MIME_TYPES, MAX_PHOTO_SIZE, PLACEHOLDER_IMAGE_URL};
use crate::shared::validation::SAFE_IMAGE_SRC_REGEX;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Image file is empty")]
    Empty,

    #[error("Unsupported image type '{0}'")]
    UnsupportedType(String),

    #[error("Image is {size} bytes, maximum is {max}")]
    TooLarge { size: usize, max: usize },
}

/// Encode an image as a `data:<mime>;base64,...` URL usable as an image source
pub fn encode_data_url(content_type: &str, bytes: &[u8]) -> Result<String, EncodeError> {
    let mime = normalize_mime(content_type);

    if !ALLOWED_IMAGE_MIME_TYPES.contains(&mime.as_str()) {
        return Err(EncodeError::UnsupportedType(content_type.to_string()));
    }
    if bytes.is_empty() {
        return Err(EncodeError::Empty);
    }
    if bytes.len() > MAX_PHOTO_SIZE {
        return Err(EncodeError::TooLarge {
            size: bytes.len(),
            max: MAX_PHOTO_SIZE,
        });
    }

    Ok(format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(bytes)))
}

/// `image_src` if it is an inline image or an http(s) URL, else the placeholder
pub fn safe_image_src(image_src: &str) -> &str {
    if SAFE_IMAGE_SRC_REGEX.is_match(image_src) {
        image_src
    } else {
        PLACEHOLDER_IMAGE_URL
    }
}

/// "Image/PNG; charset=binary" -> "image/png"
fn normalize_mime(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
