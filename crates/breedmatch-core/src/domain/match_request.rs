use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Ceiling on the base64 text of an uploaded image (2 MiB of characters).
pub const MAX_IMAGE_BASE64_LEN: usize = 2 * 1024 * 1024;

/// Image types the inference API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MimeType {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/webp")]
    Webp,
    #[serde(rename = "image/gif")]
    Gif,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Jpeg => "image/jpeg",
            MimeType::Png => "image/png",
            MimeType::Webp => "image/webp",
            MimeType::Gif => "image/gif",
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MimeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image/jpeg" => Ok(MimeType::Jpeg),
            "image/png" => Ok(MimeType::Png),
            "image/webp" => Ok(MimeType::Webp),
            "image/gif" => Ok(MimeType::Gif),
            other => Err(DomainError::UnsupportedMimeType(other.to_string())),
        }
    }
}

/// A validated image-to-breed match attempt.
///
/// Lives for a single HTTP exchange and is never persisted.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub image_base64: String,
    pub mime_type: MimeType,
    pub slug_list: String,
}

impl MatchRequest {
    /// Validate raw request fields.
    ///
    /// Checks run in a fixed order: presence of all three fields, then the
    /// MIME allow-list, then the encoded size ceiling.
    pub fn parse(
        image_base64: Option<String>,
        mime_type: Option<String>,
        slug_list: Option<String>,
    ) -> Result<Self, DomainError> {
        let (Some(image_base64), Some(mime_type), Some(slug_list)) = (
            image_base64.filter(|s| !s.is_empty()),
            mime_type.filter(|s| !s.is_empty()),
            slug_list.filter(|s| !s.is_empty()),
        ) else {
            return Err(DomainError::MissingFields);
        };

        let mime_type = mime_type.parse::<MimeType>()?;

        if image_base64.len() > MAX_IMAGE_BASE64_LEN {
            return Err(DomainError::ImageTooLarge {
                len: image_base64.len(),
                max: MAX_IMAGE_BASE64_LEN,
            });
        }

        Ok(Self {
            image_base64,
            mime_type,
            slug_list,
        })
    }
}
