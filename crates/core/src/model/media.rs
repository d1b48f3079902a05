use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

//
// ─── ERRORS (domain validation) ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaValidationError {
    #[error("Media URI cannot be empty.")]
    EmptyMediaUri,

    #[error("Media URL is not valid: {0}")]
    InvalidUrl(String),
}

//
// ─── MEDIA URI ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaUri {
    FilePath(PathBuf),
    Url(Url),
}

impl MediaUri {
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, MediaValidationError> {
        let p = path.into();
        if p.as_os_str().is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        Ok(MediaUri::FilePath(p))
    }

    pub fn from_url(url: impl AsRef<str>) -> Result<Self, MediaValidationError> {
        let s = url.as_ref().trim();
        if s.is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        let u = Url::parse(s).map_err(|_| MediaValidationError::InvalidUrl(s.to_string()))?;
        Ok(MediaUri::Url(u))
    }

    /// Parse a catalog `image` reference.
    ///
    /// Anything carrying a URL scheme (`https:`, `data:`, `file:`) becomes a `Url`;
    /// everything else is treated as a path relative to the catalog.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, MediaValidationError> {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        if has_url_scheme(s) {
            Self::from_url(s)
        } else {
            Self::from_file(s)
        }
    }

    /// String form suitable for an `src` attribute.
    #[must_use]
    pub fn to_src(&self) -> String {
        match self {
            MediaUri::FilePath(p) => p.to_string_lossy().replace('\\', "/"),
            MediaUri::Url(u) => u.to_string(),
        }
    }
}

fn has_url_scheme(s: &str) -> bool {
    // Windows drive letters ("C:\...") are paths, not schemes.
    match s.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

//
// ─── IMAGE ANNOTATIONS ─────────────────────────────────────────────────────────
//

/// Pixel offsets clipped from the top/left edge of a question image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    pub top: u32,
    pub left: u32,
}

impl Crop {
    /// Build a crop from the optional catalog offsets.
    ///
    /// Zero offsets mean "no crop", so `None` is returned when both are absent or zero.
    #[must_use]
    pub fn from_offsets(top: Option<u32>, left: Option<u32>) -> Option<Self> {
        let top = top.unwrap_or(0);
        let left = left.unwrap_or(0);
        (top > 0 || left > 0).then_some(Self { top, left })
    }
}

/// Text label positioned on top of an image. Positions are CSS lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    pub top: String,
    pub left: String,
    pub text: String,
}

/// Opaque rectangle hiding part of an image. Dimensions are CSS lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mask {
    pub top: String,
    pub left: String,
    pub width: String,
    pub height: String,
}

/// Image attached to a question, with its presentational annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionImage {
    pub uri: MediaUri,
    pub crop: Option<Crop>,
    pub overlays: Vec<Overlay>,
    pub masks: Vec<Mask>,
}

impl QuestionImage {
    /// Overlays and masks are absolutely positioned and need a wrapper element.
    #[must_use]
    pub fn needs_wrapper(&self) -> bool {
        !self.overlays.is_empty() || !self.masks.is_empty()
    }
}
