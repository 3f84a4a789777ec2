//! Upload policies per resource kind, validation, and generated file names.
//!
//! Validation runs before anything touches the disk. The extension, the
//! declared MIME type, the size and (for images) the leading bytes of the
//! payload must all agree with the policy of the owning resource kind.

use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const MIB: u64 = 1024 * 1024;

// ---------------------------------------------------------------------------
// Resource kinds and media categories
// ---------------------------------------------------------------------------

/// The three resource kinds that own an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Slider,
    Gallery,
    Blog,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [Self::Slider, Self::Gallery, Self::Blog];

    /// Subdirectory of the upload root holding this kind's files.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Slider => "sliders",
            Self::Gallery => "gallery",
            Self::Blog => "blogs",
        }
    }

    /// Prefix of generated file names.
    ///
    /// Gallery files are prefixed by their media category instead, see
    /// [`generate_file_name`].
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Slider => "slider",
            Self::Gallery => "gallery",
            Self::Blog => "blog",
        }
    }

    pub fn policy(self) -> &'static UploadPolicy {
        match self {
            Self::Slider => &SLIDER_POLICY,
            Self::Gallery => &GALLERY_POLICY,
            Self::Blog => &BLOG_POLICY,
        }
    }
}

/// Broad category of an uploaded file, also the `type` of a gallery item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Photo,
    Video,
}

impl MediaCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
        }
    }

    /// Parse the `type` field of a gallery request.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim() {
            "photo" => Ok(Self::Photo),
            "video" => Ok(Self::Video),
            _ => Err(CoreError::Validation(
                "Invalid type. Must be photo or video".into(),
            )),
        }
    }

    /// Category implied by a MIME type (`image/*` or `video/*`).
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.starts_with("image/") {
            Some(Self::Photo)
        } else if mime.starts_with("video/") {
            Some(Self::Video)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// What a resource kind accepts.
#[derive(Debug)]
pub struct UploadPolicy {
    pub image_extensions: &'static [&'static str],
    /// Formats recognised from the payload's leading bytes.
    pub image_formats: &'static [ImageFormat],
    pub video_extensions: &'static [&'static str],
    pub max_bytes: u64,
}

const WEB_IMAGE_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

pub static SLIDER_POLICY: UploadPolicy = UploadPolicy {
    image_extensions: &["jpg", "jpeg", "png", "gif", "webp"],
    image_formats: WEB_IMAGE_FORMATS,
    video_extensions: &[],
    max_bytes: 5 * MIB,
};

pub static GALLERY_POLICY: UploadPolicy = UploadPolicy {
    image_extensions: &["jpg", "jpeg", "png", "gif", "webp"],
    image_formats: WEB_IMAGE_FORMATS,
    video_extensions: &["mp4", "avi", "mov", "wmv", "flv", "mkv", "webm"],
    max_bytes: 100 * MIB,
};

pub static BLOG_POLICY: UploadPolicy = UploadPolicy {
    image_extensions: &["jpg", "jpeg", "png", "webp"],
    image_formats: &[ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP],
    video_extensions: &[],
    max_bytes: 10 * MIB,
};

impl UploadPolicy {
    fn category_of_extension(&self, ext: &str) -> Option<MediaCategory> {
        if self.image_extensions.contains(&ext) {
            Some(MediaCategory::Photo)
        } else if self.video_extensions.contains(&ext) {
            Some(MediaCategory::Video)
        } else {
            None
        }
    }

    fn allowed_extensions(&self) -> String {
        self.image_extensions
            .iter()
            .chain(self.video_extensions)
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// An upload that satisfied its policy and may be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedUpload {
    pub kind: ResourceKind,
    pub category: MediaCategory,
    pub original_name: String,
    /// Lowercase extension without the leading dot.
    pub extension: String,
    pub mime_type: String,
    /// Pixel `(width, height)` when the image header could be decoded.
    pub dimensions: Option<(u32, u32)>,
}

/// Check an incoming file against the policy of `kind`.
///
/// `declared_mime` is the part's `Content-Type`; when the client sent none,
/// the type is looked up from the extension.
pub fn validate_upload(
    kind: ResourceKind,
    original_name: &str,
    declared_mime: Option<&str>,
    bytes: &[u8],
) -> Result<AcceptedUpload, CoreError> {
    let policy = kind.policy();

    let size = bytes.len() as u64;
    if size > policy.max_bytes {
        return Err(CoreError::PayloadTooLarge(format!(
            "File exceeds the {} MB limit for {} uploads",
            policy.max_bytes / MIB,
            kind.file_prefix()
        )));
    }
    if size == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }

    let extension = extension_of(original_name).ok_or_else(|| {
        CoreError::UnsupportedMediaType(format!(
            "File '{original_name}' has no extension. Allowed: {}",
            policy.allowed_extensions()
        ))
    })?;

    let category = policy.category_of_extension(&extension).ok_or_else(|| {
        CoreError::UnsupportedMediaType(format!(
            "Unsupported file type '.{extension}'. Allowed: {}",
            policy.allowed_extensions()
        ))
    })?;

    let mime_type = declared_mime
        .map(|m| m.trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty() && m != "application/octet-stream")
        .or_else(|| {
            mime_guess::from_ext(&extension)
                .first()
                .map(|m| m.essence_str().to_string())
        })
        .ok_or_else(|| {
            CoreError::UnsupportedMediaType(format!("Cannot determine MIME type of '.{extension}'"))
        })?;

    if MediaCategory::from_mime(&mime_type) != Some(category) {
        return Err(CoreError::UnsupportedMediaType(format!(
            "Extension '.{extension}' does not match MIME type '{mime_type}'"
        )));
    }

    let dimensions = match category {
        MediaCategory::Photo => {
            let format = image::guess_format(bytes).ok();
            if !format.is_some_and(|f| policy.image_formats.contains(&f)) {
                return Err(CoreError::UnsupportedMediaType(format!(
                    "Content of '{original_name}' is not a supported image"
                )));
            }
            image_dimensions(bytes)
        }
        MediaCategory::Video => None,
    };

    Ok(AcceptedUpload {
        kind,
        category,
        original_name: original_name.to_string(),
        extension,
        mime_type,
        dimensions,
    })
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(str::to_ascii_lowercase)
}

fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// Generate a collision-resistant stored name:
/// `<prefix>-<unix millis>-<random>.<ext>`.
///
/// The prefix is the kind (`slider`, `blog`), except for gallery files which
/// use their category (`photo`, `video`).
pub fn generate_file_name(upload: &AcceptedUpload) -> String {
    let prefix = match upload.kind {
        ResourceKind::Gallery => upload.category.as_str(),
        other => other.file_prefix(),
    };
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("{prefix}-{millis}-{suffix}.{}", upload.extension)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
