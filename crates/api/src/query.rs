//! Query-string parameter types.

use serde::Deserialize;
use vitrine_core::pagination::PageRequest;
use vitrine_core::upload::MediaCategory;

/// `GET /gallery?type=&page=&limit=&search=`
#[derive(Debug, Default, Deserialize)]
pub struct GalleryListParams {
    /// `photo` or `video`; any other value is ignored.
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Case-insensitive substring of the item name.
    pub search: Option<String>,
}

impl GalleryListParams {
    pub fn category(&self) -> Option<MediaCategory> {
        self.media_type
            .as_deref()
            .and_then(|t| MediaCategory::parse(t).ok())
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
