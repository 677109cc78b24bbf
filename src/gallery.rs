use crate::models::Property;
use serde::Serialize;

pub const THUMBNAILS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "url", rename_all = "lowercase")]
pub enum MediaItem {
    Image(String),
    Video(String),
}

impl MediaItem {
    pub fn url(&self) -> &str {
        match self {
            MediaItem::Image(url) | MediaItem::Video(url) => url,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaItem::Video(_))
    }
}

/// Image and video viewer state for the property detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    items: Vec<MediaItem>,
    selected: usize,
}

impl Gallery {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self { items, selected: 0 }
    }

    /// Main image first, then the remaining images, then the video if any
    pub fn for_property(property: &Property) -> Self {
        let mut items = Vec::with_capacity(property.images.len() + 1);
        let main = property.main_image();
        if let Some(img) = main {
            items.push(MediaItem::Image(img.image_url.clone()));
        }
        items.extend(
            property
                .images
                .iter()
                .filter(|img| Some(img.id) != main.map(|m| m.id))
                .map(|img| MediaItem::Image(img.image_url.clone())),
        );
        if items.is_empty() {
            if let Some(url) = &property.main_image_url {
                items.push(MediaItem::Image(url.clone()));
            }
        }
        if let Some(video) = &property.video_url {
            items.push(MediaItem::Video(video.clone()));
        }
        Self::new(items)
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn current(&self) -> Option<&MediaItem> {
        self.items.get(self.selected)
    }

    /// Out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.items.is_empty() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.items.len() - 1);
        }
    }

    pub fn thumbnails(&self) -> &[MediaItem] {
        &self.items[..self.items.len().min(THUMBNAILS)]
    }
}
