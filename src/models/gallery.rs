use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub order_index: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewGalleryImage {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub order_index: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryImageUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order_index: Option<i64>,
    pub is_active: Option<bool>,
}
