pub mod projector;
pub mod store;

pub use projector::{DrawingDetail, GalleryItem, GalleryProjector, GalleryView};
pub use store::{GalleryStore, GALLERY_LIMIT};
