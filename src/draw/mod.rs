pub mod capture;
pub mod controller;
pub mod input;
pub mod messages;
pub mod model;
pub mod shapes;
pub mod surface;
pub mod text;

pub use capture::{Snapshot, SnapshotCapture};
pub use controller::{CanvasHooks, CanvasModule};
pub use input::{PointerEvent, StrokeRenderer, StrokeState};
pub use surface::RasterSurface;
