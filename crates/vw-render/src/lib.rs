pub mod draw;
pub mod hit;
pub mod paint;
pub mod surface;
pub mod svg;

pub use draw::{apply_theme, mount_scene, update_handle, update_shape};
pub use hit::hit_test;
pub use surface::{Element, Layer, RenderSurface};
pub use svg::SvgDocument;
