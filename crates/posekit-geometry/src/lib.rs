mod image;
mod math;
mod mesh;

pub use image::DecodedImage;
pub use math::{Point2, Vec3};
pub use mesh::{Corner, FALLBACK_NORMAL, Face, MeshData};
