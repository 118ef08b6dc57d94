pub mod mesh;
pub mod raster;

pub use mesh::{load_obj, parse_obj};
pub use raster::{decode_image, load_image};
