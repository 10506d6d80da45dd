#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use lastra_geometry as geometry;

#[doc(inline)]
pub use lastra_image as image;

#[doc(inline)]
pub use lastra_imgproc as imgproc;

#[doc(inline)]
pub use lastra_io as io;

#[doc(inline)]
pub use lastra_scene as scene;
