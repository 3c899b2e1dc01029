pub mod grid;
pub mod pixel;
pub mod recolor;
pub mod region;
pub mod smart_pixel;
pub mod utils;
