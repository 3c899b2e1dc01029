pub mod image_helper {
    use crate::core_modules::grid::ImageGrid;
    use crate::error::ImageIoError;
    use std::path::Path;

    /// Decodes any format the `image` crate recognizes into a packed grid.
    pub fn load(path: impl AsRef<Path>) -> Result<ImageGrid, ImageIoError> {
        let decoded = image::open(path)?.to_rgb8();
        Ok(ImageGrid::from_rgb_image(&decoded))
    }

    /// Encodes a grid, picking the format from the file extension.
    pub fn save(path: impl AsRef<Path>, grid: &ImageGrid) -> Result<(), ImageIoError> {
        grid.to_rgb_image()?.save(path)?;
        Ok(())
    }
}
