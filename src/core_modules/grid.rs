// THEORY:
// The `ImageGrid` is the in-memory raster the engine reads from and writes to. It
// is a `width × height` array of packed pixels stored row-major in one contiguous
// buffer, origin at the top-left, so pixel (x, y) lives at `y * width + x`.
//
// Key architectural principles:
// 1.  **Direct indexing**: there is no per-pixel accessor object. Workers read the
//     source with `get` and write their band by index.
// 2.  **Disjoint bands**: `split_into_bands` cuts the buffer with `split_at_mut`
//     into one `GridBand` per region. Each band owns a run of whole rows, so two
//     workers can never alias a destination cell and the compiler checks it.
// 3.  **Decoder boundary**: conversion from/to `image::RgbImage` lives here so the
//     rest of the engine only ever sees packed pixels.

use crate::core_modules::pixel::pixel::{PackedPixel, pack, unpack_blue, unpack_green, unpack_red};
use crate::core_modules::region::Region;
use crate::error::GridError;
use image::RgbImage;

/// A row-major grid of packed `0xAARRGGBB` pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGrid {
    width: u32,
    height: u32,
    pixels: Vec<PackedPixel>,
}

impl ImageGrid {
    /// Creates a zero-initialized grid, used as a transform destination.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn from_packed(width: u32, height: u32, pixels: Vec<PackedPixel>) -> Result<Self, GridError> {
        if pixels.len() != width as usize * height as usize {
            return Err(GridError::BufferLength {
                len: pixels.len(),
                width,
                height,
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Builds a grid from an RGB8 image. Alpha is set to opaque on every pixel.
    pub fn from_rgb_image(image: &RgbImage) -> Self {
        let pixels = image.pixels().map(|p| pack(p[0], p[1], p[2])).collect();
        Self {
            width: image.width(),
            height: image.height(),
            pixels,
        }
    }

    pub fn to_rgb_image(&self) -> Result<RgbImage, GridError> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for &packed in &self.pixels {
            bytes.extend_from_slice(&[unpack_red(packed), unpack_green(packed), unpack_blue(packed)]);
        }
        RgbImage::from_raw(self.width, self.height, bytes).ok_or(GridError::BufferLength {
            len: self.pixels.len(),
            width: self.width,
            height: self.height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[PackedPixel] {
        &self.pixels
    }

    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Reads pixel (x, y). Panics if the coordinate is outside the grid.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> PackedPixel {
        self.pixels[self.index_of(x, y)]
    }

    pub fn row(&self, y: u32) -> &[PackedPixel] {
        let start = self.index_of(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    /// A single band spanning every row of the grid.
    pub fn as_band(&mut self) -> GridBand<'_> {
        GridBand {
            top: 0,
            width: self.width,
            pixels: &mut self.pixels,
        }
    }

    /// Splits the grid into one mutable band per region, in order.
    ///
    /// Each region's rows are clamped to the grid height. The clamped row ranges
    /// must follow each other without gaps or overlap, starting at row 0; any
    /// rows left after the last region are not handed out.
    pub fn split_into_bands(&mut self, regions: &[Region]) -> Result<Vec<GridBand<'_>>, GridError> {
        let width = self.width;
        let height = self.height;
        let mut bands = Vec::with_capacity(regions.len());
        let mut remaining: &mut [PackedPixel] = &mut self.pixels;
        let mut cursor = 0u32;

        for (index, region) in regions.iter().enumerate() {
            let top = region.top.min(height);
            if top != cursor {
                return Err(GridError::NonContiguousRegion {
                    index,
                    expected_top: cursor,
                    found_top: region.top,
                });
            }
            let bottom = region.bottom().min(height);
            let rows = bottom - top;
            let (band, rest) = std::mem::take(&mut remaining).split_at_mut(rows as usize * width as usize);
            remaining = rest;
            bands.push(GridBand { top, width, pixels: band });
            cursor = bottom;
        }

        Ok(bands)
    }
}

/// A mutable run of whole rows of a destination grid, starting at row `top`.
#[derive(Debug)]
pub struct GridBand<'a> {
    top: u32,
    width: u32,
    pixels: &'a mut [PackedPixel],
}

impl<'a> GridBand<'a> {
    /// Wraps a caller-owned buffer holding rows `top..top + rows` of a grid `width` wide.
    pub fn new(top: u32, width: u32, pixels: &'a mut [PackedPixel]) -> Self {
        Self { top, width, pixels }
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn rows(&self) -> u32 {
        if self.width == 0 {
            0
        } else {
            (self.pixels.len() / self.width as usize) as u32
        }
    }

    pub fn contains_row(&self, y: u32) -> bool {
        y >= self.top && y < self.top + self.rows()
    }

    /// Writes pixel (x, y) in grid coordinates. Panics if `y` is outside the band.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, packed: PackedPixel) {
        let index = (y - self.top) as usize * self.width as usize + x as usize;
        self.pixels[index] = packed;
    }

    pub fn pixels(&self) -> &[PackedPixel] {
        &*self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(top: u32, height: u32) -> Region {
        Region {
            left: 0,
            top,
            width: 4,
            height,
        }
    }

    #[test]
    fn new_grid_is_zeroed() {
        let grid = ImageGrid::new(3, 2);
        assert_eq!(grid.pixels(), &[0; 6]);
        assert_eq!(grid.dimensions(), (3, 2));
    }

    #[test]
    fn from_packed_rejects_wrong_length() {
        let err = ImageGrid::from_packed(2, 2, vec![0; 3]).unwrap_err();
        assert!(matches!(err, GridError::BufferLength { len: 3, width: 2, height: 2 }));
    }

    #[test]
    fn indexing_is_row_major() {
        let pixels = (0..6).collect();
        let grid = ImageGrid::from_packed(3, 2, pixels).unwrap();
        assert_eq!(grid.get(2, 0), 2);
        assert_eq!(grid.get(0, 1), 3);
        assert_eq!(grid.row(1), &[3, 4, 5]);
    }

    #[test]
    fn rgb_image_round_trip_forces_alpha() {
        let mut rgb = RgbImage::new(2, 1);
        rgb.put_pixel(0, 0, image::Rgb([1, 2, 3]));
        rgb.put_pixel(1, 0, image::Rgb([250, 128, 0]));
        let grid = ImageGrid::from_rgb_image(&rgb);
        assert_eq!(grid.pixels(), &[0xFF01_0203, 0xFFFA_8000]);
        assert_eq!(grid.to_rgb_image().unwrap(), rgb);
    }

    #[test]
    fn short_buffer_is_reported_instead_of_encoded() {
        let grid = ImageGrid {
            width: 2,
            height: 2,
            pixels: vec![0xFF00_0000; 3],
        };
        let err = grid.to_rgb_image().unwrap_err();
        assert!(matches!(err, GridError::BufferLength { len: 3, width: 2, height: 2 }));
    }

    #[test]
    fn bands_cover_rows_in_order() {
        let mut grid = ImageGrid::new(4, 5);
        let regions = [region(0, 2), region(2, 2), region(4, 3)];
        let bands = grid.split_into_bands(&regions).unwrap();
        let shape: Vec<(u32, u32)> = bands.iter().map(|b| (b.top(), b.rows())).collect();
        assert_eq!(shape, vec![(0, 2), (2, 2), (4, 1)]);
    }

    #[test]
    fn empty_regions_yield_empty_bands() {
        let mut grid = ImageGrid::new(4, 1);
        let regions = [region(0, 0), region(0, 0), region(0, 1)];
        let bands = grid.split_into_bands(&regions).unwrap();
        let rows: Vec<u32> = bands.iter().map(GridBand::rows).collect();
        assert_eq!(rows, vec![0, 0, 1]);
    }

    #[test]
    fn overlapping_regions_are_rejected() {
        let mut grid = ImageGrid::new(4, 4);
        let regions = [region(0, 2), region(1, 2)];
        let err = grid.split_into_bands(&regions).unwrap_err();
        assert!(matches!(
            err,
            GridError::NonContiguousRegion { index: 1, expected_top: 2, found_top: 1 }
        ));
    }

    #[test]
    fn band_writes_land_in_grid_coordinates() {
        let mut grid = ImageGrid::new(2, 3);
        {
            let mut bands = grid.split_into_bands(&[region(0, 1), region(1, 2)]).unwrap();
            bands[1].set(1, 2, 7);
            assert!(bands[1].contains_row(2));
            assert!(!bands[1].contains_row(0));
        }
        assert_eq!(grid.get(1, 2), 7);
    }
}
