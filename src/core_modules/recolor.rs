// THEORY:
// The `recolor` module applies the classifier to pixels. A target-hue pixel is
// pushed toward yellow (red and green up, blue down) with saturating arithmetic;
// every other pixel is copied through. Either way the written value is repacked,
// so the destination alpha is always opaque.
//
// `recolor_region` walks a region clamped to the grid bounds. A region reaching
// past the right or bottom edge simply covers fewer pixels.

use crate::core_modules::grid::{GridBand, ImageGrid};
use crate::core_modules::pixel::pixel::{PackedPixel, Pixel};
use crate::core_modules::region::Region;
use crate::core_modules::smart_pixel::smart_pixel::is_target_hue;

const RED_SHIFT: u8 = 40;
const GREEN_SHIFT: u8 = 50;
const BLUE_SHIFT: u8 = 150;

/// Counts from one pass over a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionOutcome {
    pub pixels_written: u64,
    pub pixels_recolored: u64,
}

impl RegionOutcome {
    pub fn merge(self, other: RegionOutcome) -> RegionOutcome {
        RegionOutcome {
            pixels_written: self.pixels_written + other.pixels_written,
            pixels_recolored: self.pixels_recolored + other.pixels_recolored,
        }
    }
}

/// The pure rule. Returns the new packed value and whether the pixel matched.
#[inline]
pub fn recolor(packed: PackedPixel) -> (PackedPixel, bool) {
    let pixel = Pixel::from_packed(packed);

    if is_target_hue(pixel.red, pixel.green, pixel.blue) {
        let shifted = Pixel::new(
            pixel.red.saturating_add(RED_SHIFT),
            pixel.green.saturating_add(GREEN_SHIFT),
            pixel.blue.saturating_sub(BLUE_SHIFT),
        );
        (shifted.pack(), true)
    } else {
        (pixel.pack(), false)
    }
}

/// Recolors source pixel (x, y) into the destination band.
///
/// Returns the written value and whether the pixel was in the target hue band.
#[inline]
pub fn recolor_pixel(source: &ImageGrid, destination: &mut GridBand<'_>, x: u32, y: u32) -> (PackedPixel, bool) {
    let (packed, matched) = recolor(source.get(x, y));
    destination.set(x, y, packed);
    (packed, matched)
}

/// Recolors every pixel of `region` that lies inside the source grid.
///
/// The destination band must hold every row the clamped region touches.
pub fn recolor_region(source: &ImageGrid, destination: &mut GridBand<'_>, region: &Region) -> RegionOutcome {
    let right = region.right().min(source.width());
    let bottom = region.bottom().min(source.height());
    let mut outcome = RegionOutcome::default();

    for y in region.top..bottom {
        for x in region.left..right {
            let (_, matched) = recolor_pixel(source, destination, x, y);
            outcome.pixels_written += 1;
            outcome.pixels_recolored += matched as u64;
        }
    }

    outcome
}
