// THEORY:
// The `region` module is the partitioner. It cuts the row range of an image into
// N contiguous horizontal bands, one per worker, up front and by size alone.
//
// Every band is `floor(height / N)` rows tall, except the last, which also takes
// the `height % N` trailing rows. The bands therefore tile the image exactly: each
// row belongs to one region, and no row is left without a worker. When N exceeds
// the height the first N-1 regions are empty and the last covers the whole image.

/// A rectangle of the grid assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// The whole grid as one region.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            width,
            height,
        }
    }

    /// One past the last row, saturating.
    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    /// One past the last column, saturating.
    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of cells this region covers once clamped to a `grid_width × grid_height` grid.
    pub fn clamped_area(&self, grid_width: u32, grid_height: u32) -> u64 {
        let columns = self.right().min(grid_width).saturating_sub(self.left);
        let rows = self.bottom().min(grid_height).saturating_sub(self.top);
        columns as u64 * rows as u64
    }
}

/// Splits `height` rows into `threads` bands. `threads` must be at least 1.
pub fn partition(width: u32, height: u32, threads: usize) -> Vec<Region> {
    let threads = threads.max(1);
    let band_height = (height as usize / threads) as u32;
    let remainder = (height as usize % threads) as u32;

    (0..threads)
        .map(|worker| {
            let is_last = worker + 1 == threads;
            Region {
                left: 0,
                top: worker as u32 * band_height,
                width,
                height: if is_last { band_height + remainder } else { band_height },
            }
        })
        .collect()
}
