// THEORY:
// The `Pixel` module is the channel codec of the engine. A pixel travels through
// the system as a single packed `u32` laid out as `0xAARRGGBB`; this module is the
// only place that knows the bit positions.
//
// Key principles:
// 1.  **Packed at rest**: Grids store `PackedPixel`s, so a band of the image is one
//     contiguous `&[u32]` and per-pixel access is plain indexing.
// 2.  **Opaque on write**: `pack` always sets alpha to 0xFF. The engine works in a
//     fixed three-channel additive model and never carries transparency forward.
// 3.  **No clamping here**: channels are `u8`, so anything that reaches `pack` is
//     already in range. Saturation belongs to the recolor rule.

pub mod pixel {
    pub type Channel = u8;
    pub type PackedPixel = u32;

    pub const ALPHA_OPAQUE: Channel = 0xFF;

    const ALPHA_SHIFT: u32 = 24;
    const RED_SHIFT: u32 = 16;
    const GREEN_SHIFT: u32 = 8;
    const CHANNEL_MASK: PackedPixel = 0xFF;

    #[inline]
    pub fn unpack_alpha(packed: PackedPixel) -> Channel {
        ((packed >> ALPHA_SHIFT) & CHANNEL_MASK) as Channel
    }

    #[inline]
    pub fn unpack_red(packed: PackedPixel) -> Channel {
        ((packed >> RED_SHIFT) & CHANNEL_MASK) as Channel
    }

    #[inline]
    pub fn unpack_green(packed: PackedPixel) -> Channel {
        ((packed >> GREEN_SHIFT) & CHANNEL_MASK) as Channel
    }

    #[inline]
    pub fn unpack_blue(packed: PackedPixel) -> Channel {
        (packed & CHANNEL_MASK) as Channel
    }

    /// Packs three channels into `0xAARRGGBB` with alpha forced to fully opaque.
    #[inline]
    pub fn pack(red: Channel, green: Channel, blue: Channel) -> PackedPixel {
        (ALPHA_OPAQUE as PackedPixel) << ALPHA_SHIFT
            | (red as PackedPixel) << RED_SHIFT
            | (green as PackedPixel) << GREEN_SHIFT
            | blue as PackedPixel
    }

    /// A "dumb" named-field view of a packed pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha channel as it was stored; `pack` ignores it.
        pub alpha: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha: ALPHA_OPAQUE,
            }
        }

        pub fn from_packed(packed: PackedPixel) -> Self {
            Pixel {
                red: unpack_red(packed),
                green: unpack_green(packed),
                blue: unpack_blue(packed),
                alpha: unpack_alpha(packed),
            }
        }

        pub fn pack(&self) -> PackedPixel {
            pack(self.red, self.green, self.blue)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    #[test]
    fn pack_unpack_round_trips_every_channel_value() {
        for value in 0..=255u8 {
            let other = 255 - value;
            let packed = pack(value, other, value / 2);
            assert_eq!(unpack_red(packed), value);
            assert_eq!(unpack_green(packed), other);
            assert_eq!(unpack_blue(packed), value / 2);
            assert_eq!(unpack_alpha(packed), ALPHA_OPAQUE);
        }
    }

    #[test]
    fn pack_lays_out_argb() {
        assert_eq!(pack(0x12, 0x34, 0x56), 0xFF12_3456);
        assert_eq!(pack(0, 0, 0), 0xFF00_0000);
    }

    #[test]
    fn pixel_view_agrees_with_free_functions() {
        let pixel = Pixel::new(200, 100, 50);
        assert_eq!(pixel.pack(), pack(200, 100, 50));
        assert_eq!(Pixel::from_packed(pixel.pack()), pixel);
    }

    #[test]
    fn pack_forces_alpha_even_when_source_was_transparent() {
        let pixel = Pixel::from_packed(0x0011_2233);
        assert_eq!(pixel.alpha, 0);
        assert_eq!(pixel.pack(), 0xFF11_2233);
    }
}
