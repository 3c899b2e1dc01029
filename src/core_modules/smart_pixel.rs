// THEORY:
// The `SmartPixel` module is the color classifier. It wraps a packed pixel and
// measures the pairwise channel differences that make up its hue signature, then
// decides whether that signature falls in the target ("purple-like") band.
//
// The band is empirical: red and blue both raised relative to green, without
// reaching pure magenta or gray. The thresholds below are exact; changing any of
// them changes which pixels are recolored.

pub mod smart_pixel {
    use crate::core_modules::pixel::pixel::Channel;

    pub type ChannelDifference = u8;

    const MAX_RED_GREEN: ChannelDifference = 80;
    const MIN_RED_BLUE: ChannelDifference = 20;
    const MAX_RED_BLUE: ChannelDifference = 90;
    const MIN_GREEN_BLUE: ChannelDifference = 15;
    const MAX_GREEN_BLUE: ChannelDifference = 240;

    /// The three absolute channel differences of a single pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HueSignature {
        pub red_green: ChannelDifference,
        pub red_blue: ChannelDifference,
        pub green_blue: ChannelDifference,
    }

    impl HueSignature {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Self {
                red_green: red.abs_diff(green),
                red_blue: red.abs_diff(blue),
                green_blue: green.abs_diff(blue),
            }
        }

        /// All bounds are strict.
        pub fn is_target_hue(&self) -> bool {
            self.red_green < MAX_RED_GREEN
                && self.red_blue > MIN_RED_BLUE
                && self.red_blue < MAX_RED_BLUE
                && self.green_blue > MIN_GREEN_BLUE
                && self.green_blue < MAX_GREEN_BLUE
        }
    }

    pub fn is_target_hue(red: Channel, green: Channel, blue: Channel) -> bool {
        HueSignature::new(red, green, blue).is_target_hue()
    }
}

#[cfg(test)]
mod tests {
    use super::smart_pixel::*;

    #[test]
    fn purple_sample_is_target() {
        let signature = HueSignature::new(100, 40, 60);
        assert_eq!(
            signature,
            HueSignature {
                red_green: 60,
                red_blue: 40,
                green_blue: 20
            }
        );
        assert!(signature.is_target_hue());
        assert!(is_target_hue(100, 40, 60));
    }

    #[test]
    fn gray_is_not_target() {
        assert!(!is_target_hue(10, 10, 10));
        assert!(!is_target_hue(128, 128, 128));
    }

    #[test]
    fn bounds_are_strict() {
        // red_green == 80
        assert!(!is_target_hue(120, 40, 70));
        assert!(is_target_hue(119, 40, 70));
        // red_blue == 20 and == 90
        assert!(!is_target_hue(100, 60, 80));
        assert!(!is_target_hue(100, 60, 10));
        assert!(is_target_hue(100, 60, 11));
        // green_blue == 15
        assert!(!is_target_hue(100, 45, 60));
        assert!(is_target_hue(100, 44, 60));
    }

    #[test]
    fn difference_is_symmetric_in_channel_order() {
        assert_eq!(HueSignature::new(60, 40, 100).red_blue, 40);
        assert_eq!(HueSignature::new(60, 40, 100).green_blue, 60);
    }
}
