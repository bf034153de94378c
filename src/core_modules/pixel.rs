// THEORY (1D Pixel Heuristics):
// The `Pixel` module is the most fundamental unit of the classifier. It is a "dumb"
// data container for one RGBA sample plus the handful of single-pixel heuristics the
// classifier and the scorers read: metrics that can be computed from this pixel alone,
// with no knowledge of neighbors in space or time. Anything that needs another pixel
// (the scan-order texture term) belongs in the aggregator.
//
// Heuristic families (all single-pixel):
// - Brightness: plain channel mean (r+g+b)/3 and Rec. 601 luminance
// - Color strength: channel spread (max-min) and HSV saturation (spread/max)
// - Color variance: squared distance of each channel from the channel mean
//
// Alpha is carried but never scored.

pub mod pixel {
    use crate::error::VisionError;

    pub type Byte = u8;
    pub type Channel = Byte;
    pub type Brightness = f64;
    pub type Luminance = f64;
    pub type SaturationHSV = f64;
    pub type ChannelSpread = u8;
    pub type ColorVariance = f64;
    pub type Sum = u16;

    /// Bytes per pixel in every buffer the classifier reads.
    pub const CHANNELS: usize = 4;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// Opaque pixel from its three color channels.
        pub fn rgb(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel::new(red, green, blue, Channel::MAX)
        }

        /// =================================Heuristics==================================

        pub fn max_channel(&self) -> Channel {
            self.red.max(self.green.max(self.blue))
        }

        pub fn min_channel(&self) -> Channel {
            self.red.min(self.green.min(self.blue))
        }

        /// Chroma in raw byte units: max(R,G,B) - min(R,G,B).
        pub fn spread(&self) -> ChannelSpread {
            self.max_channel() - self.min_channel()
        }

        /// Raw RGB channel sum (0..765).
        pub fn sum(&self) -> Sum {
            self.red as Sum + self.green as Sum + self.blue as Sum
        }

        /// Unweighted channel mean, (r+g+b)/3.
        ///
        /// This is the brightness every hair rule and the gate's lighting check use.
        pub fn brightness(&self) -> Brightness {
            self.sum() as Brightness / 3.0
        }

        /// Luminance estimate (Rec. 601 luma).
        ///
        /// - Interprets perceived brightness as a weighted sum of RGB.
        /// - The cosmetic scorer thresholds shine, pores and dryness on this value.
        pub fn luminance(&self) -> Luminance {
            0.299_f64 * self.red as f64 + 0.587_f64 * self.green as f64 + 0.114_f64 * self.blue as f64
        }

        /// HSV saturation: (max - min) / max, and 0 for pure black.
        pub fn saturation_hsv(&self) -> SaturationHSV {
            let maximum_channel = self.max_channel();
            if maximum_channel == 0 {
                return 0.0;
            }
            self.spread() as SaturationHSV / maximum_channel as SaturationHSV
        }

        /// Sum of squared channel deviations from the channel mean.
        /// Zero for pure grays; large for strongly colored pixels.
        pub fn color_variance(&self) -> ColorVariance {
            let mean = self.brightness();
            let red = self.red as f64 - mean;
            let green = self.green as f64 - mean;
            let blue = self.blue as f64 - mean;
            red * red + green * green + blue * blue
        }

        /// Red dominance over the other two channels, r / (g + b + 1).
        pub fn red_dominance(&self) -> f64 {
            self.red as f64 / (self.green as f64 + self.blue as f64 + 1.0)
        }
    }

    impl TryFrom<&[Byte]> for Pixel {
        type Error = VisionError;

        fn try_from(bytes: &[Byte]) -> Result<Self, Self::Error> {
            match bytes {
                [red, green, blue, alpha] => Ok(Pixel::new(*red, *green, *blue, *alpha)),
                _ => Err(VisionError::BufferLength {
                    expected: CHANNELS,
                    actual: bytes.len(),
                }),
            }
        }
    }

    impl From<Pixel> for [Byte; CHANNELS] {
        fn from(pixel: Pixel) -> Self {
            [pixel.red, pixel.green, pixel.blue, pixel.alpha]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    #[test]
    fn brightness_is_plain_channel_mean() {
        let pixel = Pixel::rgb(30, 60, 90);
        assert_eq!(pixel.brightness(), 60.0);
        assert_eq!(pixel.sum(), 180);
    }

    #[test]
    fn luminance_weights_green_heaviest() {
        let green = Pixel::rgb(0, 255, 0).luminance();
        let red = Pixel::rgb(255, 0, 0).luminance();
        let blue = Pixel::rgb(0, 0, 255).luminance();
        assert!(green > red && red > blue);
        assert!((Pixel::rgb(255, 255, 255).luminance() - 255.0).abs() < 1e-9);
    }

    #[test]
    fn saturation_of_black_is_zero() {
        assert_eq!(Pixel::rgb(0, 0, 0).saturation_hsv(), 0.0);
        assert_eq!(Pixel::rgb(200, 100, 0).saturation_hsv(), 1.0);
        assert_eq!(Pixel::rgb(200, 100, 100).saturation_hsv(), 0.5);
    }

    #[test]
    fn gray_has_no_color_variance() {
        assert_eq!(Pixel::rgb(128, 128, 128).color_variance(), 0.0);
        // mean 20, deviations (-20, 0, 20)
        assert_eq!(Pixel::rgb(0, 20, 40).color_variance(), 800.0);
    }

    #[test]
    fn spread_is_max_minus_min() {
        assert_eq!(Pixel::rgb(30, 25, 20).spread(), 10);
        assert_eq!(Pixel::rgb(255, 0, 128).spread(), 255);
    }

    #[test]
    fn converts_from_exactly_four_bytes() {
        let bytes = [1u8, 2, 3, 4];
        let pixel = Pixel::try_from(&bytes[..]).expect("four bytes");
        assert_eq!(pixel, Pixel::new(1, 2, 3, 4));
        assert_eq!(<[u8; 4]>::from(pixel), bytes);
        assert!(Pixel::try_from(&bytes[..3]).is_err());
    }
}
