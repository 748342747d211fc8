use core::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The channel layout and bit depth requested for a capture.
///
/// The controller passes this through untouched, it is up to the render layer to honour it or to
/// fail the request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PixelFormat {
    /// A single 8 bit alpha channel.
    Alpha8,

    /// 16 bit packed RGB without alpha.
    Rgb565,

    /// 16 bit packed ARGB, 4 bits per channel.
    Argb4444,

    /// 32 bit ARGB, 8 bits per channel.
    #[default]
    Argb8888,

    /// 64 bit RGBA, a half float per channel.
    RgbaF16,
}

impl PixelFormat {
    /// If the format carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        !matches!(self, Self::Rgb565)
    }

    /// The number of bits a single pixel occupies.
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Alpha8 => 8,
            Self::Rgb565 | Self::Argb4444 => 16,
            Self::Argb8888 => 32,
            Self::RgbaF16 => 64,
        }
    }
}

impl Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Alpha8 => "ALPHA_8",
            Self::Rgb565 => "RGB_565",
            Self::Argb4444 => "ARGB_4444",
            Self::Argb8888 => "ARGB_8888",
            Self::RgbaF16 => "RGBA_F16",
        };

        f.write_str(name)
    }
}
