use capturable::{CaptureError, PixelFormat, RasterImage};
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

const BACKGROUND: Rgba<u8> = Rgba([3, 218, 197, 255]);
const CARD: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CONFIRMED: Rgba<u8> = Rgba([67, 160, 71, 255]);
const DETAIL: Rgba<u8> = Rgba([189, 189, 189, 255]);
const CODE: Rgba<u8> = Rgba([33, 33, 33, 255]);

/// Number of modules along each side of the QR-like block.
const CODE_MODULES: u32 = 12;

/// The booking shown on the ticket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Booking {
    /// Booking reference, drawn as the code block.
    pub id: String,

    /// Number of seats, drawn as blocks in the detail row.
    pub seats: u32,
}

impl Default for Booking {
    fn default() -> Self {
        Self {
            id: "JETPACK0000012345".into(),
            seats: 3,
        }
    }
}

/// A booking ticket card, the element the demo captures.
#[derive(Clone, Debug, Default)]
pub struct TicketScene {
    size: Option<[u32; 2]>,

    /// What the ticket shows.
    pub booking: Booking,
}

impl TicketScene {
    /// A ticket for `booking` that has not been laid out yet.
    pub fn new(booking: Booking) -> Self {
        Self {
            size: None,
            booking,
        }
    }

    /// Lay the ticket out at `width` x `height`.
    pub fn layout(&mut self, width: u32, height: u32) {
        self.size = if width == 0 || height == 0 {
            None
        } else {
            Some([width, height])
        };
    }

    /// The laid out size, `None` before the first layout.
    pub fn size(&self) -> Option<[u32; 2]> {
        self.size
    }

    /// Paint the ticket, `None` if it has not been laid out.
    pub fn paint(&self) -> Option<RgbaImage> {
        let [width, height] = self.size?;
        let mut frame = RgbaImage::from_pixel(width, height, BACKGROUND);

        let margin = (width.min(height) / 16).max(1);
        let card = Rect::new(
            margin,
            margin,
            width.saturating_sub(margin * 2),
            height.saturating_sub(margin * 2),
        );
        card.fill(&mut frame, CARD);

        let inner = card.inset(margin);
        if inner.is_empty() {
            return Some(frame);
        }

        // Header
        let header = Rect::new(inner.x, inner.y, inner.width, inner.height / 6);
        header.fill(&mut frame, CONFIRMED);

        // Details
        let detail_y = header.bottom() + margin;
        let seats = self.booking.seats.max(1);
        let slot = inner.width / seats;
        for seat in 0..seats {
            Rect::new(
                inner.x + slot * seat,
                detail_y,
                slot.saturating_sub(margin / 2),
                inner.height / 12,
            )
            .fill(&mut frame, DETAIL);
        }

        // Code
        let code_size = (inner.width.min(inner.height) / 2 / CODE_MODULES) * CODE_MODULES;
        if code_size > 0 {
            let module = code_size / CODE_MODULES;
            let x = inner.x + (inner.width - code_size) / 2;
            let y = inner.bottom().saturating_sub(code_size);

            let seed = booking_seed(&self.booking.id);
            for row in 0..CODE_MODULES {
                for column in 0..CODE_MODULES {
                    let bit = (row * CODE_MODULES + column) % 64;
                    if (seed >> bit) & 1 == 1 {
                        Rect::new(x + column * module, y + row * module, module, module)
                            .fill(&mut frame, CODE);
                    }
                }
            }
        }

        Some(frame)
    }
}

/// Convert a painted frame into the requested pixel format.
pub fn to_raster(frame: &RgbaImage, pixel_format: PixelFormat) -> Result<RasterImage, CaptureError> {
    let image = match pixel_format {
        PixelFormat::Argb8888 => DynamicImage::ImageRgba8(frame.clone()),

        // Closest container available, 16 bit integer channels.
        PixelFormat::RgbaF16 => {
            DynamicImage::ImageRgba16(DynamicImage::ImageRgba8(frame.clone()).to_rgba16())
        }

        PixelFormat::Alpha8 => {
            let alpha = GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
                Luma([frame.get_pixel(x, y).0[3]])
            });
            DynamicImage::ImageLuma8(alpha)
        }

        format => return Err(CaptureError::UnsupportedFormat(format)),
    };

    Ok(RasterImage::new(image))
}

fn booking_seed(id: &str) -> u64 {
    // FNV-1a
    id.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[derive(Clone, Copy, Debug)]
struct Rect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl Rect {
    const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    const fn bottom(self) -> u32 {
        self.y + self.height
    }

    const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn inset(self, by: u32) -> Self {
        Self::new(
            self.x + by,
            self.y + by,
            self.width.saturating_sub(by * 2),
            self.height.saturating_sub(by * 2),
        )
    }

    fn fill(self, frame: &mut RgbaImage, color: Rgba<u8>) {
        let right = (self.x + self.width).min(frame.width());
        let bottom = self.bottom().min(frame.height());

        for y in self.y..bottom {
            for x in self.x..right {
                frame.put_pixel(x, y, color);
            }
        }
    }
}
