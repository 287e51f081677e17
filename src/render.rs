//! Rasterizing a [`QrMatrix`] into pixels, plus SVG and terminal text output.

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Deserialize;
use tracing::debug;

use crate::error::{QrError, Result};
use crate::qrcode::QrMatrix;

/// Side length used when nothing else is requested.
pub const DEFAULT_PIXEL_SIZE: u32 = 256;

/// Light margin around the symbol, in modules. Four is what the standard asks
/// scanners to be able to rely on.
pub const DEFAULT_QUIET_ZONE: u32 = 4;

/// Largest accepted output side, in pixels.
pub const MAX_PIXEL_SIZE: u32 = 16384;

/// Largest accepted quiet zone or text border, in modules.
pub const MAX_QUIET_ZONE: u32 = 64;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Foreground and background colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Color of dark modules.
    pub dark: Rgb<u8>,
    /// Color of light modules and the quiet zone.
    pub light: Rgb<u8>,
}

impl Palette {
    pub const BLACK_ON_WHITE: Palette = Palette {
        dark: BLACK,
        light: WHITE,
    };

    pub fn new(dark: [u8; 3], light: [u8; 3]) -> Self {
        Self {
            dark: Rgb(dark),
            light: Rgb(light),
        }
    }

    pub fn swapped(self) -> Self {
        Self {
            dark: self.light,
            light: self.dark,
        }
    }

    fn color(self, isdark: bool) -> Rgb<u8> {
        if isdark {
            self.dark
        } else {
            self.light
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::BLACK_ON_WHITE
    }
}

/// Light or dark presentation. Dark mode swaps the two colors; it never
/// changes the module pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Self::Light => Palette::BLACK_ON_WHITE,
            Self::Dark => Palette::BLACK_ON_WHITE.swapped(),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Output geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Width and height of the output in pixels.
    pub pixel_size: u32,
    /// Quiet zone width in modules; 0 puts the symbol edge-to-edge.
    pub quiet_zone: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pixel_size: DEFAULT_PIXEL_SIZE,
            quiet_zone: DEFAULT_QUIET_ZONE,
        }
    }
}

/// A rendered symbol: an RGB pixel buffer and how it was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedImage {
    image: RgbImage,
    palette: Palette,
    options: RenderOptions,
    module_px: u32,
    offset: u32,
}

impl RenderedImage {
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Side length in pixels; always equal to the requested pixel size.
    pub fn side(&self) -> u32 {
        self.image.width()
    }

    /// Pixels per module edge.
    pub fn module_px(&self) -> u32 {
        self.module_px
    }

    /// Blank pixels before the first quiet-zone module on the left and top.
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

/// Paints `qr` into a `pixel_size`×`pixel_size` image.
///
/// Every module becomes a square of `pixel_size / (size + 2 * quiet_zone)`
/// pixels, so block edges are sharp and all blocks are equal. Pixels left over
/// by the integer division are split evenly as extra light margin, the odd one
/// going to the right and bottom.
///
/// # Errors
///
/// [`QrError::RenderLimit`] if the pixel size or quiet zone is past
/// [`MAX_PIXEL_SIZE`] or [`MAX_QUIET_ZONE`], and
/// [`QrError::PixelSizeTooSmall`] if a module would get less than one pixel.
pub fn render(qr: &QrMatrix, options: &RenderOptions, palette: Palette) -> Result<RenderedImage> {
    check_limit("pixel_size", options.pixel_size, MAX_PIXEL_SIZE)?;
    let quiet = border_modules(options.quiet_zone)?;
    // Both factors are bounded above, so this cannot overflow
    let modules = (qr.size() + 2 * quiet) as u32;
    if options.pixel_size < modules {
        return Err(QrError::PixelSizeTooSmall {
            pixel_size: options.pixel_size,
            modules,
        });
    }
    let module_px = options.pixel_size / modules;
    let offset = (options.pixel_size - module_px * modules) / 2;
    let span = module_px * modules;

    let image: RgbImage = ImageBuffer::from_fn(options.pixel_size, options.pixel_size, |x, y| {
        let inside = (offset..offset + span).contains(&x) && (offset..offset + span).contains(&y);
        let isdark = inside && {
            let mx = ((x - offset) / module_px) as i32 - quiet;
            let my = ((y - offset) / module_px) as i32 - quiet;
            qr.get_module(mx, my)
        };
        palette.color(isdark)
    });

    debug!(
        pixel_size = options.pixel_size,
        module_px,
        offset,
        quiet_zone = options.quiet_zone,
        "rendered QR image"
    );

    Ok(RenderedImage {
        image,
        palette,
        options: *options,
        module_px,
        offset,
    })
}

/// Checks a user-supplied setting against its upper bound.
fn check_limit(field: &'static str, value: u32, max: u32) -> Result<()> {
    if value > max {
        return Err(QrError::RenderLimit { field, value, max });
    }
    Ok(())
}

/// A quiet zone or border width as a signed module count.
fn border_modules(border: u32) -> Result<i32> {
    check_limit("quiet_zone", border, MAX_QUIET_ZONE)?;
    i32::try_from(border).map_err(|_| QrError::RenderLimit {
        field: "quiet_zone",
        value: border,
        max: MAX_QUIET_ZONE,
    })
}

fn hex(color: Rgb<u8>) -> String {
    let Rgb([r, g, b]) = color;
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// SVG document for `qr` with `border` light modules around it.
/// The string always uses Unix newlines (\n), regardless of the platform.
///
/// # Errors
///
/// [`QrError::RenderLimit`] if `border` is past [`MAX_QUIET_ZONE`].
pub fn to_svg_string(qr: &QrMatrix, border: u32, palette: Palette) -> Result<String> {
    let border = border_modules(border)?;
    let dimension = qr.size() + border * 2;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {dimension} {dimension}\" stroke=\"none\">\n"
    );
    result += &format!(
        "\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
        hex(palette.light)
    );
    let path: Vec<String> = (0..qr.size())
        .flat_map(|y| (0..qr.size()).map(move |x| (x, y)))
        .filter(|&(x, y)| qr.get_module(x, y))
        .map(|(x, y)| format!("M{},{}h1v1h-1z", x + border, y + border))
        .collect();
    result += &format!(
        "\t<path d=\"{}\" fill=\"{}\"/>\n",
        path.join(" "),
        hex(palette.dark)
    );
    result += "</svg>\n";
    Ok(result)
}

/// Two characters per module, full blocks for dark ones, for printing to a
/// terminal with a light background.
pub fn to_terminal_string(qr: &QrMatrix, border: u32) -> Result<String> {
    let border = border_modules(border)?;
    let mut result = String::new();
    for y in -border..qr.size() + border {
        for x in -border..qr.size() + border {
            let c = if qr.get_module(x, y) { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecc::QrCodeEcc;

    fn wa_matrix() -> QrMatrix {
        QrMatrix::encode_text("https://wa.me/15551234567", QrCodeEcc::High).unwrap()
    }

    #[test]
    fn test_default_render_is_256_square() {
        let qr = wa_matrix();
        let img = render(&qr, &RenderOptions::default(), Theme::Light.palette()).unwrap();
        assert_eq!(img.image().dimensions(), (256, 256));
        // 33 modules + 8 quiet = 41; 256 / 41 = 6 px, 10 px left over
        assert_eq!(img.module_px(), 6);
        assert_eq!(img.offset(), 5);
        assert_eq!(*img.image().get_pixel(0, 0), WHITE);
        // Top-left finder corner
        let corner = 5 + 4 * 6;
        assert_eq!(*img.image().get_pixel(corner, corner), BLACK);
        assert_eq!(*img.image().get_pixel(corner - 1, corner), WHITE);
    }

    #[test]
    fn test_dimensions_scale_with_pixel_size() {
        let qr = wa_matrix();
        for pixel_size in [41, 100, 256, 512, 1000] {
            let options = RenderOptions {
                pixel_size,
                ..RenderOptions::default()
            };
            let img = render(&qr, &options, Palette::default()).unwrap();
            assert_eq!(img.image().dimensions(), (pixel_size, pixel_size));
            assert_eq!(img.side(), pixel_size);
        }
    }

    #[test]
    fn test_color_mapping_is_exact() {
        let qr = wa_matrix();
        let options = RenderOptions {
            pixel_size: 33 * 5,
            quiet_zone: 0,
        };
        let img = render(&qr, &options, Palette::BLACK_ON_WHITE).unwrap();
        assert_eq!(img.module_px(), 5);
        assert_eq!(img.offset(), 0);
        for (x, y, pixel) in img.image().enumerate_pixels() {
            let expected = if qr.get_module((x / 5) as i32, (y / 5) as i32) {
                BLACK
            } else {
                WHITE
            };
            assert_eq!(*pixel, expected, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn test_dark_theme_swaps_colors() {
        let qr = wa_matrix();
        let options = RenderOptions::default();
        let light = render(&qr, &options, Theme::Light.palette()).unwrap();
        let dark = render(&qr, &options, Theme::Dark.palette()).unwrap();
        for (a, b) in light.image().pixels().zip(dark.image().pixels()) {
            assert_ne!(a, b);
        }
        assert_eq!(dark.palette().dark, WHITE);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert!(Theme::Light.toggled().is_dark());
    }

    #[test]
    fn test_pixel_size_too_small() {
        let qr = wa_matrix();
        for pixel_size in [0, 40] {
            let options = RenderOptions {
                pixel_size,
                quiet_zone: 4,
            };
            assert!(matches!(
                render(&qr, &options, Palette::default()),
                Err(QrError::PixelSizeTooSmall { modules: 41, .. })
            ));
        }
    }

    #[test]
    fn test_render_does_not_touch_matrix() {
        let qr = wa_matrix();
        let before = qr.clone();
        render(&qr, &RenderOptions::default(), Theme::Dark.palette()).unwrap();
        assert_eq!(qr, before);
    }

    #[test]
    fn test_to_svg_string() {
        let qr = QrMatrix::encode_text("HELLO WORLD", QrCodeEcc::Low).unwrap();
        let svg = to_svg_string(&qr, 4, Theme::Dark.palette()).unwrap();
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("viewBox=\"0 0 29 29\""));
        assert!(svg.contains("fill=\"#000000\"/>\n\t<path"));
        assert!(svg.contains("M4,4h1v1h-1z"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_to_terminal_string() {
        let qr = QrMatrix::encode_text("HELLO WORLD", QrCodeEcc::Low).unwrap();
        let text = to_terminal_string(&qr, 1).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 23);
        assert!(lines.iter().all(|l| l.chars().count() == 46));
        assert!(lines[0].trim().is_empty());
        assert!(lines[1].starts_with("  ██████████████"));
    }

    #[test]
    fn test_oversized_settings_rejected() {
        let qr = wa_matrix();
        for (pixel_size, quiet_zone, field) in [
            (256, 1 << 31, "quiet_zone"),
            (256, MAX_QUIET_ZONE + 1, "quiet_zone"),
            (u32::MAX, 4, "pixel_size"),
            (MAX_PIXEL_SIZE + 1, 4, "pixel_size"),
        ] {
            let options = RenderOptions {
                pixel_size,
                quiet_zone,
            };
            match render(&qr, &options, Palette::default()) {
                Err(QrError::RenderLimit { field: got, .. }) => assert_eq!(got, field),
                other => panic!("{pixel_size}/{quiet_zone}: {other:?}"),
            }
        }
        assert!(matches!(
            to_svg_string(&qr, u32::MAX, Palette::default()),
            Err(QrError::RenderLimit { .. })
        ));
        assert!(matches!(
            to_terminal_string(&qr, 1 << 31),
            Err(QrError::RenderLimit { .. })
        ));
    }

    #[test]
    fn test_largest_quiet_zone_renders() {
        let qr = wa_matrix();
        let options = RenderOptions {
            pixel_size: 33 + 2 * MAX_QUIET_ZONE,
            quiet_zone: MAX_QUIET_ZONE,
        };
        let img = render(&qr, &options, Palette::default()).unwrap();
        assert_eq!(img.module_px(), 1);
        assert!(img.image().pixels().any(|p| *p == BLACK));
    }

    #[test]
    fn test_custom_palette_and_into_image() {
        let palette = Palette::new([0, 0, 128], [255, 255, 0]);
        assert_eq!(palette.dark, Rgb([0, 0, 128]));
        assert_eq!(palette.light, Rgb([255, 255, 0]));

        let img = render(&wa_matrix(), &RenderOptions::default(), palette).unwrap();
        assert_eq!(*img.image().get_pixel(0, 0), Rgb([255, 255, 0]));
        let copy = img.image().clone();
        assert_eq!(img.into_image(), copy);
    }
}
