//! # waqr
//!
//! Turn a phone number into a QR code that opens a WhatsApp chat.
//!
//! `waqr` validates a country calling code and local number, builds the
//! `https://wa.me/<number>` deep link, encodes it as a QR Code Model 2 symbol
//! (versions 1 to 40, four error correction levels, numeric, alphanumeric or
//! byte mode), rasterizes it into a two-color image and exports it as PNG.
//! The encoder is implemented here; `image` provides the pixel buffer and
//! the PNG codec.
//!
//! ## Features
//!
//! - Phone validation (5 to 15 digits) against a static country table.
//! - Smallest-version selection, Reed–Solomon error correction and
//!   penalty-based mask selection.
//! - Exact, seam-free rendering at any output size with a fixed quiet zone.
//! - Light and dark themes; SVG and terminal text output.
//! - A [`Session`] that keeps exactly one current code and exports it.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! ```rust
//! use waqr::{Session, SessionState};
//!
//! let mut session = Session::default();
//! let generated = session.generate("1", "555 123 4567").unwrap();
//! assert_eq!(generated.payload, "https://wa.me/15551234567");
//! assert_eq!(session.state(), &SessionState::Rendered);
//!
//! let png = session.export().unwrap();
//! assert_eq!(png.file_name, "whatsapp-qr-15551234567.png");
//! ```
//!
//! Lower level, without a session:
//!
//! ```rust
//! use waqr::{build_payload, render, QrCodeEcc, QrMatrix, RenderOptions, Theme};
//!
//! let url = build_payload("44", "7700900123");
//! let qr = QrMatrix::encode_text(&url, QrCodeEcc::High).unwrap();
//! let img = render(&qr, &RenderOptions::default(), Theme::Dark.palette()).unwrap();
//! assert_eq!(img.image().dimensions(), (256, 256));
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Core QR code encoding functionality.
//! - [`segment`], [`ecc`]: bit packing, block tables and Reed–Solomon.
//! - [`render`]: Pixel, SVG and terminal rendering.
//! - [`export`]: PNG serialization and saving.
//! - [`payload`]: Phone input, countries and the deep link.
//! - [`session`]: The generate / toggle / export flow.

#![forbid(unsafe_code)]

pub mod config;
pub mod ecc;
pub mod error;
pub mod export;
#[cfg(feature = "cli")]
pub mod logger;
pub mod payload;
pub mod qrcode;
pub mod render;
pub mod segment;
pub mod session;

pub use config::Config;
pub use ecc::{Mask, QrCodeEcc, Version};
pub use error::{QrError, Result};
pub use export::{export_png, ExportArtifact, ExportJob};
pub use payload::{build_payload, validate_phone, Country, PhoneInput, COUNTRIES};
pub use qrcode::{EncodeOptions, QrMatrix};
pub use render::{render, Palette, RenderOptions, RenderedImage, Theme};
pub use segment::{QrSegment, QrSegmentMode};
pub use session::{Generated, Session, SessionState};
