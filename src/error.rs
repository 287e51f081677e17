use thiserror::Error;

use crate::ecc::QrCodeEcc;

/// Everything that can go wrong between a typed phone number and a saved PNG.
///
/// All variants are recoverable; none of them leave a half-built matrix or
/// image behind.
#[derive(Error, Debug)]
pub enum QrError {
    /// The local number is not 5 to 15 ASCII digits.
    #[error("please enter a valid phone number (5-15 digits), got {input:?}")]
    InvalidPhoneFormat { input: String },

    /// The calling code is not in the static country table.
    #[error("unknown country calling code: +{0}")]
    UnknownCountry(String),

    /// No QR version (1 to 40) can hold the payload at the requested level.
    #[error("payload of {len} characters does not fit any QR version at {ecl:?} error correction (needs {data_bits} bits, max {capacity_bits})")]
    PayloadTooLong {
        len: usize,
        ecl: QrCodeEcc,
        data_bits: usize,
        capacity_bits: usize,
    },

    /// The requested output is too small to give every module a pixel.
    #[error("pixel size {pixel_size} is too small for {modules} modules")]
    PixelSizeTooSmall { pixel_size: u32, modules: u32 },

    /// A render setting is past the supported maximum.
    #[error("{field} {value} exceeds the maximum of {max}")]
    RenderLimit {
        field: &'static str,
        value: u32,
        max: u32,
    },

    /// Export was requested before anything was rendered.
    #[error("no QR code has been generated yet")]
    NoCurrentImage,

    #[error("failed to encode image: {0}")]
    ExportFailure(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error in {field}: {message}")]
    Config { field: String, message: String },
}

impl QrError {
    /// Short message suitable for showing next to the input field.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidPhoneFormat { .. } => {
                "Please enter a valid phone number (5-15 digits).".to_string()
            }
            Self::UnknownCountry(code) => format!("Country code +{code} is not supported."),
            Self::PayloadTooLong { .. } => "This number is too long to fit in a QR code.".to_string(),
            Self::NoCurrentImage => "Generate a QR code before downloading it.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_input() {
        let err = QrError::InvalidPhoneFormat {
            input: "12".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "Please enter a valid phone number (5-15 digits)."
        );
        assert!(err.to_string().contains("\"12\""));
    }

    #[test]
    fn test_io_error_converts() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(QrError::Io(_))));
    }
}
