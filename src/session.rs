//! The generate / toggle / export flow, held as explicit state instead of UI
//! globals.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{QrError, Result};
use crate::export::{ExportArtifact, ExportJob};
use crate::payload::PhoneInput;
use crate::qrcode::QrMatrix;
use crate::render::{render, RenderedImage, Theme};

/// Where the session stands after the last action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing generated yet, or the output was cleared.
    Idle,
    /// The last input was rejected; holds the message to show.
    Invalid(String),
    /// A code is displayed and can be exported.
    Rendered,
}

/// One successful generation.
#[derive(Debug, Clone)]
pub struct Generated {
    pub input: PhoneInput,
    pub payload: String,
    pub matrix: Arc<QrMatrix>,
    pub image: Arc<RenderedImage>,
    pub file_name: String,
}

/// Holds at most one current code. A successful generation replaces it; a
/// failed encode or render leaves it as it was.
#[derive(Debug)]
pub struct Session {
    config: Config,
    theme: Theme,
    state: SessionState,
    current: Option<Generated>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let theme = config.theme;
        Self {
            config,
            theme,
            state: SessionState::Idle,
            current: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn current(&self) -> Option<&Generated> {
        self.current.as_ref()
    }

    /// Whether an export would succeed; front-ends disable the action otherwise.
    pub fn can_export(&self) -> bool {
        self.current.is_some()
    }

    /// Validates the number, then encodes and renders it with the current theme.
    ///
    /// Rejected input moves to [`SessionState::Invalid`] and clears the shown
    /// code. Encoder or renderer failures keep the previous code, and the state
    /// goes back to whatever that code implies.
    pub fn generate(&mut self, country_code: &str, raw_phone: &str) -> Result<&Generated> {
        let input = match PhoneInput::new(country_code, raw_phone) {
            Ok(input) => input,
            Err(err) => {
                self.state = SessionState::Invalid(err.user_message());
                self.current = None;
                return Err(err);
            }
        };

        let payload = input.payload(&self.config.service_domain);
        let (matrix, image) = match self.draw(&payload) {
            Ok(drawn) => drawn,
            Err(err) => {
                warn!(%err, "generation failed, keeping previous code");
                self.state = if self.current.is_some() {
                    SessionState::Rendered
                } else {
                    SessionState::Idle
                };
                return Err(err);
            }
        };
        let file_name = input.file_name(&self.config.file_prefix);

        info!(
            number = %input.full_number(),
            version = matrix.version().value(),
            theme = ?self.theme,
            "generated QR code"
        );

        self.state = SessionState::Rendered;
        Ok(&*self.current.insert(Generated {
            input,
            payload,
            matrix: Arc::new(matrix),
            image: Arc::new(image),
            file_name,
        }))
    }

    fn draw(&self, payload: &str) -> Result<(QrMatrix, RenderedImage)> {
        let matrix = QrMatrix::encode_text(payload, self.config.error_correction)?;
        let image = render(&matrix, &self.config.render_options(), self.theme.palette())?;
        Ok((matrix, image))
    }

    /// Flips light/dark for subsequent renders. The shown code is not touched.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Re-renders the current matrix with the current theme.
    pub fn rerender(&mut self) -> Result<&Generated> {
        let theme = self.theme;
        let options = self.config.render_options();
        let current = self.current.as_mut().ok_or(QrError::NoCurrentImage)?;
        let image = render(&current.matrix, &options, theme.palette())?;
        current.image = Arc::new(image);
        Ok(&*current)
    }

    /// Drops the shown code.
    pub fn clear(&mut self) {
        self.current = None;
        self.state = SessionState::Idle;
    }

    /// Captures the current image for export.
    pub fn export_job(&self) -> Result<ExportJob> {
        let current = self.current.as_ref().ok_or(QrError::NoCurrentImage)?;
        Ok(ExportJob::new(
            Arc::clone(&current.image),
            current.file_name.as_str(),
        ))
    }

    /// Encodes the current image as PNG.
    pub fn export(&self) -> Result<ExportArtifact> {
        let artifact = self.export_job()?.run()?;
        info!(file = %artifact.file_name, bytes = artifact.bytes.len(), "exported QR code");
        Ok(artifact)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecc::QrCodeEcc;

    #[test]
    fn test_generate_wa_link() {
        let mut session = Session::default();
        let generated = session.generate("1", "5551234567").unwrap();
        assert_eq!(generated.payload, "https://wa.me/15551234567");
        assert_eq!(generated.file_name, "whatsapp-qr-15551234567.png");
        assert_eq!(generated.matrix.version().value(), 4);
        assert_eq!(generated.matrix.error_correction_level(), QrCodeEcc::High);
        assert_eq!(generated.image.image().dimensions(), (256, 256));
        assert_eq!(session.state(), &SessionState::Rendered);
        assert!(session.can_export());
    }

    #[test]
    fn test_short_number_is_rejected_and_blocks_export() {
        let mut session = Session::default();
        assert!(matches!(
            session.generate("1", "12"),
            Err(QrError::InvalidPhoneFormat { .. })
        ));
        assert_eq!(
            session.state(),
            &SessionState::Invalid("Please enter a valid phone number (5-15 digits).".to_string())
        );
        assert!(session.current().is_none());
        assert!(!session.can_export());
        assert!(matches!(session.export(), Err(QrError::NoCurrentImage)));
    }

    #[test]
    fn test_invalid_input_clears_previous_code() {
        let mut session = Session::default();
        session.generate("44", "7700900123").unwrap();
        assert!(session.generate("44", "77").is_err());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_new_generation_replaces_current() {
        let mut session = Session::default();
        session.generate("1", "5551234567").unwrap();
        let first = session.current().unwrap().matrix.clone();
        session.generate("91", "9876543210").unwrap();
        let second = session.current().unwrap();
        assert_eq!(second.payload, "https://wa.me/919876543210");
        assert_ne!(*second.matrix, *first);
    }

    #[test]
    fn test_toggle_theme_changes_colors_not_matrix() {
        let mut session = Session::default();
        let light = session.generate("1", "5551234567").unwrap().clone();
        assert_eq!(session.toggle_theme(), Theme::Dark);
        // The shown image is untouched until the next render
        assert_eq!(session.current().unwrap().image, light.image);

        let dark = session.generate("1", "5551234567").unwrap();
        assert_eq!(dark.matrix, light.matrix);
        assert_eq!(dark.image.palette(), light.image.palette().swapped());

        let rerendered = session.rerender().unwrap();
        assert_eq!(rerendered.image.palette(), Theme::Dark.palette());
    }

    #[test]
    fn test_export_job_survives_new_generation() {
        let mut session = Session::default();
        session.generate("1", "5551234567").unwrap();
        let job = session.export_job().unwrap();
        session.generate("49", "15123456789").unwrap();

        let artifact = job.run().unwrap();
        assert_eq!(artifact.file_name, "whatsapp-qr-15551234567.png");
        assert_eq!(session.export().unwrap().file_name, "whatsapp-qr-4915123456789.png");
    }

    #[test]
    fn test_clear_and_rerender_without_code() {
        let mut session = Session::default();
        session.generate("1", "5551234567").unwrap();
        session.clear();
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(matches!(session.rerender(), Err(QrError::NoCurrentImage)));
    }

    #[test]
    fn test_render_failure_keeps_previous_code() {
        let mut session = Session::new(Config {
            pixel_size: 20,
            ..Config::default()
        });
        assert!(matches!(
            session.generate("1", "5551234567"),
            Err(QrError::PixelSizeTooSmall { .. })
        ));
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(session.current().is_none());
    }

    #[test]
    fn test_render_failure_after_invalid_input_clears_message() {
        let mut session = Session::new(Config {
            pixel_size: 20,
            ..Config::default()
        });
        assert!(session.generate("1", "12").is_err());
        assert!(matches!(session.state(), SessionState::Invalid(_)));

        assert!(matches!(
            session.generate("1", "5551234567"),
            Err(QrError::PixelSizeTooSmall { .. })
        ));
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(!session.can_export());
    }
}
