//! Generator settings, with defaults matching the web app and optional TOML
//! overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ecc::QrCodeEcc;
use crate::error::{QrError, Result};
use crate::payload::{DEFAULT_FILE_PREFIX, DEFAULT_SERVICE_DOMAIN};
use crate::render::{
    RenderOptions, Theme, DEFAULT_PIXEL_SIZE, DEFAULT_QUIET_ZONE, MAX_PIXEL_SIZE, MAX_QUIET_ZONE,
};

/// Every key is optional in the file; missing ones keep their default.
///
/// ```toml
/// service_domain = "wa.me"
/// file_prefix = "whatsapp-qr"
/// pixel_size = 512
/// quiet_zone = 4
/// error_correction = "high"
/// theme = "dark"
/// output_dir = "generated"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub service_domain: String,
    pub file_prefix: String,
    pub pixel_size: u32,
    pub quiet_zone: u32,
    pub error_correction: QrCodeEcc,
    pub theme: Theme,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_domain: DEFAULT_SERVICE_DOMAIN.to_string(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            pixel_size: DEFAULT_PIXEL_SIZE,
            quiet_zone: DEFAULT_QUIET_ZONE,
            error_correction: QrCodeEcc::High,
            theme: Theme::Light,
            output_dir: PathBuf::from("generated"),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| QrError::Config {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pixel_size == 0 {
            return Err(config_error("pixel_size", "must be positive"));
        }
        if self.pixel_size > MAX_PIXEL_SIZE {
            return Err(config_error(
                "pixel_size",
                &format!("must be at most {MAX_PIXEL_SIZE}"),
            ));
        }
        if self.quiet_zone > MAX_QUIET_ZONE {
            return Err(config_error(
                "quiet_zone",
                &format!("must be at most {MAX_QUIET_ZONE}"),
            ));
        }
        if self.service_domain.trim().is_empty() {
            return Err(config_error("service_domain", "cannot be empty"));
        }
        if self.service_domain.contains('/') {
            return Err(config_error("service_domain", "must be a bare host name"));
        }
        if self.file_prefix.trim().is_empty() {
            return Err(config_error("file_prefix", "cannot be empty"));
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            pixel_size: self.pixel_size,
            quiet_zone: self.quiet_zone,
        }
    }
}

fn config_error(field: &str, message: &str) -> QrError {
    QrError::Config {
        field: field.to_string(),
        message: message.to_string(),
    }
}
