//! Phone number input, the country table and the deep-link payload.

use tracing::warn;

use crate::error::{QrError, Result};

/// Domain of the chat service the generated links open.
pub const DEFAULT_SERVICE_DOMAIN: &str = "wa.me";

/// Prefix of suggested export file names.
pub const DEFAULT_FILE_PREFIX: &str = "whatsapp-qr";

/// Calling code preselected when nothing else is chosen.
pub const DEFAULT_COUNTRY_CODE: &str = "1";

pub const MIN_PHONE_DIGITS: usize = 5;
pub const MAX_PHONE_DIGITS: usize = 15;

/// A selectable calling code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

pub static COUNTRIES: [Country; 10] = [
    Country { code: "1", name: "United States", flag: "🇺🇸" },
    Country { code: "44", name: "United Kingdom", flag: "🇬🇧" },
    Country { code: "91", name: "India", flag: "🇮🇳" },
    Country { code: "92", name: "Pakistan", flag: "🇵🇰" },
    Country { code: "61", name: "Australia", flag: "🇦🇺" },
    Country { code: "81", name: "Japan", flag: "🇯🇵" },
    Country { code: "49", name: "Germany", flag: "🇩🇪" },
    Country { code: "33", name: "France", flag: "🇫🇷" },
    Country { code: "55", name: "Brazil", flag: "🇧🇷" },
    Country { code: "7", name: "Russia", flag: "🇷🇺" },
];

impl Country {
    /// Looks up a calling code, with or without a leading `+`.
    pub fn find(code: &str) -> Option<&'static Country> {
        let code = code.strip_prefix('+').unwrap_or(code);
        COUNTRIES.iter().find(|c| c.code == code)
    }

    /// Label as shown in a picker, e.g. `🇬🇧 +44`.
    pub fn label(&self) -> String {
        format!("{} +{}", self.flag, self.code)
    }
}

/// Checks that `digits` is 5 to 15 ASCII digits, exactly as given.
pub fn validate_phone(digits: &str) -> Result<()> {
    let len_ok = (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len());
    if len_ok && digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(QrError::InvalidPhoneFormat {
            input: digits.to_string(),
        })
    }
}

/// Builds `https://wa.me/<countryCode><localNumber>`. No validation.
pub fn build_payload(country_code: &str, local_number: &str) -> String {
    build_payload_for(DEFAULT_SERVICE_DOMAIN, country_code, local_number)
}

/// [`build_payload`] against another service domain.
pub fn build_payload_for(domain: &str, country_code: &str, local_number: &str) -> String {
    format!("https://{domain}/{country_code}{local_number}")
}

/// Suggested export name, `<prefix>-<countryCode><digits>.png`.
pub fn export_file_name(prefix: &str, country_code: &str, digits: &str) -> String {
    format!("{prefix}-{country_code}{digits}.png")
}

/// A validated phone number: a known calling code plus 5 to 15 digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneInput {
    country: &'static Country,
    digits: String,
}

impl PhoneInput {
    /// Strips every non-digit from `raw` (spaces, dashes, brackets) and
    /// validates what is left.
    pub fn new(country_code: &str, raw: &str) -> Result<Self> {
        let country = Country::find(country_code).ok_or_else(|| {
            warn!(country_code, "rejected unknown country code");
            QrError::UnknownCountry(country_code.to_string())
        })?;
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if let Err(err) = validate_phone(&digits) {
            warn!(len = digits.len(), "rejected phone number");
            return Err(err);
        }
        Ok(Self { country, digits })
    }

    pub fn country(&self) -> &'static Country {
        self.country
    }

    pub fn country_code(&self) -> &'static str {
        self.country.code
    }

    /// The local digits after stripping.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Calling code and digits run together, e.g. `15551234567`.
    pub fn full_number(&self) -> String {
        format!("{}{}", self.country.code, self.digits)
    }

    /// The deep link for this number on `domain`.
    pub fn payload(&self, domain: &str) -> String {
        build_payload_for(domain, self.country.code, &self.digits)
    }

    pub fn file_name(&self, prefix: &str) -> String {
        export_file_name(prefix, self.country.code, &self.digits)
    }
}
