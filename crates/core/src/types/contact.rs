//! Contact-field newtypes used by the shipping address gate.
//!
//! These are parse-don't-validate wrappers: once constructed, the value is
//! known to be well-formed. The rules intentionally match what the address
//! dialog enforces, not any postal authority's full grammar.

use core::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Email
// =============================================================================

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not contain an @ symbol.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain part (after @) is empty or has no dot.
    #[error("email domain must contain a dot")]
    InvalidDomain,
}

/// An email address.
///
/// ## Constraints
///
/// - Length: 1-254 characters (RFC 5321 limit)
/// - Must contain an @ symbol with a non-empty local part
/// - Domain part must be non-empty and contain a dot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string. The input is trimmed first.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, lacks an @ symbol,
    /// or has an empty local part or dot-less domain.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::MissingAtSymbol)?;

        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// ThaiPhone
// =============================================================================

/// Errors that can occur when parsing a [`ThaiPhone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// No digits at all.
    #[error("phone number cannot be empty")]
    Empty,
    /// Not the ten digits a Thai mobile number has.
    #[error("phone number must be 10 digits (got {got})")]
    WrongLength {
        /// Digit count after stripping separators.
        got: usize,
    },
    /// Does not start with a Thai mobile prefix.
    #[error("phone number must start with 06, 08, or 09")]
    BadPrefix,
}

/// A Thai mobile phone number.
///
/// Separators (`-`, spaces, etc.) are stripped before validation; what
/// remains must be ten digits starting `06`, `08`, or `09`. The stored form
/// is digits only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ThaiPhone(String);

impl ThaiPhone {
    /// Parse a `ThaiPhone`, stripping every non-digit character first.
    ///
    /// # Errors
    ///
    /// Returns an error if the digit string is empty, not ten digits, or
    /// does not carry a Thai mobile prefix.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        if digits.len() != 10 {
            return Err(PhoneError::WrongLength { got: digits.len() });
        }

        let mut chars = digits.chars();
        let first = chars.next();
        let second = chars.next();
        if first != Some('0') || !matches!(second, Some('6' | '8' | '9')) {
            return Err(PhoneError::BadPrefix);
        }

        Ok(Self(digits))
    }

    /// Returns the digits-only phone number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThaiPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ThaiPhone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// PostalCode
// =============================================================================

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// The input string is empty.
    #[error("postal code cannot be empty")]
    Empty,
    /// Not exactly five characters.
    #[error("postal code must be 5 digits (got {got})")]
    WrongLength {
        /// Character count after trimming.
        got: usize,
    },
    /// Contains something other than digits.
    #[error("postal code must contain only digits")]
    NonDigit,
}

/// A five-digit Thai postal code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Parse a `PostalCode` from a string. The input is trimmed first.
    ///
    /// # Errors
    ///
    /// Returns an error unless the trimmed input is exactly five ASCII
    /// digits.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(PostalCodeError::Empty);
        }

        if s.chars().count() != 5 {
            return Err(PostalCodeError::WrongLength {
                got: s.chars().count(),
            });
        }

        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(PostalCodeError::NonDigit);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the postal code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
        assert!(Email::parse("  padded@example.com  ").is_ok());
    }

    #[test]
    fn test_parse_invalid_emails() {
        assert!(matches!(Email::parse(""), Err(EmailError::Empty)));
        assert!(matches!(
            Email::parse("no-at-symbol"),
            Err(EmailError::MissingAtSymbol)
        ));
        assert!(matches!(
            Email::parse("@domain.com"),
            Err(EmailError::EmptyLocalPart)
        ));
        assert!(matches!(Email::parse("user@"), Err(EmailError::InvalidDomain)));
        assert!(matches!(
            Email::parse("user@nodot"),
            Err(EmailError::InvalidDomain)
        ));

        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { .. })));
    }

    #[test]
    fn test_parse_valid_phones() {
        assert_eq!(ThaiPhone::parse("0812345678").unwrap().as_str(), "0812345678");
        assert_eq!(
            ThaiPhone::parse("081-234-5678").unwrap().as_str(),
            "0812345678",
            "separators are stripped"
        );
        assert!(ThaiPhone::parse("0612345678").is_ok());
        assert!(ThaiPhone::parse("0912345678").is_ok());
    }

    #[test]
    fn test_parse_invalid_phones() {
        assert!(matches!(ThaiPhone::parse(""), Err(PhoneError::Empty)));
        assert!(matches!(ThaiPhone::parse("abc"), Err(PhoneError::Empty)));
        assert!(matches!(
            ThaiPhone::parse("123"),
            Err(PhoneError::WrongLength { got: 3 })
        ));
        assert!(matches!(
            ThaiPhone::parse("0712345678"),
            Err(PhoneError::BadPrefix)
        ));
        assert!(matches!(
            ThaiPhone::parse("8812345678"),
            Err(PhoneError::BadPrefix)
        ));
    }

    #[test]
    fn test_parse_valid_postal_codes() {
        assert_eq!(PostalCode::parse("10110").unwrap().as_str(), "10110");
        assert_eq!(PostalCode::parse(" 10110 ").unwrap().as_str(), "10110");
    }

    #[test]
    fn test_parse_invalid_postal_codes() {
        assert!(matches!(PostalCode::parse(""), Err(PostalCodeError::Empty)));
        assert!(matches!(
            PostalCode::parse("1011"),
            Err(PostalCodeError::WrongLength { got: 4 })
        ));
        assert!(matches!(
            PostalCode::parse("101100"),
            Err(PostalCodeError::WrongLength { got: 6 })
        ));
        assert!(matches!(
            PostalCode::parse("1011a"),
            Err(PostalCodeError::NonDigit)
        ));
    }
}
