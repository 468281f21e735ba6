//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce the enquiry invariants (registry number formats,
//! closed status set, positive quantities, normalized contact data) so that
//! once a value reaches the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;
use std::sync::LazyLock;

use phonenumber::{Mode, parse};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// CAS registry number: seven digits, two digits, one check digit.
pub static CAS_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{7}-\d{2}-\d$").expect("CAS number regex is valid"));

/// Internal catalog number: `ISP-`, one uppercase letter and six digits.
pub static CATALOG_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ISP-[A-Z]\d{6}$").expect("catalog number regex is valid"));

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Identifier absent from a backend response.
    #[error("id is missing")]
    MissingId,
    /// Provided quantity is zero.
    #[error("quantity must be at least 1")]
    NonPositiveQuantity,
    /// Quantity does not fit the supported range.
    #[error("quantity is too large: {0}")]
    QuantityTooLarge(String),
    /// Provided amount is negative or not a finite number.
    #[error("value must be a non-negative number")]
    NegativeValue,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// CAS registry number did not match `NNNNNNN-NN-N`.
    #[error("invalid CAS number: {0}")]
    InvalidCasNumber(String),
    /// Catalog number did not match `ISP-XNNNNNN`.
    #[error("invalid catalog number: {0}")]
    InvalidCatalogNumber(String),
    /// Status outside of `Open`, `Processed`, `Closed`.
    #[error("invalid enquiry status: {0}")]
    InvalidStatus(String),
    /// Flag outside of `Y`, `N`.
    #[error("invalid flag: {0}")]
    InvalidFlag(String),
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Enquiry submitted without product lines.
    #[error("at least one product is required")]
    NoProducts,
    /// Date/time string could not be parsed.
    #[error("invalid date/time: {0}")]
    InvalidDateTime(String),
}

/// Raw identifier as it travels over the wire: the backend has used both
/// numeric and string identifiers for the same entities.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum IdentifierValue {
    Number(i64),
    Text(String),
}

/// Macro to generate identifiers that accept either a positive number or a
/// non-empty string.
macro_rules! flexible_id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(try_from = "IdentifierValue", into = "IdentifierValue")]
        pub struct $name(IdentifierValue);

        impl $name {
            /// Creates a numeric identifier ensuring it is greater than zero.
            pub fn numeric(value: i64) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(IdentifierValue::Number(value)))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Creates a textual identifier from a trimmed, non-empty string.
            pub fn text<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(IdentifierValue::Text(inner.into_inner())))
            }

            /// Returns the numeric value when the identifier is numeric.
            pub fn as_number(&self) -> Option<i64> {
                match self.0 {
                    IdentifierValue::Number(value) => Some(value),
                    IdentifierValue::Text(_) => None,
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                match &self.0 {
                    IdentifierValue::Number(value) => write!(f, "{value}"),
                    IdentifierValue::Text(value) => write!(f, "{value}"),
                }
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                match trimmed.parse::<i64>() {
                    Ok(value) => Self::numeric(value),
                    Err(_) => Self::text(trimmed),
                }
            }
        }

        impl TryFrom<IdentifierValue> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: IdentifierValue) -> Result<Self, Self::Error> {
                match value {
                    IdentifierValue::Number(value) => Self::numeric(value),
                    IdentifierValue::Text(value) => Self::text(value),
                }
            }
        }

        impl From<$name> for IdentifierValue {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

flexible_id_newtype!(EnquiryId, "Unique identifier for an enquiry.");
flexible_id_newtype!(CustomerId, "Unique identifier for a customer.");

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(
    CustomerName,
    "Customer display name wrapper enforcing non-empty values."
);

non_empty_string_newtype!(
    AttachmentRef,
    "Attachment reference (file name or storage key) enforcing non-empty values."
);

/// Macro for string codes validated against a compiled pattern.
macro_rules! pattern_newtype {
    ($name:ident, $re:ident, $err:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Trims the input and checks it against the expected format.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = value.into().trim().to_string();
                if $re.is_match(&trimmed) {
                    Ok(Self(trimmed))
                } else {
                    Err(TypeConstraintError::$err(trimmed))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

pattern_newtype!(
    CasNumber,
    CAS_NUMBER_RE,
    InvalidCasNumber,
    "Chemical Abstracts Service registry number (`NNNNNNN-NN-N`)."
);

pattern_newtype!(
    CatalogNumber,
    CATALOG_NUMBER_RE,
    InvalidCatalogNumber,
    "Internal catalog number (`ISP-` + uppercase letter + six digits)."
);

/// Quantity requested for a product line, at least one unit.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Result<Self, TypeConstraintError> {
        if value >= 1 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveQuantity)
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = TypeConstraintError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

/// Ensures prices and molecular weights are finite and not negative.
pub fn non_negative(value: f64) -> Result<f64, TypeConstraintError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(TypeConstraintError::NegativeValue)
    }
}

/// Lifecycle state of an enquiry.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum EnquiryStatus {
    #[default]
    Open,
    Processed,
    Closed,
}

impl EnquiryStatus {
    /// Every status in display order.
    pub const ALL: [EnquiryStatus; 3] = [Self::Open, Self::Processed, Self::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnquiryStatus::Open => "Open",
            EnquiryStatus::Processed => "Processed",
            EnquiryStatus::Closed => "Closed",
        }
    }
}

impl Display for EnquiryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EnquiryStatus {
    type Err = TypeConstraintError;

    /// Accepts any casing; older backend revisions send lower-case values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(EnquiryStatus::Open),
            "processed" => Ok(EnquiryStatus::Processed),
            "closed" => Ok(EnquiryStatus::Closed),
            _ => Err(TypeConstraintError::InvalidStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for EnquiryStatus {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Binary availability indicator on a product line.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum Flag {
    Y,
    #[default]
    N,
}

impl Flag {
    pub const ALL: [Flag; 2] = [Self::Y, Self::N];

    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Y => "Y",
            Flag::N => "N",
        }
    }
}

impl Display for Flag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Flag {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Y" | "y" => Ok(Flag::Y),
            "N" | "n" => Ok(Flag::N),
            other => Err(TypeConstraintError::InvalidFlag(other.to_string())),
        }
    }
}

impl TryFrom<String> for Flag {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Lower-cased and validated customer email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CustomerEmail(String);

impl CustomerEmail {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = email.into().trim().to_lowercase();
        if normalized.validate_email() {
            Ok(Self(normalized))
        } else {
            Err(TypeConstraintError::InvalidEmail)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CustomerEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalizes a phone number string to E.164 format.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed = parse(None, trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Normalized phone number wrapper (expected E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Constructs a phone number ensuring it is valid and normalizes to E.164 format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_phone_to_e164(&value.into())?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cas_number_requires_seven_two_one_grouping() {
        assert!(CasNumber::new("7732-18-5").is_err());
        assert!(CasNumber::new("7732018-18-5").is_ok());
        assert!(CasNumber::new("1234567-89-0").is_ok());
        assert!(CasNumber::new("1234567-890").is_err());
    }

    #[test]
    fn catalog_number_requires_prefix_letter_and_six_digits() {
        assert!(CatalogNumber::new("ISP-A123456").is_ok());
        assert!(CatalogNumber::new("ISP-a123456").is_err());
        assert!(CatalogNumber::new("ISP-AB12345").is_err());
        assert!(CatalogNumber::new("XSP-A123456").is_err());
    }

    #[test]
    fn quantity_rejects_zero() {
        assert_eq!(
            Quantity::new(0),
            Err(TypeConstraintError::NonPositiveQuantity)
        );
        assert_eq!(Quantity::new(1).map(Quantity::get), Ok(1));
    }

    #[test]
    fn status_parses_any_casing() {
        assert_eq!("open".parse::<EnquiryStatus>(), Ok(EnquiryStatus::Open));
        assert_eq!(
            "PROCESSED".parse::<EnquiryStatus>(),
            Ok(EnquiryStatus::Processed)
        );
        assert!("pending".parse::<EnquiryStatus>().is_err());
    }

    #[test]
    fn status_serializes_capitalized() {
        let json = serde_json::to_string(&EnquiryStatus::Closed).unwrap();
        assert_eq!(json, "\"Closed\"");
        let status: EnquiryStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(status, EnquiryStatus::Closed);
    }

    #[test]
    fn identifiers_accept_numbers_and_strings() {
        let numeric: EnquiryId = serde_json::from_str("10234").unwrap();
        assert_eq!(numeric.as_number(), Some(10234));
        assert_eq!(numeric.to_string(), "10234");

        let text: CustomerId = serde_json::from_str("\"cust-001\"").unwrap();
        assert_eq!(text.as_number(), None);
        assert_eq!(text.to_string(), "cust-001");

        assert!(serde_json::from_str::<EnquiryId>("0").is_err());
        assert!(serde_json::from_str::<EnquiryId>("\"  \"").is_err());
    }

    #[test]
    fn identifier_from_str_prefers_numbers() {
        let id: EnquiryId = "42".parse().unwrap();
        assert_eq!(id.as_number(), Some(42));
        let id: EnquiryId = "enq-42".parse().unwrap();
        assert_eq!(id.to_string(), "enq-42");
    }

    #[test]
    fn non_negative_rejects_negative_and_nan() {
        assert_eq!(non_negative(0.0), Ok(0.0));
        assert!(non_negative(-0.5).is_err());
        assert!(non_negative(f64::NAN).is_err());
    }

    #[test]
    fn flag_defaults_to_n() {
        assert_eq!(Flag::default(), Flag::N);
        assert_eq!("y".parse::<Flag>(), Ok(Flag::Y));
    }

    #[test]
    fn customer_email_is_normalized() {
        let email = CustomerEmail::new("  Buyer@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "buyer@example.com");
        assert!(CustomerEmail::new("not-an-email").is_err());
    }
}
