//! Enquiry aggregate and its product lines.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AttachmentRef, CasNumber, CatalogNumber, CustomerId, CustomerName, EnquiryId, EnquiryStatus,
    Flag, Quantity, TypeConstraintError,
};

/// Format used by the date/time input of the enquiry form.
pub const FORM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format used when sending full timestamps to the backend.
pub const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    FORM_DATETIME_FORMAT,
    WIRE_DATETIME_FORMAT,
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a timestamp into local wall-clock time.
///
/// Naive values are taken as local time. Values carrying an offset are
/// converted into the local timezone.
pub fn parse_local_datetime(value: &str) -> Result<NaiveDateTime, TypeConstraintError> {
    let trimmed = value.trim();
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Local).naive_local())
        .map_err(|_| TypeConstraintError::InvalidDateTime(trimmed.to_string()))
}

/// Renders a timestamp the way the form's date/time input expects it.
pub fn format_form_datetime(value: &NaiveDateTime) -> String {
    value.format(FORM_DATETIME_FORMAT).to_string()
}

/// One requested product line.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EnquiryProduct {
    pub product_id: Option<String>,
    pub quantity: Quantity,
    pub chemical_name: Option<String>,
    /// Unit price, never negative.
    pub price: Option<f64>,
    pub cas_number: Option<CasNumber>,
    pub cat_number: Option<CatalogNumber>,
    /// Molecular weight in g/mol, never negative.
    pub molecular_weight: Option<f64>,
    /// Packaging variant, e.g. "25kg Drum".
    pub variant: Option<String>,
    pub flag: Flag,
    pub attachment_ref: Option<AttachmentRef>,
}

impl EnquiryProduct {
    /// Product line with only a quantity; every optional field empty.
    #[must_use]
    pub fn new(quantity: Quantity) -> Self {
        Self {
            product_id: None,
            quantity,
            chemical_name: None,
            price: None,
            cas_number: None,
            cat_number: None,
            molecular_weight: None,
            variant: None,
            flag: Flag::default(),
            attachment_ref: None,
        }
    }
}

/// Customer request for one or more chemical products.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Enquiry {
    pub enquiry_id: EnquiryId,
    pub customer_id: Option<CustomerId>,
    /// Denormalized customer name used for display and search.
    pub customer_name: String,
    pub enquiry_datetime: NaiveDateTime,
    pub status: EnquiryStatus,
    pub products: Vec<EnquiryProduct>,
}

impl Enquiry {
    /// Case-insensitive substring match over id, customer name and status.
    ///
    /// An empty term matches every enquiry.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.enquiry_id.to_string().to_lowercase().contains(&term)
            || self.customer_name.to_lowercase().contains(&term)
            || self.status.as_str().to_lowercase().contains(&term)
    }

    /// Returns a copy of this enquiry with the submitted edits merged in.
    #[must_use]
    pub fn apply(&self, changes: &EnquiryChanges) -> Enquiry {
        Enquiry {
            enquiry_id: self.enquiry_id.clone(),
            customer_id: self.customer_id.clone(),
            customer_name: changes.customer_name.as_str().to_string(),
            enquiry_datetime: changes.enquiry_datetime,
            status: changes.status,
            products: changes.products.clone(),
        }
    }
}

/// Enquiry ready to be created for an already provisioned customer.
#[derive(Clone, Debug, PartialEq)]
pub struct NewEnquiry {
    pub customer_id: CustomerId,
    pub enquiry_datetime: NaiveDateTime,
    pub status: EnquiryStatus,
    pub products: Vec<EnquiryProduct>,
}

impl NewEnquiry {
    /// Rejects enquiries without product lines.
    pub fn try_new(
        customer_id: CustomerId,
        enquiry_datetime: NaiveDateTime,
        status: EnquiryStatus,
        products: Vec<EnquiryProduct>,
    ) -> Result<Self, TypeConstraintError> {
        if products.is_empty() {
            return Err(TypeConstraintError::NoProducts);
        }
        Ok(Self {
            customer_id,
            enquiry_datetime,
            status,
            products,
        })
    }
}

/// Values submitted from the edit form.
#[derive(Clone, Debug, PartialEq)]
pub struct EnquiryChanges {
    pub customer_name: CustomerName,
    pub enquiry_datetime: NaiveDateTime,
    pub status: EnquiryStatus,
    pub products: Vec<EnquiryProduct>,
}
